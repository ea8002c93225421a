//! Shape Counter entry point
//!
//! Handles platform-specific initialization and wires page events to the round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use shape_counter::Settings;
    use shape_counter::consts::SHAPE_SIZE_PX;
    use shape_counter::feedback::WebFeedback;
    use shape_counter::render::{
        STYLESHEET, count_label, key_pops_shape, shape_class, shape_style, sound_label,
    };
    use shape_counter::sim::{Round, Shape};

    /// Game instance holding all state
    struct Game {
        round: Round<WebFeedback, Pcg32>,
        settings: Settings,
        document: Document,
        display: Element,
        container: Element,
        /// Rendered shape elements by shape id
        elements: HashMap<u32, Element>,
    }

    impl Game {
        /// Sync the DOM with the round. Elements are kept per shape so the
        /// exploding transition can play on the existing node.
        fn render(&mut self) {
            let state = self.round.state();
            self.display.set_text_content(Some(&count_label(state)));

            self.elements.retain(|id, el| {
                let keep = state.shape(*id).is_some();
                if !keep {
                    el.remove();
                }
                keep
            });

            for shape in &state.shapes {
                if !self.elements.contains_key(&shape.id) {
                    let Some(el) = create_shape_element(&self.document, shape) else {
                        log::warn!("Could not create element for shape {}", shape.id);
                        continue;
                    };
                    let _ = self.container.append_child(&el);
                    self.elements.insert(shape.id, el);
                }
                if let Some(el) = self.elements.get(&shape.id) {
                    el.set_class_name(&shape_class(shape));
                }
            }
        }
    }

    fn create_shape_element(document: &Document, shape: &Shape) -> Option<Element> {
        let el = document.create_element("div").ok()?;
        el.set_attribute("style", &shape_style(shape, SHAPE_SIZE_PX))
            .ok()?;
        el.set_attribute("data-shape-id", &shape.id.to_string())
            .ok()?;
        if let Some(glyph) = shape.kind.glyph() {
            el.set_text_content(Some(glyph));
        }
        Some(el)
    }

    /// Milliseconds on the page clock
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn element(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
        let el = document.create_element(tag)?;
        el.set_class_name(class);
        Ok(el)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Shape Counter starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;

        // Page skeleton
        let style = document.create_element("style")?;
        style.set_text_content(Some(STYLESHEET));
        body.append_child(&style)?;

        let app = element(&document, "div", "App")?;
        let display = element(&document, "div", "number-display")?;
        let buttons = element(&document, "div", "button-container")?;
        let new_button = element(&document, "button", "control-button")?;
        new_button.set_text_content(Some("New Number"));
        let reset_button = element(&document, "button", "control-button")?;
        reset_button.set_text_content(Some("Reset"));
        let sound_button = element(&document, "button", "control-button")?;
        let container = element(&document, "div", "shapes-container")?;

        buttons.append_child(&new_button)?;
        buttons.append_child(&reset_button)?;
        buttons.append_child(&sound_button)?;
        app.append_child(&display)?;
        app.append_child(&container)?;
        app.append_child(&buttons)?;
        body.append_child(&app)?;

        // Initialize game
        let settings = Settings::load();
        sound_button.set_text_content(Some(sound_label(settings.muted)));
        let seed = js_sys::Date::now() as u64;
        let mut feedback = WebFeedback::new(&settings);
        feedback.speech.warm_up_voices();
        let round = Round::new(
            settings.round_config(),
            Pcg32::seed_from_u64(seed),
            feedback,
        );
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            round,
            settings,
            document,
            display,
            container: container.clone(),
            elements: HashMap::new(),
        }));

        {
            let mut g = game.borrow_mut();
            g.round.start_round();
            g.render();
        }

        setup_shape_clicks(&container, game.clone())?;
        setup_buttons(&new_button, &reset_button, game.clone())?;
        setup_sound_toggle(&sound_button, game.clone())?;
        setup_keyboard(&window, game)?;

        log::info!("Shape Counter running!");
        Ok(())
    }

    /// Shape id of the clicked element, if a shape was hit
    fn shape_id_from_event(event: &MouseEvent) -> Option<u32> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let shape_el = target.closest("[data-shape-id]").ok()??;
        shape_el.get_attribute("data-shape-id")?.parse().ok()
    }

    /// Remove popped shapes once their exit animation has played
    fn schedule_removal_check(game: Rc<RefCell<Game>>) {
        let delay_ms = game.borrow().round.config().removal_delay_ms;
        let Some(window) = web_sys::window() else { return };

        let callback = Closure::once_into_js(move || {
            let mut g = game.borrow_mut();
            if g.round.process_removals(now_ms()) > 0 {
                g.render();
            }
        });
        // +1 so the removal is due when the timer fires
        let timeout = delay_ms.ceil() as i32 + 1;
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            )
            .is_err()
        {
            log::warn!("Failed to schedule shape removal");
        }
    }

    fn setup_shape_clicks(container: &Element, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(id) = shape_id_from_event(&event) else { return };
            event.stop_propagation();

            let mut g = game.borrow_mut();
            if g.round.click_shape(id, now_ms()) {
                g.render();
                drop(g);
                schedule_removal_check(game.clone());
            }
        });
        container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(
        new_button: &Element,
        reset_button: &Element,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut g = game.borrow_mut();
                g.round.start_round();
                g.render();
            });
            new_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut g = game.borrow_mut();
                g.round.reset_round();
                g.render();
            });
            reset_button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Mute or unmute the pop sound and remember the choice
    fn setup_sound_toggle(button: &Element, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let label_target = button.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.stop_propagation();
            let mut g = game.borrow_mut();
            let mut mix = g.round.feedback().audio.mix();
            mix.set_muted(!mix.is_muted());
            g.round.feedback_mut().audio.set_mix(mix);

            g.settings.muted = mix.is_muted();
            g.settings.save();
            label_target.set_text_content(Some(sound_label(mix.is_muted())));
            log::info!("Sound {}", if mix.is_muted() { "muted" } else { "on" });
        });
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Tag name of the element a key event was aimed at
    fn key_target_tag(event: &KeyboardEvent) -> String {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|el| el.tag_name())
            .unwrap_or_default()
    }

    /// Any key pops a random shape, or starts a new round when none are left
    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if !key_pops_shape(event.repeat(), &key_target_tag(&event)) {
                return;
            }
            let mut g = game.borrow_mut();
            let popped = g.round.explode_random(now_ms());
            g.render();
            drop(g);
            if popped.is_some() {
                schedule_removal_check(game.clone());
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shape Counter (native) starting...");
    log::info!("Native mode plays a headless round - run with `trunk serve` for the web version");

    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round with simulated clicks and print what happened
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use shape_counter::{Recorder, Round, RoundPhase, Settings};

    let settings = Settings::load();
    let rng = Pcg32::from_rng(&mut rand::rng());
    let mut round = Round::new(settings.round_config(), rng, Recorder::new());
    round.start_round();

    println!("\nCount the shapes: {}", round.state().target);
    for shape in &round.state().shapes {
        println!(
            "  #{} {} {} at ({:.1}%, {:.1}%) rotated {:.0}°",
            shape.id,
            shape.color,
            shape.kind.as_str(),
            shape.pos.x,
            shape.pos.y,
            shape.rotation
        );
    }

    let mut now = 0.0;
    while round.phase() == RoundPhase::Active {
        round.explode_random(now);
        now += 250.0;
    }
    let removed = round.process_removals(now + round.config().removal_delay_ms);

    println!("Counted: {:?}", round.feedback().announced());
    println!("✓ Round complete, {} shapes cleared", removed);
}
