//! DOM projection helpers
//!
//! Turns round state into class names, inline styles and labels, and decides
//! which page events reach the round. The wasm entry point applies them to
//! elements; keeping them here lets native tests check the projection.

use crate::sim::{RoundState, Shape, ShapeKind};

/// Stylesheet injected at startup
pub const STYLESHEET: &str = "
.App { position: fixed; inset: 0; overflow: hidden; font-family: sans-serif; user-select: none; }
.number-display { position: absolute; top: 2%; width: 100%; text-align: center; font-size: 64px; font-weight: bold; }
.button-container { position: absolute; bottom: 3%; width: 100%; display: flex; justify-content: center; gap: 24px; z-index: 2; }
.control-button { font-size: 28px; padding: 12px 32px; border-radius: 16px; border: none; cursor: pointer; }
.shapes-container { position: absolute; inset: 0; }
.shape { position: absolute; cursor: pointer; translate: -50% -50%; transition: opacity 0.5s, scale 0.5s; line-height: 1; }
.shape.circle { border-radius: 50%; }
.shape.triangle { width: 0; height: 0; border-style: solid; border-top-width: 0; border-color: transparent; }
.shape.exploding { opacity: 0; scale: 1.8; pointer-events: none; }
";

/// Class list for a shape element
pub fn shape_class(shape: &Shape) -> String {
    if shape.exploded {
        format!("shape exploding {}", shape.kind.as_str())
    } else {
        format!("shape {}", shape.kind.as_str())
    }
}

/// Inline style for a shape element
pub fn shape_style(shape: &Shape, size_px: f32) -> String {
    let mut style = format!(
        "left: {:.2}%; top: {:.2}%; transform: rotate({:.1}deg);",
        shape.pos.x, shape.pos.y, shape.rotation
    );
    let extra = match shape.kind {
        ShapeKind::Circle | ShapeKind::Square => format!(
            " background-color: {}; width: {}px; height: {}px;",
            shape.color, size_px, size_px
        ),
        ShapeKind::Triangle => format!(
            " border-bottom-color: {}; border-left-width: {}px; border-right-width: {}px; border-bottom-width: {}px;",
            shape.color,
            size_px / 2.0,
            size_px / 2.0,
            size_px
        ),
        ShapeKind::Star | ShapeKind::Heart => {
            format!(" color: {}; font-size: {}px;", shape.color, size_px)
        }
    };
    style.push_str(&extra);
    style
}

/// "cleared / target" header text
pub fn count_label(state: &RoundState) -> String {
    format!("{} / {}", state.cleared, state.target)
}

/// Text of the sound toggle button
pub fn sound_label(muted: bool) -> &'static str {
    if muted { "Sound Off" } else { "Sound On" }
}

/// Should a keydown on an element with `target_tag` pop a shape?
///
/// Auto-repeat is ignored, and so are keys aimed at controls, where Enter
/// or Space already activates the control itself.
pub fn key_pops_shape(repeat: bool, target_tag: &str) -> bool {
    const CONTROLS: [&str; 4] = ["button", "input", "select", "textarea"];
    !repeat && !CONTROLS.iter().any(|tag| target_tag.eq_ignore_ascii_case(tag))
}
