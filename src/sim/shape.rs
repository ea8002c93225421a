//! Shape entities and the fixed kind/color vocabularies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape kinds (a round uses a single kind for all its shapes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Heart,
    ];

    /// CSS class used by the renderer
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Heart => "heart",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "circle" => Some(ShapeKind::Circle),
            "square" => Some(ShapeKind::Square),
            "triangle" => Some(ShapeKind::Triangle),
            "star" => Some(ShapeKind::Star),
            "heart" => Some(ShapeKind::Heart),
            _ => None,
        }
    }

    /// Text glyph for kinds drawn as characters rather than boxes
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            ShapeKind::Star => Some("★"),
            ShapeKind::Heart => Some("❤"),
            _ => None,
        }
    }

    /// Pick a kind uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Shape fill colors
pub const PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

/// Pick a palette color uniformly
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PALETTE[rng.random_range(0..PALETTE.len())]
}

/// A clickable shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: u32,
    pub kind: ShapeKind,
    /// Hex fill color from [`PALETTE`]
    pub color: String,
    /// Center position in percent of the play area
    pub pos: Vec2,
    /// Rotation in degrees, [0, 360)
    pub rotation: f32,
    /// Clicked and waiting for its exit animation to finish
    pub exploded: bool,
}

impl Shape {
    pub fn new(id: u32, kind: ShapeKind, color: &str, pos: Vec2, rotation: f32) -> Self {
        Self {
            id,
            kind,
            color: color.to_string(),
            pos,
            rotation,
            exploded: false,
        }
    }

    /// Can this shape still be popped?
    pub fn is_live(&self) -> bool {
        !self.exploded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ShapeKind::from_str("HEART"), Some(ShapeKind::Heart));
        assert_eq!(ShapeKind::from_str("hexagon"), None);
    }

    #[test]
    fn test_only_star_and_heart_have_glyphs() {
        let with_glyph: Vec<_> = ShapeKind::ALL
            .iter()
            .filter(|k| k.glyph().is_some())
            .collect();
        assert_eq!(with_glyph, [&ShapeKind::Star, &ShapeKind::Heart]);
    }

    #[test]
    fn test_random_picks_cover_vocabularies() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut kinds = std::collections::HashSet::new();
        let mut colors = std::collections::HashSet::new();
        for _ in 0..500 {
            kinds.insert(ShapeKind::random(&mut rng));
            colors.insert(random_color(&mut rng));
        }
        assert_eq!(kinds.len(), ShapeKind::ALL.len());
        assert_eq!(colors.len(), PALETTE.len());
    }
}
