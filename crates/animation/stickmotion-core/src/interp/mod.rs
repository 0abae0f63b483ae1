//! Named easing curves.
//!
//! Actions reference easing by name (e.g. in keyframe JSON); each name
//! resolves to cubic-bezier timing control points evaluated by
//! `functions::bezier_ease_t`. Unknown names fall back to the default
//! smooth in-out curve.

pub mod functions;

use functions::bezier_ease_t;

/// A named easing curve mapping normalized progress to eased progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    Power2In,
    Power2Out,
    Power2InOut,
    BackOut,
}

impl Easing {
    /// Resolve a curve identifier; `None` for names this registry does not know.
    pub fn from_name(name: &str) -> Option<Easing> {
        match name {
            "linear" => Some(Easing::Linear),
            "ease-in" => Some(Easing::EaseIn),
            "ease-out" => Some(Easing::EaseOut),
            "ease-in-out" => Some(Easing::EaseInOut),
            "power2-in" => Some(Easing::Power2In),
            "power2-out" => Some(Easing::Power2Out),
            "power2-in-out" => Some(Easing::Power2InOut),
            "back-out" => Some(Easing::BackOut),
            _ => None,
        }
    }

    /// Resolve a curve identifier with fallback to the default smooth in-out.
    pub fn from_name_or_default(name: &str) -> Easing {
        Easing::from_name(name).unwrap_or_else(|| {
            log::debug!("unknown easing curve '{name}', using default");
            Easing::default()
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::Power2In => "power2-in",
            Easing::Power2Out => "power2-out",
            Easing::Power2InOut => "power2-in-out",
            Easing::BackOut => "back-out",
        }
    }

    /// Cubic-bezier timing control points (x1, y1, x2, y2).
    fn control_points(&self) -> [f32; 4] {
        match self {
            Easing::Linear => [0.0, 0.0, 1.0, 1.0],
            Easing::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Easing::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Easing::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            Easing::Power2In => [0.55, 0.085, 0.68, 0.53],
            Easing::Power2Out => [0.25, 0.46, 0.45, 0.94],
            Easing::Power2InOut => [0.455, 0.03, 0.515, 0.955],
            Easing::BackOut => [0.175, 0.885, 0.32, 1.275],
        }
    }

    /// Map normalized progress t ∈ [0,1] to eased progress.
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        let [x1, y1, x2, y2] = self.control_points();
        bezier_ease_t(t, x1, y1, x2, y2)
    }
}
