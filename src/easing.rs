//! Timing curves for animated transitions.
//!
//! An easing maps normalized elapsed time to normalized progress. The
//! scheduler samples the active curve once per tick; anything implementing
//! [`Easing`] plugs in, including plain closures.

use std::f32::consts::PI;

/// Maps normalized time `t` in [0, 1] to normalized progress in [0, 1].
///
/// Implementations must return 0 at `t == 0` and 1 at `t == 1`; between
/// those they are free to overshoot or dip if a curve calls for it.
pub trait Easing {
    /// Progress at normalized time `t`.
    fn progress(&self, t: f32) -> f32;
}

impl<F> Easing for F
where
    F: Fn(f32) -> f32,
{
    fn progress(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Built-in timing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    /// Constant-rate progress.
    Linear,
    /// Quadratic acceleration from rest.
    QuadIn,
    /// Quadratic deceleration to rest.
    QuadOut,
    /// Quadratic acceleration then deceleration.
    QuadInOut,
    /// Cubic acceleration from rest.
    CubicIn,
    /// Cubic deceleration to rest.
    CubicOut,
    /// Cubic acceleration then deceleration.
    CubicInOut,
    /// Sinusoidal acceleration from rest.
    SineIn,
    /// Sinusoidal deceleration to rest.
    SineOut,
    /// Sinusoidal acceleration then deceleration. The default curve.
    #[default]
    SineInOut,
}

impl Curve {
    /// Look up a curve by its kebab-case name, e.g. `"sine-in-out"`.
    ///
    /// Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "quad-in" => Some(Self::QuadIn),
            "quad-out" => Some(Self::QuadOut),
            "quad-in-out" => Some(Self::QuadInOut),
            "cubic-in" => Some(Self::CubicIn),
            "cubic-out" => Some(Self::CubicOut),
            "cubic-in-out" => Some(Self::CubicInOut),
            "sine-in" => Some(Self::SineIn),
            "sine-out" => Some(Self::SineOut),
            "sine-in-out" => Some(Self::SineInOut),
            _ => None,
        }
    }

    /// The kebab-case name accepted by [`Curve::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::QuadIn => "quad-in",
            Self::QuadOut => "quad-out",
            Self::QuadInOut => "quad-in-out",
            Self::CubicIn => "cubic-in",
            Self::CubicOut => "cubic-out",
            Self::CubicInOut => "cubic-in-out",
            Self::SineIn => "sine-in",
            Self::SineOut => "sine-out",
            Self::SineInOut => "sine-in-out",
        }
    }
}

impl Easing for Curve {
    fn progress(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -((t * PI).cos() - 1.0) / 2.0,
        }
    }
}
