use serde::{Deserialize, Serialize};

/// Exponent used to shape envelope and attenuation curves.
/// Higher degrees give a smoother start and a sharper peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degree {
    Linear,
    #[default]
    Quadratic,
    Cubic,
}

/// Raise `value` to the power selected by `degree`.
///
/// Expects `value` in `[0, 1]`: squaring drops the sign, so never pass a raw
/// signed offset through here.
pub fn power(value: f32, degree: Degree) -> f32 {
    match degree {
        Degree::Linear => value,
        Degree::Quadratic => value * value,
        Degree::Cubic => value * value * value,
    }
}
