//! Coherent noise sampling for [`NoiseShake`](crate::shake::noise::NoiseShake).
//!
//! Any `noise::NoiseFn<f64, 2>` works as a source: the coordinate runs along X
//! and the channel picks a row along Y, so one generator can feed all six
//! displacement channels without touching its seed.

use ::noise::NoiseFn;

/// Row spacing between channels when sampling a 2D noise function.
/// Kept off integer values since gradient noise is zero on lattice points.
const CHANNEL_ROW_SPACING: f64 = 31.17;

/// A smooth 1D signal in `[-1, 1]`, sampled per displacement channel.
///
/// Implementations must be pure: the same `(coordinate, channel)` always
/// returns the same value.
pub trait NoiseSource: Send + Sync {
    fn sample_1d(&self, coordinate: f32, channel: u32) -> f32;
}

impl<N> NoiseSource for N
where
    N: NoiseFn<f64, 2> + Send + Sync,
{
    fn sample_1d(&self, coordinate: f32, channel: u32) -> f32 {
        let row = f64::from(channel) * CHANNEL_ROW_SPACING + 0.5;
        self.get([f64::from(coordinate), row]).clamp(-1.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::noise::{Constant, Perlin};

    #[test]
    fn constant_source_ignores_channel() {
        let c = Constant::new(0.25);
        for channel in 0..6 {
            assert_eq!(c.sample_1d(17.3, channel), 0.25);
        }
    }

    #[test]
    fn perlin_is_deterministic_and_bounded() {
        let perlin = Perlin::new(7);
        for i in 0..200 {
            let x = i as f32 * 0.137;
            let a = perlin.sample_1d(x, 2);
            assert_eq!(a, perlin.sample_1d(x, 2));
            assert!((-1.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn channels_are_decorrelated() {
        let perlin = Perlin::new(3);
        let differs = (0..50).any(|i| {
            let x = i as f32 * 0.21 + 0.05;
            (perlin.sample_1d(x, 0) - perlin.sample_1d(x, 1)).abs() > 1e-3
        });
        assert!(differs);
    }
}
