use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use super::{ShakeCommon, ShakeGenerator, ShakeKind, shake_common_setters};
use crate::displacement::Displacement;
use crate::error::ShakeError;
use crate::noise_source::NoiseSource;

/// Coordinate offsets that decorrelate the six channels (offset x/y/z, then
/// angle x/y/z) when they share one noise source.
pub const CHANNEL_OFFSETS: [f32; 6] = [0.37, 113.71, 227.13, 341.59, 457.83, 571.29];

/// Default scroll rate through the noise, in noise units per second.
pub const DEFAULT_SCROLL_SPEED: f32 = 8.0;

/// Smooth, continuous motion sampled from coherent noise. Suited to longer
/// rumbles such as explosions, footsteps and engines.
#[derive(Clone)]
pub struct NoiseShake {
    source: Arc<dyn NoiseSource>,
    offset_amount: Vec3,
    angle_amount: Vec3,
    scroll_speed: f32,
    cursor: f32,
}

impl fmt::Debug for NoiseShake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseShake")
            .field("offset_amount", &self.offset_amount)
            .field("angle_amount", &self.angle_amount)
            .field("scroll_speed", &self.scroll_speed)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl NoiseShake {
    pub fn offset_amount(&self) -> Vec3 {
        self.offset_amount
    }

    pub fn angle_amount(&self) -> Vec3 {
        self.angle_amount
    }

    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    /// Current sampling position along the noise.
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn produce_displacement(&mut self, delta: f32) -> Displacement {
        self.cursor += delta * self.scroll_speed;
        let offset = Vec3::new(
            self.channel(0, self.offset_amount.x),
            self.channel(1, self.offset_amount.y),
            self.channel(2, self.offset_amount.z),
        );
        let angles = Vec3::new(
            self.channel(3, self.angle_amount.x),
            self.channel(4, self.angle_amount.y),
            self.channel(5, self.angle_amount.z),
        );
        Displacement::new(offset, angles)
    }

    fn channel(&self, index: usize, amount: f32) -> f32 {
        if amount == 0.0 {
            return 0.0;
        }
        self.source.sample_1d(self.cursor + CHANNEL_OFFSETS[index], index as u32) * amount
    }
}

pub struct NoiseShakeBuilder {
    source: Option<Arc<dyn NoiseSource>>,
    offset_amount: Vec3,
    angle_amount: Vec3,
    scroll_speed: f32,
    common: ShakeCommon,
}

impl Default for NoiseShakeBuilder {
    fn default() -> Self {
        Self {
            source: None,
            offset_amount: Vec3::ZERO,
            angle_amount: Vec3::ZERO,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            common: ShakeCommon::default(),
        }
    }
}

impl NoiseShakeBuilder {
    shake_common_setters!();

    /// Noise to sample. Sources are shared, so one generator can back any
    /// number of shakes.
    pub fn source(mut self, source: Arc<dyn NoiseSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Peak positional offset per axis.
    pub fn offset_amount(mut self, amount: Vec3) -> Self {
        self.offset_amount = amount;
        self
    }

    /// Peak rotation per axis, in radians.
    pub fn angle_amount(mut self, amount: Vec3) -> Self {
        self.angle_amount = amount;
        self
    }

    /// How fast the cursor moves through the noise. Acts as frequency.
    pub fn scroll_speed(mut self, speed: f32) -> Self {
        self.scroll_speed = speed;
        self
    }

    pub fn build(self) -> Result<ShakeGenerator, ShakeError> {
        let Some(source) = self.source else {
            tracing::warn!("Noise shake built without a noise source");
            return Err(ShakeError::MissingNoiseSource);
        };
        let shake = NoiseShake {
            source,
            offset_amount: self.offset_amount,
            angle_amount: self.angle_amount,
            scroll_speed: self.scroll_speed,
            cursor: 0.0,
        };
        Ok(ShakeGenerator::from_parts(ShakeKind::Noise(shake), self.common))
    }
}
