pub mod bounce;
pub mod noise;

use std::fmt;

use glam::Vec3;

use crate::attenuation::SpatialAttenuation;
use crate::displacement::Displacement;
use crate::envelope::Envelope;

pub use self::bounce::{BounceShake, BounceShakeBuilder};
pub use self::noise::{NoiseShake, NoiseShakeBuilder};

/// Lifetime given to a shake when the builder sets none.
pub const DEFAULT_DURATION: f32 = 1.0;

/// Motion source for shakes that are neither bounce nor noise.
///
/// Called once per frame while the shake is alive. The director applies the
/// envelope, attenuation and amplitude override to whatever this returns.
pub trait ShakePattern: Send {
    fn produce_displacement(&mut self, delta: f32) -> Displacement;
}

/// The closed set of shake motions.
pub enum ShakeKind {
    Bounce(BounceShake),
    Noise(NoiseShake),
    Custom(Box<dyn ShakePattern>),
}

impl ShakeKind {
    pub fn produce_displacement(&mut self, delta: f32) -> Displacement {
        match self {
            Self::Bounce(b) => b.produce_displacement(delta),
            Self::Noise(n) => n.produce_displacement(delta),
            Self::Custom(p) => p.produce_displacement(delta),
        }
    }
}

impl fmt::Debug for ShakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounce(b) => f.debug_tuple("Bounce").field(b).finish(),
            Self::Noise(n) => f.debug_tuple("Noise").field(n).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Duration, envelope and attenuation shared by every builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShakeCommon {
    pub(crate) duration: f32,
    pub(crate) envelope: Envelope,
    pub(crate) attenuation: SpatialAttenuation,
}

impl Default for ShakeCommon {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            envelope: Envelope::default(),
            attenuation: SpatialAttenuation::default(),
        }
    }
}

/// Generates the `duration`, `envelope` and `attenuation` setters for a
/// builder holding a `common: ShakeCommon` field.
macro_rules! shake_common_setters {
    () => {
        /// How long the shake lasts, in seconds. Negative values become zero.
        pub fn duration(mut self, seconds: f32) -> Self {
            self.common.duration = seconds.max(0.0);
            self
        }

        pub fn envelope(mut self, envelope: $crate::envelope::Envelope) -> Self {
            self.common.envelope = envelope;
            self
        }

        pub fn attenuation(mut self, attenuation: $crate::attenuation::SpatialAttenuation) -> Self {
            self.common.attenuation = attenuation;
            self
        }
    };
}
pub(crate) use shake_common_setters;

/// One shake event: its motion plus the state that decides how loud it is
/// and when it ends.
///
/// Generators are only created through the builders, so every generator in a
/// director's active set is fully configured.
#[derive(Debug)]
pub struct ShakeGenerator {
    remaining: f32,
    total: f32,
    envelope: Envelope,
    attenuation: SpatialAttenuation,
    kind: ShakeKind,
}

impl ShakeGenerator {
    pub fn bounce() -> BounceShakeBuilder {
        BounceShakeBuilder::default()
    }

    pub fn noise() -> NoiseShakeBuilder {
        NoiseShakeBuilder::default()
    }

    pub fn custom(pattern: impl ShakePattern + 'static) -> CustomShakeBuilder {
        CustomShakeBuilder {
            pattern: Box::new(pattern),
            common: ShakeCommon::default(),
        }
    }

    pub(crate) fn from_parts(kind: ShakeKind, common: ShakeCommon) -> Self {
        Self {
            remaining: common.duration,
            total: common.duration,
            envelope: common.envelope,
            attenuation: common.attenuation,
            kind,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Duration the shake was created with. Never changes.
    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn attenuation(&self) -> &SpatialAttenuation {
        &self.attenuation
    }

    pub fn kind(&self) -> &ShakeKind {
        &self.kind
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Fraction of the lifetime already spent, in `[0, 1]`.
    pub fn normalized_time(&self) -> f32 {
        if self.total <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.total).clamp(0.0, 1.0)
    }

    /// Spend `delta` seconds of lifetime. Returns whether the shake is still
    /// active. Remaining time only ever decreases.
    pub fn advance(&mut self, delta: f32) -> bool {
        self.remaining -= delta.max(0.0);
        self.is_active()
    }

    /// Envelope at the current time times attenuation at `observer`.
    pub fn weight(&self, observer: Vec3) -> f32 {
        self.envelope.evaluate(self.normalized_time()) * self.attenuation.evaluate(observer)
    }

    /// Raw, unweighted displacement for this frame.
    pub fn produce_displacement(&mut self, delta: f32) -> Displacement {
        self.kind.produce_displacement(delta)
    }
}

pub struct CustomShakeBuilder {
    pattern: Box<dyn ShakePattern>,
    common: ShakeCommon,
}

impl CustomShakeBuilder {
    shake_common_setters!();

    pub fn build(self) -> ShakeGenerator {
        ShakeGenerator::from_parts(ShakeKind::Custom(self.pattern), self.common)
    }
}
