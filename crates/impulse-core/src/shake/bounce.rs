use std::f32::consts::PI;

use glam::{EulerRot, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ShakeCommon, ShakeGenerator, ShakeKind, shake_common_setters};
use crate::displacement::Displacement;
use crate::envelope::Envelope;
use crate::power::Degree;

/// Axis the bounce direction is jittered around. Matches a camera looking
/// down negative Z.
pub const FORWARD: Vec3 = Vec3::NEG_Z;

pub const DEFAULT_START_DIRECTION: Vec3 = Vec3::X;
/// Offset range as `(min, max)`.
pub const DEFAULT_OFFSET_RANGE: (f32, f32) = (0.5, 1.0);
/// Angle range in radians as `(min, max)`.
pub const DEFAULT_ANGLE_RANGE: (f32, f32) = (0.05, 0.2);
pub const DEFAULT_FREQUENCY: f32 = 1.0;
pub const DEFAULT_JITTER: f32 = 0.5;

/// Largest offset or angle magnitude a bounce accepts. Keeps the width of a
/// sampling range finite.
pub const MAX_AMOUNT: f32 = f32::MAX / 4.0;

/// Near-rectangular envelope: full strength almost immediately, cut off at
/// the end.
pub fn default_envelope() -> Envelope {
    Envelope::new(1000.0, 10.0, 1000.0, Degree::Linear)
}

/// Floors at zero, caps at [`MAX_AMOUNT`]. NaN becomes zero.
fn clamp_amount(value: f32) -> f32 {
    value.max(0.0).min(MAX_AMOUNT)
}

/// Back-and-forth motion along a direction that is re-randomized every half
/// cycle. Suited to short, punchy hits.
#[derive(Debug, Clone)]
pub struct BounceShake {
    start_direction: Vec3,
    min_offset: f32,
    max_offset: f32,
    min_angle: f32,
    max_angle: f32,
    frequency: f32,
    jitter: f32,

    phase: f32,
    last_sign: f32,
    direction: Vec3,
    offset_magnitude: f32,
    angle_magnitude: f32,
    rng: StdRng,
}

impl BounceShake {
    pub fn start_direction(&self) -> Vec3 {
        self.start_direction
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn jitter(&self) -> f32 {
        self.jitter
    }

    pub fn offset_range(&self) -> (f32, f32) {
        (self.min_offset, self.max_offset)
    }

    pub fn angle_range(&self) -> (f32, f32) {
        (self.min_angle, self.max_angle)
    }

    /// Accumulated `delta * frequency`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Direction used for the current half cycle.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn produce_displacement(&mut self, delta: f32) -> Displacement {
        self.phase += delta * self.frequency;
        let pivot = self.phase.sin();

        let sign = sign(pivot);
        if sign != self.last_sign {
            self.begin_half_cycle();
        }
        self.last_sign = sign;

        let offset = self.direction * self.offset_magnitude * pivot;
        let angles = swing_angles(self.direction, pivot * self.angle_magnitude);
        Displacement::new(offset, angles)
    }

    fn begin_half_cycle(&mut self) {
        let spin = uniform(&mut self.rng, -self.jitter, self.jitter);
        self.direction =
            (Quat::from_axis_angle(FORWARD, spin) * self.start_direction).normalize_or_zero();
        self.offset_magnitude = uniform(&mut self.rng, self.min_offset, self.max_offset);
        self.angle_magnitude = uniform(&mut self.rng, self.min_angle, self.max_angle);
    }
}

/// -1, 0 or 1. Unlike `f32::signum`, zero maps to zero.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn uniform(rng: &mut StdRng, a: f32, b: f32) -> f32 {
    if a == b {
        return a;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}

/// Euler angles (x, y, z) of a rotation by `angle` about `FORWARD x direction`.
/// A direction parallel to `FORWARD` has no swing axis and yields zero.
fn swing_angles(direction: Vec3, angle: f32) -> Vec3 {
    let axis = FORWARD.cross(direction).normalize_or_zero();
    if axis == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let (y, x, z) = Quat::from_axis_angle(axis, angle).to_euler(EulerRot::YXZ);
    Vec3::new(x, y, z)
}

pub struct BounceShakeBuilder {
    start_direction: Vec3,
    min_offset: f32,
    max_offset: f32,
    min_angle: f32,
    max_angle: f32,
    frequency: f32,
    jitter: f32,
    seed: Option<u64>,
    common: ShakeCommon,
}

impl Default for BounceShakeBuilder {
    fn default() -> Self {
        Self {
            start_direction: DEFAULT_START_DIRECTION,
            min_offset: DEFAULT_OFFSET_RANGE.0,
            max_offset: DEFAULT_OFFSET_RANGE.1,
            min_angle: DEFAULT_ANGLE_RANGE.0,
            max_angle: DEFAULT_ANGLE_RANGE.1,
            frequency: DEFAULT_FREQUENCY,
            jitter: DEFAULT_JITTER,
            seed: None,
            common: ShakeCommon {
                envelope: default_envelope(),
                ..ShakeCommon::default()
            },
        }
    }
}

impl BounceShakeBuilder {
    shake_common_setters!();

    /// Axis the shake bounces along. Normalized; a zero vector stays zero
    /// and produces no positional motion.
    pub fn start_direction(mut self, direction: Vec3) -> Self {
        self.start_direction = direction.normalize_or_zero();
        if self.start_direction == Vec3::ZERO {
            tracing::debug!(?direction, "Bounce shake has no usable start direction");
        }
        self
    }

    /// Positional amplitude range, resampled every half cycle. Each bound is
    /// clamped to `[0, MAX_AMOUNT]`.
    pub fn offset_amount(mut self, min: f32, max: f32) -> Self {
        self.min_offset = clamp_amount(min);
        self.max_offset = clamp_amount(max);
        self
    }

    /// Angular amplitude range in radians, resampled every half cycle. Each
    /// bound is clamped to `[0, MAX_AMOUNT]`.
    pub fn angle_amount(mut self, min: f32, max: f32) -> Self {
        self.min_angle = clamp_amount(min);
        self.max_angle = clamp_amount(max);
        self
    }

    /// Oscillation rate in radians of phase per second. Floored at 1.
    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency.max(1.0);
        self
    }

    /// Maximum random tilt of the direction, in radians. Clamped to
    /// `[0, PI]`, which already reaches every direction in the plane.
    pub fn jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.max(0.0).min(PI);
        self
    }

    /// Seed the per-shake RNG for a replayable shake.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> ShakeGenerator {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let shake = BounceShake {
            start_direction: self.start_direction,
            min_offset: self.min_offset,
            max_offset: self.max_offset,
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            frequency: self.frequency,
            jitter: self.jitter,
            phase: 0.0,
            last_sign: 0.0,
            direction: self.start_direction,
            offset_magnitude: 0.0,
            angle_magnitude: 0.0,
            rng,
        };
        ShakeGenerator::from_parts(ShakeKind::Bounce(shake), self.common)
    }
}
