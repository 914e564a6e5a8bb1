use std::collections::BTreeMap;
use std::sync::Arc;

use ::noise::Perlin;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::attenuation::SpatialAttenuation;
use crate::envelope::Envelope;
use crate::error::ShakeError;
use crate::noise_source::NoiseSource;
use crate::shake::bounce::{
    DEFAULT_ANGLE_RANGE, DEFAULT_FREQUENCY, DEFAULT_JITTER, DEFAULT_OFFSET_RANGE,
    DEFAULT_START_DIRECTION, default_envelope,
};
use crate::shake::noise::DEFAULT_SCROLL_SPEED;
use crate::shake::{BounceShakeBuilder, DEFAULT_DURATION, NoiseShakeBuilder, ShakeGenerator};

/// Data-driven description of a bounce shake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceSettings {
    pub start_direction: Vec3,
    pub min_offset: f32,
    pub max_offset: f32,
    /// Radians.
    pub min_angle: f32,
    /// Radians.
    pub max_angle: f32,
    pub frequency: f32,
    pub jitter: f32,
    /// Seconds.
    pub duration: f32,
    pub envelope: Envelope,
    pub attenuation: SpatialAttenuation,
    /// Fixed RNG seed; unset draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for BounceSettings {
    fn default() -> Self {
        Self {
            start_direction: DEFAULT_START_DIRECTION,
            min_offset: DEFAULT_OFFSET_RANGE.0,
            max_offset: DEFAULT_OFFSET_RANGE.1,
            min_angle: DEFAULT_ANGLE_RANGE.0,
            max_angle: DEFAULT_ANGLE_RANGE.1,
            frequency: DEFAULT_FREQUENCY,
            jitter: DEFAULT_JITTER,
            duration: DEFAULT_DURATION,
            envelope: default_envelope(),
            attenuation: SpatialAttenuation::default(),
            seed: None,
        }
    }
}

impl BounceSettings {
    pub fn builder(&self) -> BounceShakeBuilder {
        let builder = ShakeGenerator::bounce()
            .start_direction(self.start_direction)
            .offset_amount(self.min_offset, self.max_offset)
            .angle_amount(self.min_angle, self.max_angle)
            .frequency(self.frequency)
            .jitter(self.jitter)
            .duration(self.duration)
            .envelope(self.envelope)
            .attenuation(self.attenuation);
        match self.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }

    pub fn build(&self) -> ShakeGenerator {
        self.builder().build()
    }
}

/// Data-driven description of a noise shake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub offset_amount: Vec3,
    /// Radians per axis.
    pub angle_amount: Vec3,
    pub scroll_speed: f32,
    /// Seconds.
    pub duration: f32,
    pub envelope: Envelope,
    pub attenuation: SpatialAttenuation,
    /// Seed for a Perlin source, used when the caller supplies none.
    pub noise_seed: Option<u32>,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            offset_amount: Vec3::ZERO,
            angle_amount: Vec3::ZERO,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            duration: DEFAULT_DURATION,
            envelope: Envelope::default(),
            attenuation: SpatialAttenuation::default(),
            noise_seed: None,
        }
    }
}

impl NoiseSettings {
    /// Builder with every field applied. `source` wins over `noise_seed`; with
    /// neither, the builder has no source and `build` will fail.
    pub fn builder(&self, source: Option<Arc<dyn NoiseSource>>) -> NoiseShakeBuilder {
        let builder = ShakeGenerator::noise()
            .offset_amount(self.offset_amount)
            .angle_amount(self.angle_amount)
            .scroll_speed(self.scroll_speed)
            .duration(self.duration)
            .envelope(self.envelope)
            .attenuation(self.attenuation);
        let source = source.or_else(|| {
            self.noise_seed
                .map(|seed| Arc::new(Perlin::new(seed)) as Arc<dyn NoiseSource>)
        });
        match source {
            Some(source) => builder.source(source),
            None => builder,
        }
    }

    pub fn build(
        &self,
        source: Option<Arc<dyn NoiseSource>>,
    ) -> Result<ShakeGenerator, ShakeError> {
        self.builder(source).build()
    }
}

/// Named shake presets, typically loaded from the `[presets]` table of a
/// config file.
///
/// ```toml
/// [presets.bounce.sword_hit]
/// frequency = 30.0
/// duration = 0.2
///
/// [presets.noise.explosion]
/// angle_amount = [0.025, 0.0, 0.04]
/// noise_seed = 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetLibrary {
    pub bounce: BTreeMap<String, BounceSettings>,
    pub noise: BTreeMap<String, NoiseSettings>,
}

impl PresetLibrary {
    pub fn is_empty(&self) -> bool {
        self.bounce.is_empty() && self.noise.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bounce.contains_key(name) || self.noise.contains_key(name)
    }

    /// Build the preset called `name`. Bounce presets are checked first.
    /// `source` only matters for noise presets.
    pub fn build(
        &self,
        name: &str,
        source: Option<Arc<dyn NoiseSource>>,
    ) -> Result<ShakeGenerator, ShakeError> {
        if let Some(bounce) = self.bounce.get(name) {
            return Ok(bounce.build());
        }
        match self.noise.get(name) {
            Some(noise) => noise.build(source),
            None => Err(ShakeError::UnknownPreset(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use ::noise::Constant;

    use super::*;
    use crate::power::Degree;
    use crate::shake::ShakeKind;

    const LIBRARY: &str = r#"
[bounce.sword_hit]
start_direction = [-1.0, 0.0, 0.0]
min_offset = 0.05
max_offset = 0.13
min_angle = 0.01
max_angle = 0.04
frequency = 30.0
jitter = 0.2
duration = 0.2
seed = 9

[bounce.sword_hit.envelope]
attack = 10.0
sustain = 1.0
decay = 0.7
degree = "quadratic"

[noise.footstep]
offset_amount = [0.1, 0.1, 0.0]
angle_amount = [0.025, 0.0, 0.04]
scroll_speed = 10.0
duration = 1.0

[noise.footstep.attenuation]
min_distance = 10.0
max_distance = 50.0
source = [0.0, 0.0, 5.0]

[noise.explosion]
angle_amount = [0.025, 0.0, 0.04]
noise_seed = 7
"#;

    fn library() -> PresetLibrary {
        toml::from_str(LIBRARY).unwrap()
    }

    #[test]
    fn parses_bounce_preset() {
        let lib = library();
        let hit = &lib.bounce["sword_hit"];
        assert_eq!(hit.start_direction, Vec3::NEG_X);
        assert_eq!(hit.frequency, 30.0);
        assert_eq!(hit.envelope.attack(), 10.0);
        assert_eq!(hit.envelope.degree(), Degree::Quadratic);
        // Unset fields keep their defaults.
        assert_eq!(hit.attenuation, SpatialAttenuation::default());

        let g = lib.build("sword_hit", None).unwrap();
        assert_eq!(g.total(), 0.2);
        assert!(matches!(g.kind(), ShakeKind::Bounce(_)));
    }

    #[test]
    fn empty_bounce_preset_matches_builder_defaults() {
        let settings: BounceSettings = toml::from_str("seed = 21").unwrap();
        let mut from_preset = settings.build();
        let mut from_builder = ShakeGenerator::bounce().seed(21).build();

        assert_eq!(from_preset.total(), from_builder.total());
        assert_eq!(from_preset.envelope(), from_builder.envelope());
        assert_eq!(from_preset.attenuation(), from_builder.attenuation());
        let (ShakeKind::Bounce(a), ShakeKind::Bounce(b)) = (from_preset.kind(), from_builder.kind())
        else {
            panic!("expected two bounce shakes");
        };
        assert_eq!(a.start_direction(), b.start_direction());
        assert_eq!(a.offset_range(), b.offset_range());
        assert_eq!(a.angle_range(), b.angle_range());
        assert_eq!(a.frequency(), b.frequency());
        assert_eq!(a.jitter(), b.jitter());

        for _ in 0..60 {
            assert_eq!(
                from_preset.produce_displacement(0.016),
                from_builder.produce_displacement(0.016)
            );
        }
    }

    #[test]
    fn noise_preset_needs_a_source() {
        let lib = library();
        let err = lib.build("footstep", None).unwrap_err();
        assert!(matches!(err, ShakeError::MissingNoiseSource));

        let g = lib.build("footstep", Some(Arc::new(Constant::new(0.1)))).unwrap();
        assert_eq!(g.attenuation().max_distance(), 50.0);
        assert_eq!(g.attenuation().source(), Some(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn noise_seed_supplies_perlin() {
        let g = library().build("explosion", None).unwrap();
        assert!(matches!(g.kind(), ShakeKind::Noise(_)));
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = library().build("earthquake", None).unwrap_err();
        assert!(matches!(err, ShakeError::UnknownPreset(name) if name == "earthquake"));
    }

    #[test]
    fn empty_library_from_empty_toml() {
        let lib: PresetLibrary = toml::from_str("").unwrap();
        assert!(lib.is_empty());
        assert!(library().contains("explosion"));
    }
}
