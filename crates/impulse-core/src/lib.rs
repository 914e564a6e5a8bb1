pub mod attenuation;
pub mod displacement;
pub mod envelope;
pub mod error;
pub mod noise_source;
pub mod power;
pub mod settings;
pub mod shake;

pub use attenuation::SpatialAttenuation;
pub use displacement::Displacement;
pub use envelope::Envelope;
pub use error::ShakeError;
pub use noise_source::NoiseSource;
pub use power::{Degree, power};
pub use shake::{ShakeGenerator, ShakeKind, ShakePattern};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use glam::Vec3;

    use crate::displacement::Displacement;
    use crate::envelope::Envelope;
    use crate::power::Degree;
    use crate::shake::{ShakeGenerator, ShakePattern};

    /// Emits the same displacement every frame.
    #[derive(Debug, Clone, Copy)]
    pub struct SteadyPattern(pub Displacement);

    impl ShakePattern for SteadyPattern {
        fn produce_displacement(&mut self, _delta: f32) -> Displacement {
            self.0
        }
    }

    /// Envelope that is 1 for the whole lifetime apart from the first and
    /// last thousandth of a unit.
    pub fn flat_envelope() -> Envelope {
        Envelope::new(1000.0, 1000.0, 1000.0, Degree::Linear)
    }

    /// A custom shake emitting `offset` at full strength for `duration` seconds.
    pub fn steady_shake(offset: Vec3, duration: f32) -> ShakeGenerator {
        ShakeGenerator::custom(SteadyPattern(Displacement::from_offset(offset)))
            .duration(duration)
            .envelope(flat_envelope())
            .build()
    }

    /// Assert two displacements agree on every component within `eps`.
    pub fn assert_displacement_near(actual: Displacement, expected: Displacement, eps: f32) {
        assert!(
            actual.abs_diff_eq(&expected, eps),
            "displacement mismatch (eps {eps}):\n  actual:   {actual}\n  expected: {expected}"
        );
    }

    /// Tick `generator` like a director would, returning the weighted output
    /// of each frame until it expires or `max_frames` is reached.
    pub fn run_generator(
        generator: &mut ShakeGenerator,
        observer: Vec3,
        dt: f32,
        max_frames: usize,
    ) -> Vec<Displacement> {
        let mut frames = Vec::new();
        for _ in 0..max_frames {
            if !generator.advance(dt) {
                break;
            }
            let weight = generator.weight(observer);
            frames.push(generator.produce_displacement(dt) * weight);
        }
        frames
    }
}
