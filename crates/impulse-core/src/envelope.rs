use serde::{Deserialize, Serialize};

use crate::power::{Degree, power};

/// Lower bound for attack and decay rates; keeps `1 / rate` finite.
pub const MIN_RATE: f32 = 0.1;

/// Attack/sustain/decay amplitude profile over a shake's normalized lifetime.
///
/// `attack` and `decay` are rates: the rising edge spans `1 / attack` units and
/// the falling edge `1 / decay` units, with `sustain` units at full amplitude in
/// between. The whole profile is stretched over the shake's duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "EnvelopeFields")]
pub struct Envelope {
    attack: f32,
    sustain: f32,
    decay: f32,
    degree: Degree,
}

#[derive(Deserialize)]
#[serde(default)]
struct EnvelopeFields {
    attack: f32,
    sustain: f32,
    decay: f32,
    degree: Degree,
}

impl Default for EnvelopeFields {
    fn default() -> Self {
        Self {
            attack: 1.0,
            sustain: 1.0,
            decay: 1.0,
            degree: Degree::Quadratic,
        }
    }
}

impl From<EnvelopeFields> for Envelope {
    fn from(f: EnvelopeFields) -> Self {
        Self::new(f.attack, f.sustain, f.decay, f.degree)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        EnvelopeFields::default().into()
    }
}

impl Envelope {
    pub fn new(attack: f32, sustain: f32, decay: f32, degree: Degree) -> Self {
        Self {
            attack: attack.max(MIN_RATE),
            sustain: sustain.max(0.0),
            decay: decay.max(MIN_RATE),
            degree,
        }
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn set_attack(&mut self, attack: f32) {
        self.attack = attack.max(MIN_RATE);
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn set_sustain(&mut self, sustain: f32) {
        self.sustain = sustain.max(0.0);
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.max(MIN_RATE);
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn set_degree(&mut self, degree: Degree) {
        self.degree = degree;
    }

    /// Amplitude at `normalized_time`, clamped to `[0, 1]`.
    pub fn evaluate(&self, normalized_time: f32) -> f32 {
        let t = normalized_time.clamp(0.0, 1.0);
        let rise = 1.0 / self.attack;
        let fall = 1.0 / self.decay;
        let hold_end = rise + self.sustain;
        let limit = hold_end + fall;
        let x = t * limit;

        if x > 0.0 && x < rise {
            power((self.attack * x).min(1.0), self.degree)
        } else if x >= rise && x < hold_end {
            1.0
        } else if x >= hold_end && x < limit {
            // Rounding at either edge can push the base a hair outside [0, 1].
            power((1.0 - (x - hold_end) * self.decay).clamp(0.0, 1.0), self.degree)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEGREES: [Degree; 3] = [Degree::Linear, Degree::Quadratic, Degree::Cubic];

    #[test]
    fn endpoints_are_silent() {
        for degree in DEGREES {
            let env = Envelope::new(2.0, 1.0, 0.5, degree);
            assert_eq!(env.evaluate(0.0), 0.0);
            assert_eq!(env.evaluate(1.0), 0.0);
        }
    }

    #[test]
    fn sustain_window_is_full_amplitude() {
        // rise 0.5, sustain 2, fall 0.5 => limit 3; sustain covers t in [1/6, 5/6)
        let env = Envelope::new(2.0, 2.0, 2.0, Degree::Cubic);
        for t in [0.2, 0.4, 0.5, 0.6, 0.8] {
            assert_eq!(env.evaluate(t), 1.0, "t = {t}");
        }
    }

    #[test]
    fn attack_edge_follows_degree() {
        // rise 1, sustain 1, fall 1 => limit 3; t = 1/6 puts x at 0.5
        let linear = Envelope::new(1.0, 1.0, 1.0, Degree::Linear);
        let quadratic = Envelope::new(1.0, 1.0, 1.0, Degree::Quadratic);
        assert!((linear.evaluate(1.0 / 6.0) - 0.5).abs() < 1e-5);
        assert!((quadratic.evaluate(1.0 / 6.0) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_time_is_clamped() {
        let env = Envelope::default();
        assert_eq!(env.evaluate(-3.0), env.evaluate(0.0));
        assert_eq!(env.evaluate(7.0), env.evaluate(1.0));
    }

    #[test]
    fn rates_are_floored() {
        let env = Envelope::new(0.0, -1.0, -5.0, Degree::Linear);
        assert_eq!(env.attack(), MIN_RATE);
        assert_eq!(env.sustain(), 0.0);
        assert_eq!(env.decay(), MIN_RATE);

        let mut env = Envelope::default();
        env.set_attack(0.01);
        env.set_decay(0.0);
        env.set_sustain(-2.0);
        assert_eq!(env.attack(), MIN_RATE);
        assert_eq!(env.decay(), MIN_RATE);
        assert_eq!(env.sustain(), 0.0);
    }

    #[test]
    fn zero_sustain_with_fast_edges_is_a_spike() {
        let env = Envelope::new(1000.0, 0.0, 1000.0, Degree::Linear);
        assert!((env.evaluate(0.5) - 1.0).abs() < 1e-3);
        assert!(env.evaluate(0.25) < 0.6);
        assert!(env.evaluate(0.75) < 0.6);
    }

    #[test]
    fn deserialized_values_are_clamped() {
        let env: Envelope =
            toml::from_str("attack = 0.0\nsustain = -1.0\ndegree = \"linear\"").unwrap();
        assert_eq!(env.attack(), MIN_RATE);
        assert_eq!(env.sustain(), 0.0);
        assert_eq!(env.decay(), 1.0);
        assert_eq!(env.degree(), Degree::Linear);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn degree() -> impl Strategy<Value = Degree> {
            prop_oneof![
                Just(Degree::Linear),
                Just(Degree::Quadratic),
                Just(Degree::Cubic)
            ]
        }

        proptest! {
            #[test]
            fn output_stays_in_unit_range(
                attack in 0.0f32..50.0,
                sustain in 0.0f32..10.0,
                decay in 0.0f32..50.0,
                degree in degree(),
                t in -1.0f32..2.0,
            ) {
                let v = Envelope::new(attack, sustain, decay, degree).evaluate(t);
                prop_assert!((0.0..=1.0).contains(&v), "evaluate({t}) = {v}");
            }

            #[test]
            fn attack_segment_is_non_decreasing(
                attack in 0.1f32..20.0,
                sustain in 0.0f32..5.0,
                decay in 0.1f32..20.0,
                degree in degree(),
                a in 0.0f32..1.0,
                b in 0.0f32..1.0,
            ) {
                let env = Envelope::new(attack, sustain, decay, degree);
                let limit = 1.0 / env.attack() + env.sustain() + 1.0 / env.decay();
                let peak = (1.0 / env.attack()) / limit;
                let (lo, hi) = if a <= b { (a * peak, b * peak) } else { (b * peak, a * peak) };
                prop_assert!(env.evaluate(lo) <= env.evaluate(hi) + 1e-4);
            }

            #[test]
            fn decay_segment_is_non_increasing(
                attack in 0.1f32..20.0,
                sustain in 0.0f32..5.0,
                decay in 0.1f32..20.0,
                degree in degree(),
                a in 0.0f32..1.0,
                b in 0.0f32..1.0,
            ) {
                let env = Envelope::new(attack, sustain, decay, degree);
                let limit = 1.0 / env.attack() + env.sustain() + 1.0 / env.decay();
                let start = (1.0 / env.attack() + env.sustain()) / limit;
                let span = 1.0 - start;
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let (lo, hi) = (start + lo * span, start + hi * span);
                prop_assert!(env.evaluate(lo) + 1e-4 >= env.evaluate(hi));
            }
        }
    }
}
