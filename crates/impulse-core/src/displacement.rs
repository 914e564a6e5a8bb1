use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Positional and angular offset applied to a target for a single frame.
///
/// `angles` holds Euler rotation deltas in radians, one axis per component.
/// All arithmetic is component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Displacement {
    pub offset: Vec3,
    pub angles: Vec3,
}

impl Displacement {
    pub const ZERO: Self = Self {
        offset: Vec3::ZERO,
        angles: Vec3::ZERO,
    };

    pub const fn new(offset: Vec3, angles: Vec3) -> Self {
        Self { offset, angles }
    }

    pub const fn from_offset(offset: Vec3) -> Self {
        Self {
            offset,
            angles: Vec3::ZERO,
        }
    }

    pub const fn from_angles(angles: Vec3) -> Self {
        Self {
            offset: Vec3::ZERO,
            angles,
        }
    }

    /// True when both vectors are within `max_abs_diff` of `other` on every axis.
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.offset.abs_diff_eq(other.offset, max_abs_diff)
            && self.angles.abs_diff_eq(other.angles, max_abs_diff)
    }
}

impl Add for Displacement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.offset + rhs.offset, self.angles + rhs.angles)
    }
}

impl AddAssign for Displacement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Displacement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.offset - rhs.offset, self.angles - rhs.angles)
    }
}

impl SubAssign for Displacement {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Displacement {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.offset * rhs, self.angles * rhs)
    }
}

impl Neg for Displacement {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.offset, -self.angles)
    }
}

impl Sum for Displacement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {} angles {}", self.offset, self.angles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_additive_identity() {
        let d = Displacement::new(Vec3::new(1.0, -2.0, 3.0), Vec3::new(0.1, 0.2, -0.3));
        assert_eq!(d + Displacement::ZERO, d);
        assert_eq!(Displacement::ZERO + d, d);
        assert_eq!(Displacement::default(), Displacement::ZERO);
    }

    #[test]
    fn subtraction_undoes_addition() {
        let base = Displacement::new(Vec3::new(4.0, 5.0, 6.0), Vec3::new(0.0, 1.0, 0.0));
        let shake = Displacement::new(Vec3::new(0.5, -0.25, 0.0), Vec3::new(0.01, 0.0, 0.02));
        let recovered = (base + shake) - shake;
        assert!(recovered.abs_diff_eq(&base, 1e-6));
    }

    #[test]
    fn scalar_multiply_scales_both_vectors() {
        let d = Displacement::new(Vec3::ONE, Vec3::splat(2.0)) * 0.5;
        assert_eq!(d.offset, Vec3::splat(0.5));
        assert_eq!(d.angles, Vec3::ONE);
    }

    #[test]
    fn sum_of_iterator() {
        let parts = [
            Displacement::from_offset(Vec3::X),
            Displacement::from_offset(Vec3::Y),
            Displacement::from_angles(Vec3::Z),
        ];
        let total: Displacement = parts.into_iter().sum();
        assert_eq!(total, Displacement::new(Vec3::new(1.0, 1.0, 0.0), Vec3::Z));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn vec3() -> impl Strategy<Value = Vec3> {
            (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
                .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        }

        fn displacement() -> impl Strategy<Value = Displacement> {
            (vec3(), vec3()).prop_map(|(o, a)| Displacement::new(o, a))
        }

        proptest! {
            #[test]
            fn addition_commutes(a in displacement(), b in displacement()) {
                prop_assert!((a + b).abs_diff_eq(&(b + a), 1e-4));
            }

            #[test]
            fn addition_associates(a in displacement(), b in displacement(), c in displacement()) {
                prop_assert!(((a + b) + c).abs_diff_eq(&(a + (b + c)), 1e-3));
            }

            #[test]
            fn scaling_distributes(a in displacement(), b in displacement(), k in -4.0f32..4.0) {
                prop_assert!(((a + b) * k).abs_diff_eq(&(a * k + b * k), 1e-3));
            }
        }
    }
}
