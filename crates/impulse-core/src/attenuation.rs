use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::power::{Degree, power};

/// Smallest allowed gap between the min and max distances.
pub const MIN_FALLOFF: f32 = 0.001;

/// Scales a shake by how far the observer is from the shake's origin.
///
/// Full strength within `min_distance` of the source, fading to nothing at
/// `max_distance`. Without a source the shake is heard everywhere at full
/// strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AttenuationFields", into = "AttenuationFields")]
pub struct SpatialAttenuation {
    min_distance: f32,
    falloff: f32,
    degree: Degree,
    source: Option<Vec3>,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct AttenuationFields {
    min_distance: f32,
    max_distance: f32,
    degree: Degree,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Vec3>,
}

impl Default for AttenuationFields {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_distance: 5.0,
            degree: Degree::Quadratic,
            source: None,
        }
    }
}

impl From<AttenuationFields> for SpatialAttenuation {
    fn from(f: AttenuationFields) -> Self {
        let mut att = Self::new(f.min_distance, f.max_distance, f.degree);
        att.source = f.source;
        att
    }
}

impl From<SpatialAttenuation> for AttenuationFields {
    fn from(a: SpatialAttenuation) -> Self {
        Self {
            min_distance: a.min_distance,
            max_distance: a.max_distance(),
            degree: a.degree,
            source: a.source,
        }
    }
}

impl Default for SpatialAttenuation {
    fn default() -> Self {
        AttenuationFields::default().into()
    }
}

impl SpatialAttenuation {
    /// Attenuation with no source set. Call [`with_source`](Self::with_source)
    /// to make it distance dependent.
    pub fn new(min_distance: f32, max_distance: f32, degree: Degree) -> Self {
        let min_distance = min_distance.max(0.0);
        Self {
            min_distance,
            falloff: (max_distance - min_distance).max(MIN_FALLOFF),
            degree,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Vec3) -> Self {
        self.source = Some(source);
        self
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Moves the inner radius; the falloff span is kept, so the max distance
    /// moves with it.
    pub fn set_min_distance(&mut self, min_distance: f32) {
        self.min_distance = min_distance.max(0.0);
    }

    pub fn max_distance(&self) -> f32 {
        self.min_distance + self.falloff
    }

    pub fn set_max_distance(&mut self, max_distance: f32) {
        self.falloff = (max_distance - self.min_distance).max(MIN_FALLOFF);
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn set_degree(&mut self, degree: Degree) {
        self.degree = degree;
    }

    pub fn source(&self) -> Option<Vec3> {
        self.source
    }

    pub fn set_source(&mut self, source: Option<Vec3>) {
        self.source = source;
    }

    /// Amplitude multiplier for an observer standing at `observer`.
    pub fn evaluate(&self, observer: Vec3) -> f32 {
        let Some(source) = self.source else {
            return 1.0;
        };
        let distance = observer.distance(source);
        let raw = 1.0 - (distance - self.min_distance) / self.falloff;
        power(raw.clamp(0.0, 1.0), self.degree)
    }
}
