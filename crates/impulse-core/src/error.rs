use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShakeError {
    /// A noise shake was built without a noise source.
    #[error("noise shake requires a noise source")]
    MissingNoiseSource,
    /// The director's target cannot change while shakes are running.
    #[error("cannot change target while {active} shake(s) are active")]
    TargetLocked { active: usize },
    #[error("unknown shake preset '{0}'")]
    UnknownPreset(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ShakeError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
