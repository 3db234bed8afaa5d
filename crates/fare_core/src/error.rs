use thiserror::Error;

/// Failures at the collaborator boundary (location and motion providers).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("timed out waiting for a fix")]
    Timeout,

    #[error("tracking failed to start: {0}")]
    TrackingFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TamperingError {
    #[error("computed fare must be positive, got {0}")]
    InvalidComputedFare(f64),

    #[error("charged fare must be a non-negative amount, got {0}")]
    InvalidChargedFare(f64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid tariff: {0}")]
    InvalidTariff(String),

    #[error("night window {start}..{end} is not within 0..=24 or is empty")]
    InvalidNightWindow { start: u32, end: u32 },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("path capacity must be at least 2 points")]
    InvalidPathCapacity,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TripError {
    #[error("no initial position fix: {0}")]
    NoFix(#[source] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tampering(#[from] TamperingError),
}
