pub mod clock;
pub mod config;
pub mod ecs;
pub mod error;
pub mod halts;
pub mod motion;
pub mod pricing;
pub mod providers;
pub mod runner;
pub mod session;
pub mod spatial;
pub mod systems;
pub mod tampering;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use config::{EngineConfig, PathRetention};
pub use error::{ConfigError, ProviderError, TamperingError, TripError};
pub use motion::{InertialSample, MotionReading, MotionState};
pub use pricing::{FareChart, TariffConfig};
pub use providers::{drive_trip, LocationProvider, MotionSensorProvider};
pub use session::TripSession;
pub use spatial::PositionFix;
pub use tampering::{detect_tampering, TamperingThreshold, TamperingVerdict};
pub use telemetry::{TripSnapshot, TripUpdate};
