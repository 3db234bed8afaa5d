use fare_core::config::EngineConfig;
use fare_core::session::TripSession;
use fare_core::spatial::PositionFix;
use fare_core::test_helpers::start_fix;

/// Builder for sessions started at a fixed place and time of day.
#[derive(Clone, Debug)]
pub struct TripBuilder {
    config: EngineConfig,
    start: PositionFix,
    local_hour: u32,
}

impl Default for TripBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            start: start_fix(0),
            local_hour: 14,
        }
    }
}

impl TripBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn start(mut self, start: PositionFix) -> Self {
        self.start = start;
        self
    }

    pub fn at_night(mut self) -> Self {
        self.local_hour = 1;
        self
    }

    pub fn local_hour(mut self, hour: u32) -> Self {
        self.local_hour = hour;
        self
    }

    pub fn start_fix(&self) -> PositionFix {
        self.start
    }

    pub fn build(self) -> TripSession {
        TripSession::start(self.config, Ok(self.start), self.local_hour).expect("trip session")
    }
}

/// Feed every fix and return the snapshots in order.
pub fn feed(session: &mut TripSession, fixes: &[PositionFix]) -> Vec<fare_core::TripSnapshot> {
    fixes.iter().map(|fix| session.on_position_fix(*fix)).collect()
}
