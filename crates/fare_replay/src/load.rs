//! Recording loaders. Fixes come as JSON arrays or CSV with a header row; inertial
//! samples come as JSON arrays.

use std::fs::File;
use std::path::Path;

use fare_core::motion::InertialSample;
use fare_core::spatial::{mps_to_kmh, PositionFix};
use serde::Deserialize;
use tracing::debug;

/// One recorded fix. Speed may be given in km/h or in m/s as reported by GPS chips;
/// km/h wins when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct FixRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub speed_kmh: Option<f64>,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl From<FixRecord> for PositionFix {
    fn from(record: FixRecord) -> Self {
        let speed = record
            .speed_kmh
            .or(record.speed_mps.map(mps_to_kmh))
            .unwrap_or(0.0);
        let fix = PositionFix::new(record.latitude, record.longitude, speed, record.timestamp_ms);
        match record.accuracy_m {
            Some(accuracy) => fix.with_accuracy(accuracy),
            None => fix,
        }
    }
}

pub fn load_fixes(path: impl AsRef<Path>) -> Result<Vec<PositionFix>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let records: Vec<FixRecord> = match extension(path).as_deref() {
        Some("csv") => {
            let mut reader = csv::Reader::from_path(path)?;
            reader.deserialize().collect::<Result<_, _>>()?
        }
        Some("json") => serde_json::from_reader(File::open(path)?)?,
        _ => {
            return Err(format!(
                "unsupported fix recording {} (expected .json or .csv)",
                path.display()
            )
            .into())
        }
    };
    if records.is_empty() {
        return Err(format!("{} contains no fixes", path.display()).into());
    }
    debug!(count = records.len(), path = %path.display(), "loaded fixes");
    Ok(records.into_iter().map(PositionFix::from).collect())
}

pub fn load_samples(
    path: impl AsRef<Path>,
) -> Result<Vec<InertialSample>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let samples: Vec<InertialSample> = serde_json::from_reader(File::open(path)?)?;
    debug!(count = samples.len(), path = %path.display(), "loaded inertial samples");
    Ok(samples)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
