use super::{FleetRecord, FleetSource};
use crate::compliance::{ComplianceError, IntensityUnit};
use crate::voyage::VoyageLedger;
use async_trait::async_trait;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
enum Layout {
    /// One row per vessel, same columns as the remote JSON records.
    Snapshot,
    /// One row per voyage, aggregated per vessel on read.
    Voyages { unit: IntensityUnit },
}

/// Fleet read from a CSV file on every fetch, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct CsvFleetSource {
    path: PathBuf,
    layout: Layout,
}

impl CsvFleetSource {
    pub fn snapshot(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: Layout::Snapshot,
        }
    }

    /// Voyage log whose per-vessel intensities are expressed in `unit`.
    pub fn voyages(path: impl Into<PathBuf>, unit: IntensityUnit) -> Self {
        Self {
            path: path.into(),
            layout: Layout::Voyages { unit },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn parse_snapshot<R: Read>(reader: R) -> Result<Vec<FleetRecord>, ComplianceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<FleetRecord>() {
        records.push(record?);
    }

    Ok(records)
}

#[async_trait]
impl FleetSource for CsvFleetSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<FleetRecord>, ComplianceError> {
        let records = match &self.layout {
            Layout::Snapshot => parse_snapshot(File::open(&self.path)?)?,
            Layout::Voyages { unit } => {
                let ledger = VoyageLedger::from_path(&self.path)?;
                debug!(
                    voyages = ledger.voyage_count(),
                    vessels = ledger.vessels().len(),
                    "voyage log aggregated"
                );
                ledger
                    .vessel_records(*unit)
                    .into_iter()
                    .map(FleetRecord::from)
                    .collect()
            }
        };
        Ok(records)
    }
}
