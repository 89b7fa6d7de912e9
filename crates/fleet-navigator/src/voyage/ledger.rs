use super::FuelType;
use crate::compliance::numeric::mean;
use crate::compliance::{ComplianceError, ComplianceTarget, IntensityUnit, VesselRecord};
use crate::fields::empty_string_as_none;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Fraction by which a derived target undercuts the fleet mean intensity.
pub const REFERENCE_TARGET_REDUCTION: f64 = 0.05;

/// One row of a voyage log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoyageEntry {
    pub ship_id: String,
    pub ship_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub route_id: Option<String>,
    pub distance: f64,
    pub fuel_consumption: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fuel_type: Option<String>,
    #[serde(rename = "CO2_emissions")]
    pub co2_emissions: f64,
}

impl VoyageEntry {
    pub fn energy_mj(&self) -> f64 {
        FuelType::from_label(self.fuel_type.as_deref()).energy_mj(self.fuel_consumption)
    }
}

/// Per-vessel totals across every logged voyage.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselTotals {
    pub ship_id: String,
    pub ship_type: String,
    pub route_id: Option<String>,
    pub voyages: usize,
    pub co2_kg: f64,
    pub distance_nm: f64,
    pub fuel_kg: f64,
    pub energy_mj: f64,
}

impl VesselTotals {
    fn open(entry: &VoyageEntry) -> Self {
        Self {
            ship_id: entry.ship_id.clone(),
            ship_type: entry.ship_type.clone(),
            route_id: entry.route_id.clone(),
            voyages: 0,
            co2_kg: 0.0,
            distance_nm: 0.0,
            fuel_kg: 0.0,
            energy_mj: 0.0,
        }
    }

    fn add(&mut self, entry: &VoyageEntry) {
        self.voyages += 1;
        self.co2_kg += entry.co2_emissions;
        self.distance_nm += entry.distance;
        self.fuel_kg += entry.fuel_consumption;
        self.energy_mj += entry.energy_mj();
    }

    /// Zero when the vessel logged no distance (or no energy, for `g_per_mj`).
    pub fn intensity(&self, unit: IntensityUnit) -> f64 {
        let (numerator, denominator) = match unit {
            IntensityUnit::KgPerNauticalMile => (self.co2_kg, self.distance_nm),
            IntensityUnit::GramsPerMegajoule => (self.co2_kg * 1000.0, self.energy_mj),
        };
        if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        }
    }
}

/// Voyage log aggregated per ship. Ship type and route come from the first voyage seen.
#[derive(Debug, Clone, Default)]
pub struct VoyageLedger {
    vessels: Vec<VesselTotals>,
    index: HashMap<String, usize>,
    voyages: usize,
}

impl VoyageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ComplianceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut ledger = Self::new();

        for row in csv_reader.deserialize::<VoyageEntry>() {
            ledger.record(&row?)?;
        }

        Ok(ledger)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ComplianceError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn record(&mut self, entry: &VoyageEntry) -> Result<(), ComplianceError> {
        for (name, value) in [
            ("distance", entry.distance),
            ("fuel_consumption", entry.fuel_consumption),
            ("CO2_emissions", entry.co2_emissions),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ComplianceError::InvalidMeasurement(format!(
                    "vessel {}: voyage {name} must be a non-negative number (got {value})",
                    entry.ship_id
                )));
            }
        }

        let slot = match self.index.get(&entry.ship_id) {
            Some(slot) => *slot,
            None => {
                self.vessels.push(VesselTotals::open(entry));
                self.index
                    .insert(entry.ship_id.clone(), self.vessels.len() - 1);
                self.vessels.len() - 1
            }
        };
        self.vessels[slot].add(entry);
        self.voyages += 1;
        Ok(())
    }

    pub fn voyage_count(&self) -> usize {
        self.voyages
    }

    pub fn vessels(&self) -> &[VesselTotals] {
        &self.vessels
    }

    pub fn vessel_records(&self, unit: IntensityUnit) -> Vec<VesselRecord> {
        self.vessels
            .iter()
            .map(|totals| VesselRecord {
                ship_id: totals.ship_id.clone(),
                ship_type: totals.ship_type.clone(),
                route_id: totals.route_id.clone().unwrap_or_default(),
                ghg_intensity: Some(totals.intensity(unit)),
            })
            .collect()
    }

    /// Mean vessel intensity lowered by `reduction` (0.05 for a 5% cut). `None` for an empty log.
    pub fn derive_target(&self, unit: IntensityUnit, reduction: f64) -> Option<ComplianceTarget> {
        if self.vessels.is_empty() {
            return None;
        }
        let sum: f64 = self
            .vessels
            .iter()
            .map(|totals| totals.intensity(unit))
            .sum();
        ComplianceTarget::new(mean(sum, self.vessels.len()) * (1.0 - reduction), unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
ship_id,ship_type,route_id,month,distance,fuel_type,fuel_consumption,CO2_emissions
NG001,Tanker Ship,Warri-Bonny,January,100,HFO,1000,3000
NG001,Tanker Ship,Port Harcourt-Lagos,February,100,HFO,1000,3000
NG002,Fishing Trawler,,January,50,Diesel,200,640.5
NG003,Surfer Boat,Lagos-Apapa,March,0,Diesel,0,0
";

    fn ledger() -> VoyageLedger {
        VoyageLedger::from_reader(LOG.as_bytes()).expect("valid log")
    }

    #[test]
    fn voyages_are_summed_per_vessel_in_first_seen_order() {
        let ledger = ledger();
        assert_eq!(ledger.voyage_count(), 4);

        let ids: Vec<&str> = ledger.vessels().iter().map(|v| v.ship_id.as_str()).collect();
        assert_eq!(ids, ["NG001", "NG002", "NG003"]);

        let tanker = &ledger.vessels()[0];
        assert_eq!(tanker.voyages, 2);
        assert_eq!(tanker.co2_kg, 6000.0);
        assert_eq!(tanker.distance_nm, 200.0);
        assert_eq!(tanker.route_id.as_deref(), Some("Warri-Bonny"));
        assert_eq!(ledger.vessels()[1].route_id, None);
    }

    #[test]
    fn intensity_follows_the_requested_unit() {
        let ledger = ledger();
        let tanker = &ledger.vessels()[0];
        assert_eq!(tanker.intensity(IntensityUnit::KgPerNauticalMile), 30.0);
        // 6000 kg * 1000 / (2000 kg * 40.2 MJ/kg)
        let expected = 6_000_000.0 / (2000.0 * 40.2);
        assert!((tanker.intensity(IntensityUnit::GramsPerMegajoule) - expected).abs() < 1e-9);

        let idle = &ledger.vessels()[2];
        assert_eq!(idle.intensity(IntensityUnit::KgPerNauticalMile), 0.0);
        assert_eq!(idle.intensity(IntensityUnit::GramsPerMegajoule), 0.0);
    }

    #[test]
    fn derived_target_is_five_percent_below_mean() {
        let ledger = ledger();
        let unit = IntensityUnit::KgPerNauticalMile;
        let target = ledger
            .derive_target(unit, REFERENCE_TARGET_REDUCTION)
            .expect("non-empty log");

        let mean_intensity = (30.0 + 640.5 / 50.0 + 0.0) / 3.0;
        assert!((target.value() - mean_intensity * 0.95).abs() < 1e-9);
        assert_eq!(target.unit(), unit);
        assert!(VoyageLedger::new()
            .derive_target(unit, REFERENCE_TARGET_REDUCTION)
            .is_none());
    }

    #[test]
    fn records_carry_identity_and_intensity() {
        let records = ledger().vessel_records(IntensityUnit::KgPerNauticalMile);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ship_type, "Tanker Ship");
        assert_eq!(records[0].ghg_intensity, Some(30.0));
        assert_eq!(records[1].route_id, "");
    }

    #[test]
    fn negative_emissions_are_rejected_with_the_ship_named() {
        let log = "ship_id,ship_type,distance,fuel_type,fuel_consumption,CO2_emissions\n\
                   NG009,Tanker Ship,10,HFO,10,-1\n";
        let err = VoyageLedger::from_reader(log.as_bytes()).expect_err("negative co2");
        assert!(matches!(err, ComplianceError::InvalidMeasurement(_)));
        assert!(err.to_string().contains("NG009"));
    }
}
