use super::super::domain::{ClassifiedVessel, ComplianceStatus, ComplianceTarget};
use super::super::numeric::{mean, percentage, round_to};
use super::insights::{generate_insights, FleetInsights};
use super::views::{FleetSummaryView, TypeBreakdownView};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "Surplus")]
    pub surplus: usize,
    #[serde(rename = "Deficit")]
    pub deficit: usize,
}

impl StatusCounts {
    fn record(&mut self, status: ComplianceStatus) {
        match status {
            ComplianceStatus::Surplus => self.surplus += 1,
            ComplianceStatus::Deficit => self.deficit += 1,
        }
    }

    pub const fn get(&self, status: ComplianceStatus) -> usize {
        match status {
            ComplianceStatus::Surplus => self.surplus,
            ComplianceStatus::Deficit => self.deficit,
        }
    }

    pub const fn total(&self) -> usize {
        self.surplus + self.deficit
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeBreakdown {
    pub ship_type: String,
    pub counts: StatusCounts,
}

/// Fleet-wide metrics. Always rebuilt from a full fleet slice; there is no way to patch one.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSummary {
    pub total_vessels: usize,
    /// Unrounded mean; use [`FleetSummary::average_intensity_display`] for presentation.
    pub average_intensity: f64,
    pub compliance_rate_percent: f64,
    pub counts_by_status: StatusCounts,
    /// Ship types in first-seen order.
    pub counts_by_type: Vec<TypeBreakdown>,
}

impl FleetSummary {
    pub fn average_intensity_display(&self) -> f64 {
        round_to(self.average_intensity, 2)
    }

    pub fn type_counts(&self, ship_type: &str) -> Option<StatusCounts> {
        self.counts_by_type
            .iter()
            .find(|entry| entry.ship_type == ship_type)
            .map(|entry| entry.counts)
    }

    pub fn to_view(&self) -> FleetSummaryView {
        FleetSummaryView {
            total_vessels: self.total_vessels,
            average_intensity: self.average_intensity_display(),
            compliance_rate_percent: self.compliance_rate_percent,
            counts_by_status: self.counts_by_status,
            counts_by_type: self
                .counts_by_type
                .iter()
                .map(|entry| TypeBreakdownView {
                    ship_type: entry.ship_type.clone(),
                    surplus: entry.counts.surplus,
                    deficit: entry.counts.deficit,
                })
                .collect(),
        }
    }

    pub fn insights(
        &self,
        vessels: &[ClassifiedVessel],
        target: &ComplianceTarget,
    ) -> FleetInsights {
        generate_insights(self, vessels, target)
    }
}

pub fn summarize(vessels: &[ClassifiedVessel]) -> FleetSummary {
    let mut counts_by_status = StatusCounts::default();
    let mut counts_by_type: Vec<TypeBreakdown> = Vec::new();
    let mut type_index: HashMap<&str, usize> = HashMap::new();
    let mut intensity_sum = 0.0;

    for vessel in vessels {
        let status = vessel.status();
        counts_by_status.record(status);
        intensity_sum += vessel.ghg_intensity;

        let slot = *type_index
            .entry(vessel.ship_type.as_str())
            .or_insert_with(|| {
                counts_by_type.push(TypeBreakdown {
                    ship_type: vessel.ship_type.clone(),
                    counts: StatusCounts::default(),
                });
                counts_by_type.len() - 1
            });
        counts_by_type[slot].counts.record(status);
    }

    let total_vessels = vessels.len();

    FleetSummary {
        total_vessels,
        average_intensity: mean(intensity_sum, total_vessels),
        compliance_rate_percent: round_to(
            percentage(counts_by_status.surplus, total_vessels),
            1,
        ),
        counts_by_status,
        counts_by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::domain::VesselRecord;

    fn vessel(ship_id: &str, ship_type: &str, intensity: f64) -> ClassifiedVessel {
        ClassifiedVessel::from_record(
            VesselRecord {
                ship_id: ship_id.to_string(),
                ship_type: ship_type.to_string(),
                route_id: "Lagos-Apapa".to_string(),
                ghg_intensity: Some(intensity),
            },
            &ComplianceTarget::reference(),
        )
        .expect("valid vessel")
    }

    fn mixed_fleet() -> Vec<ClassifiedVessel> {
        vec![
            vessel("NG001", "Tanker Ship", 70.0),
            vessel("NG002", "Tanker Ship", 95.0),
            vessel("NG003", "Fishing Trawler", 60.5),
            vessel("NG004", "Oil Service Boat", 101.25),
            vessel("NG005", "Fishing Trawler", 89.34),
        ]
    }

    #[test]
    fn empty_fleet_is_a_valid_zero_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_vessels, 0);
        assert_eq!(summary.average_intensity, 0.0);
        assert_eq!(summary.compliance_rate_percent, 0.0);
        assert_eq!(summary.counts_by_status, StatusCounts::default());
        assert!(summary.counts_by_type.is_empty());
    }

    #[test]
    fn status_counts_cover_the_whole_fleet() {
        let fleet = mixed_fleet();
        let summary = summarize(&fleet);

        assert_eq!(summary.total_vessels, fleet.len());
        assert_eq!(summary.counts_by_status.total(), fleet.len());
        assert_eq!(summary.counts_by_status.surplus, 3);
        assert_eq!(summary.counts_by_status.deficit, 2);
        assert_eq!(summary.compliance_rate_percent, 60.0);
    }

    #[test]
    fn boundary_vessel_counts_toward_compliance_rate() {
        let fleet = vec![
            vessel("NG001", "Tanker Ship", 89.34),
            vessel("NG002", "Tanker Ship", 95.0),
            vessel("NG003", "Tanker Ship", 95.0),
        ];
        let summary = summarize(&fleet);
        assert_eq!(summary.counts_by_status.surplus, 1);
        assert_eq!(summary.compliance_rate_percent, 33.3);
    }

    #[test]
    fn type_breakdown_is_grouped_per_type() {
        let summary = summarize(&mixed_fleet());

        assert_eq!(summary.counts_by_type.len(), 3);
        assert_eq!(
            summary.type_counts("Tanker Ship"),
            Some(StatusCounts {
                surplus: 1,
                deficit: 1
            })
        );
        assert_eq!(
            summary.type_counts("Fishing Trawler"),
            Some(StatusCounts {
                surplus: 2,
                deficit: 0
            })
        );
        assert_eq!(
            summary.type_counts("Oil Service Boat"),
            Some(StatusCounts {
                surplus: 0,
                deficit: 1
            })
        );
        assert_eq!(summary.type_counts("Surfer Boat"), None);
    }

    #[test]
    fn counts_do_not_depend_on_input_order() {
        let fleet = mixed_fleet();
        let mut reversed = fleet.clone();
        reversed.reverse();

        let forward = summarize(&fleet);
        let backward = summarize(&reversed);

        assert_eq!(forward.counts_by_status, backward.counts_by_status);
        assert_eq!(forward.compliance_rate_percent, backward.compliance_rate_percent);
        assert!((forward.average_intensity - backward.average_intensity).abs() < 1e-9);
        for entry in &forward.counts_by_type {
            assert_eq!(backward.type_counts(&entry.ship_type), Some(entry.counts));
        }

        // Tanker Ship and Oil Service Boat tie on deficit vessels.
        let target = ComplianceTarget::reference();
        assert_eq!(
            forward.insights(&fleet, &target).observations,
            backward.insights(&reversed, &target).observations
        );
    }

    #[test]
    fn summarizing_twice_yields_identical_results() {
        let fleet = mixed_fleet();
        assert_eq!(summarize(&fleet), summarize(&fleet));
    }

    #[test]
    fn average_keeps_full_precision_and_rounds_for_display() {
        let fleet = vec![
            vessel("NG001", "Tanker Ship", 70.123),
            vessel("NG002", "Tanker Ship", 95.0),
            vessel("NG003", "Tanker Ship", 80.0),
        ];
        let summary = summarize(&fleet);

        let expected = (70.123 + 95.0 + 80.0) / 3.0;
        assert!((summary.average_intensity - expected).abs() < 1e-12);
        assert_eq!(summary.average_intensity_display(), 81.71);
        assert_eq!(summary.to_view().average_intensity, 81.71);
    }
}
