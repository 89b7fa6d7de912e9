use super::super::domain::{ClassifiedVessel, ComplianceStatus, ComplianceTarget};
use super::super::numeric::round_to;
use super::summary::FleetSummary;
pub use super::views::{FleetHealth, FleetInsights};

/// Compliance rate above which the fleet is reported healthy.
pub const HEALTHY_COMPLIANCE_RATE: f64 = 80.0;

pub(crate) fn generate_insights(
    summary: &FleetSummary,
    vessels: &[ClassifiedVessel],
    target: &ComplianceTarget,
) -> FleetInsights {
    let health = if summary.total_vessels == 0 {
        FleetHealth::Unknown
    } else if summary.compliance_rate_percent > HEALTHY_COMPLIANCE_RATE {
        FleetHealth::Healthy
    } else {
        FleetHealth::AtRisk
    };

    let (total_surplus, total_deficit) =
        vessels
            .iter()
            .fold((0.0, 0.0), |(surplus, deficit), vessel| match vessel.status() {
                ComplianceStatus::Surplus => (surplus + vessel.balance(), deficit),
                ComplianceStatus::Deficit => (surplus, deficit + vessel.balance()),
            });
    let fleet_net_balance = total_surplus + total_deficit;
    let fleet_pool_compliant =
        ComplianceStatus::from_balance(fleet_net_balance) == ComplianceStatus::Surplus;

    let mut observations = Vec::new();
    let critical_liability = summary.counts_by_status.deficit;

    if critical_liability > 0 {
        observations.push(format!(
            "{critical_liability} vessel(s) exceed the {:.2} {} target and require action",
            target.value(),
            target.unit()
        ));
    }

    if summary.total_vessels > 0 && summary.average_intensity > target.value() {
        observations.push(format!(
            "Fleet average intensity {:.2} {} is above target by {:.2}",
            summary.average_intensity_display(),
            target.unit(),
            summary.average_intensity - target.value()
        ));
    }

    if critical_liability > 0 && summary.counts_by_status.surplus > 0 {
        if fleet_net_balance >= 0.0 {
            observations.push(
                "Surplus across the fleet covers every deficit; pooling can clear all liabilities"
                    .to_string(),
            );
        } else {
            observations.push(format!(
                "Fleet-wide pooling still leaves a net deficit of {:.2}",
                fleet_net_balance.abs()
            ));
        }
    }

    if let Some(worst) = summary
        .counts_by_type
        .iter()
        .filter(|entry| entry.counts.deficit > 0)
        .max_by(|a, b| {
            a.counts
                .deficit
                .cmp(&b.counts.deficit)
                .then_with(|| b.ship_type.cmp(&a.ship_type))
        })
    {
        observations.push(format!(
            "{} carries the most deficit vessels ({} of {})",
            worst.ship_type,
            worst.counts.deficit,
            worst.counts.total()
        ));
    }

    FleetInsights {
        health,
        health_label: health.label(),
        critical_liability,
        total_surplus: round_to(total_surplus, 2),
        total_deficit: round_to(total_deficit, 2),
        fleet_net_balance: round_to(fleet_net_balance, 2),
        fleet_pool_compliant,
        observations,
    }
}
