use crate::infra::{build_service, parse_unit, FleetService};
use clap::Args;
use fleet_navigator::compliance::numeric::format_signed;
use fleet_navigator::compliance::{
    summarize, ClassifiedVessel, ComplianceTarget, FleetInsights, FleetSummary, IntensityUnit,
    PoolingView,
};
use fleet_navigator::config::{AppConfig, ConfigError};
use fleet_navigator::error::AppError;
use fleet_navigator::voyage::{
    VoyageAssessmentView, VoyageInput, VoyageLedger, REFERENCE_TARGET_REDUCTION,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct FleetSummaryArgs {
    /// Override the configured compliance target
    #[arg(long)]
    pub(crate) target: Option<f64>,
    /// Also list every vessel with its balance
    #[arg(long)]
    pub(crate) list_vessels: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PoolArgs {
    /// Ship id of the deficit vessel
    #[arg(long)]
    pub(crate) deficit: String,
    /// Ship id of the surplus vessel
    #[arg(long)]
    pub(crate) surplus: String,
    /// Override the configured compliance target
    #[arg(long)]
    pub(crate) target: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct VoyagePredictArgs {
    /// Vessel type as known to the predictor, e.g. "Tanker Ship"
    #[arg(long)]
    pub(crate) ship_type: String,
    /// Voyage distance in nautical miles
    #[arg(long)]
    pub(crate) distance: f64,
    /// Fuel burnt on the voyage in kg
    #[arg(long)]
    pub(crate) fuel_consumption: f64,
    /// Fuel label (HFO, Diesel); unknown fuels are treated as HFO
    #[arg(long)]
    pub(crate) fuel_type: Option<String>,
    /// Override the configured compliance target
    #[arg(long)]
    pub(crate) target: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct LedgerArgs {
    /// Voyage log CSV (ship_id, ship_type, distance, fuel_consumption, fuel_type, CO2_emissions)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Intensity unit for the aggregation (defaults to the configured unit)
    #[arg(long, value_parser = parse_unit)]
    pub(crate) unit: Option<IntensityUnit>,
    /// Reduction applied to the fleet mean when deriving a target
    #[arg(long, default_value_t = REFERENCE_TARGET_REDUCTION)]
    pub(crate) reduction: f64,
    /// Use this target instead of deriving one
    #[arg(long)]
    pub(crate) target: Option<f64>,
    /// Also list every vessel with its balance
    #[arg(long)]
    pub(crate) list_vessels: bool,
}

fn load_service(target: Option<f64>) -> Result<Arc<FleetService>, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(value) = target {
        config.compliance = config.compliance.with_target_value(value)?;
    }
    build_service(&config.upstream, config.compliance.target)
}

pub(crate) async fn run_fleet_summary(args: FleetSummaryArgs) -> Result<(), AppError> {
    let service = load_service(args.target)?;
    let snapshot = service.snapshot().await?;
    let summary = snapshot.summary();
    let insights = snapshot.insights(&summary);

    println!(
        "Fleet compliance summary ({} at {})",
        snapshot.source,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    render_summary(&summary, &insights, &snapshot.target);
    if args.list_vessels {
        render_vessels(&snapshot.vessels, snapshot.target.unit());
    }
    Ok(())
}

pub(crate) async fn run_pool(args: PoolArgs) -> Result<(), AppError> {
    let service = load_service(args.target)?;
    let view = service.pool_pair(&args.deficit, &args.surplus).await?;
    render_pool(&view);
    Ok(())
}

pub(crate) async fn run_voyage_predict(args: VoyagePredictArgs) -> Result<(), AppError> {
    let service = load_service(args.target)?;
    let input = VoyageInput::new(
        args.ship_type,
        args.distance,
        args.fuel_consumption,
        args.fuel_type,
    );
    let assessment = service.predict(&input).await?;
    render_assessment(&assessment.to_view());
    Ok(())
}

pub(crate) fn run_ledger(args: LedgerArgs) -> Result<(), AppError> {
    let configured = AppConfig::load()?.compliance.target;
    let unit = args.unit.unwrap_or(configured.unit());

    let ledger = VoyageLedger::from_path(&args.csv)?;
    let target = ledger_target(&ledger, unit, args.target, args.reduction, configured)?;

    let vessels = ledger
        .vessel_records(unit)
        .into_iter()
        .map(|record| ClassifiedVessel::from_record(record, &target))
        .collect::<Result<Vec<_>, _>>()?;
    let summary = summarize(&vessels);
    let insights = summary.insights(&vessels, &target);

    println!(
        "Voyage ledger {}: {} voyages across {} vessels",
        args.csv.display(),
        ledger.voyage_count(),
        ledger.vessels().len()
    );
    render_summary(&summary, &insights, &target);
    if args.list_vessels {
        render_vessels(&vessels, unit);
    }
    Ok(())
}

/// Explicit override, else the derived target, else the configured one (empty log).
fn ledger_target(
    ledger: &VoyageLedger,
    unit: IntensityUnit,
    explicit: Option<f64>,
    reduction: f64,
    configured: ComplianceTarget,
) -> Result<ComplianceTarget, AppError> {
    if let Some(value) = explicit {
        return ComplianceTarget::new(value, unit).ok_or_else(|| {
            ConfigError::InvalidTarget {
                value: value.to_string(),
            }
            .into()
        });
    }
    Ok(ledger.derive_target(unit, reduction).unwrap_or(configured))
}

fn render_summary(summary: &FleetSummary, insights: &FleetInsights, target: &ComplianceTarget) {
    let unit = target.unit();
    println!("Target: {:.2} {}", target.value(), unit);
    println!(
        "- {} vessels | avg intensity {:.2} {} | compliance rate {:.1}% | health: {}",
        summary.total_vessels,
        summary.average_intensity_display(),
        unit,
        summary.compliance_rate_percent,
        insights.health_label
    );
    println!(
        "- Surplus {} | Deficit {} (critical liability)",
        summary.counts_by_status.surplus, summary.counts_by_status.deficit
    );

    if !summary.counts_by_type.is_empty() {
        println!("By ship type:");
        for entry in &summary.counts_by_type {
            println!(
                "  - {}: {} surplus / {} deficit",
                entry.ship_type, entry.counts.surplus, entry.counts.deficit
            );
        }
    }

    println!(
        "Balances: surplus {} | deficit {} | fleet net {} ({})",
        format_signed(insights.total_surplus, 2),
        format_signed(insights.total_deficit, 2),
        format_signed(insights.fleet_net_balance, 2),
        if insights.fleet_pool_compliant {
            "fleet-wide pool compliant"
        } else {
            "fleet-wide pool non-compliant"
        }
    );

    if !insights.observations.is_empty() {
        println!("Observations:");
        for note in &insights.observations {
            println!("  - {note}");
        }
    }
}

fn render_vessels(vessels: &[ClassifiedVessel], unit: IntensityUnit) {
    println!("Vessels:");
    for vessel in vessels {
        let view = vessel.to_view();
        println!(
            "  - {} [{}] {:.2} {} | balance {} | {}",
            view.ship_id,
            view.ship_type,
            view.ghg_intensity,
            unit,
            format_signed(view.compliance_balance, 2),
            view.status_label
        );
    }
}

fn render_pool(view: &PoolingView) {
    println!("Pooling simulation");
    println!(
        "- Deficit {}: {}",
        view.deficit.ship_id,
        format_signed(view.deficit.compliance_balance, 2)
    );
    println!(
        "- Surplus {}: {}",
        view.surplus.ship_id,
        format_signed(view.surplus.compliance_balance, 2)
    );
    println!("- Net balance: {}", format_signed(view.net_balance, 2));
    println!("{}", view.verdict);
}

fn render_assessment(view: &VoyageAssessmentView) {
    println!("Voyage prediction for {} ({})", view.ship_type, view.fuel_type);
    println!("- Predicted CO2: {:.2} kg", view.predicted_co2);
    println!(
        "- GHG intensity: {:.2} {} against target {:.2}",
        view.ghg_intensity, view.unit, view.target_used
    );
    println!(
        "- Compliance: {} ({})",
        view.status_label,
        format_signed(view.compliance_balance, 2)
    );
}
