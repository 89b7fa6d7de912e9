use super::domain::{ClassifiedVessel, ComplianceResult, ComplianceStatus};
use super::numeric::round_to;
use super::ComplianceError;
use serde::Serialize;

/// Outcome of netting one deficit vessel against one surplus vessel.
///
/// Borrows both results read-only; choosing another pair means calling [`pool`] again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolingResult<'a> {
    deficit: &'a ComplianceResult,
    surplus: &'a ComplianceResult,
    net_balance: f64,
}

impl<'a> PoolingResult<'a> {
    pub const fn deficit_ship(&self) -> &'a ComplianceResult {
        self.deficit
    }

    pub const fn surplus_ship(&self) -> &'a ComplianceResult {
        self.surplus
    }

    pub const fn net_balance(&self) -> f64 {
        self.net_balance
    }

    /// Same inclusive-zero rule as vessel classification.
    pub fn pool_compliant(&self) -> bool {
        ComplianceStatus::from_balance(self.net_balance) == ComplianceStatus::Surplus
    }

    pub fn verdict(&self) -> &'static str {
        if self.pool_compliant() {
            "POOL COMPLIANT: No penalties required."
        } else {
            "POOL NON-COMPLIANT: Additional credits needed."
        }
    }

    pub fn to_view(&self) -> PoolingView {
        PoolingView {
            deficit: PoolMemberView::from(self.deficit),
            surplus: PoolMemberView::from(self.surplus),
            net_balance: round_to(self.net_balance, 2),
            pool_compliant: self.pool_compliant(),
            verdict: self.verdict(),
        }
    }
}

/// Net a deficit vessel against a surplus vessel by plain summation of signed balances.
pub fn pool<'a>(
    deficit: &'a ComplianceResult,
    surplus: &'a ComplianceResult,
) -> Result<PoolingResult<'a>, ComplianceError> {
    if deficit.status() != ComplianceStatus::Deficit {
        return Err(ComplianceError::InvalidPoolingPair(format!(
            "{} was selected as the deficit vessel but has status {}",
            deficit.ship_id(),
            deficit.status()
        )));
    }
    if surplus.status() != ComplianceStatus::Surplus {
        return Err(ComplianceError::InvalidPoolingPair(format!(
            "{} was selected as the surplus vessel but has status {}",
            surplus.ship_id(),
            surplus.status()
        )));
    }

    Ok(PoolingResult {
        deficit,
        surplus,
        net_balance: deficit.balance() + surplus.balance(),
    })
}

/// [`pool`] for selections that may still be empty.
pub fn pool_selection<'a>(
    deficit: Option<&'a ComplianceResult>,
    surplus: Option<&'a ComplianceResult>,
) -> Result<PoolingResult<'a>, ComplianceError> {
    match (deficit, surplus) {
        (Some(deficit), Some(surplus)) => pool(deficit, surplus),
        (None, _) => Err(ComplianceError::InvalidPoolingPair(
            "no deficit vessel selected".to_string(),
        )),
        (_, None) => Err(ComplianceError::InvalidPoolingPair(
            "no surplus vessel selected".to_string(),
        )),
    }
}

/// Vessels eligible for each side of a pool, in fleet order.
#[derive(Debug, Clone, Default)]
pub struct PoolingCandidates<'a> {
    pub deficits: Vec<&'a ClassifiedVessel>,
    pub surpluses: Vec<&'a ClassifiedVessel>,
}

pub fn pooling_candidates(fleet: &[ClassifiedVessel]) -> PoolingCandidates<'_> {
    let (surpluses, deficits): (Vec<_>, Vec<_>) = fleet
        .iter()
        .partition(|vessel| vessel.status() == ComplianceStatus::Surplus);
    PoolingCandidates {
        deficits,
        surpluses,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolMemberView {
    pub ship_id: String,
    pub compliance_balance: f64,
    pub compliance_status: ComplianceStatus,
}

impl From<&ComplianceResult> for PoolMemberView {
    fn from(result: &ComplianceResult) -> Self {
        Self {
            ship_id: result.ship_id().to_string(),
            compliance_balance: round_to(result.balance(), 2),
            compliance_status: result.status(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolingView {
    pub deficit: PoolMemberView,
    pub surplus: PoolMemberView,
    pub net_balance: f64,
    pub pool_compliant: bool,
    pub verdict: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::classifier::classify;
    use crate::compliance::domain::ComplianceTarget;

    const TARGET: f64 = ComplianceTarget::REFERENCE_VALUE;

    fn result(ship_id: &str, intensity: f64) -> ComplianceResult {
        ComplianceResult::new(ship_id, classify(intensity, TARGET).expect("valid"))
    }

    #[test]
    fn net_balance_is_the_sum_of_both_balances() {
        let deficit = result("NG002", 95.0);
        let surplus = result("NG001", 70.0);

        let pooled = pool(&deficit, &surplus).expect("valid pair");
        assert_eq!(pooled.net_balance(), deficit.balance() + surplus.balance());
        assert!((pooled.net_balance() - 13.68).abs() < 1e-9);
        assert!(pooled.pool_compliant());
        assert_eq!(pooled.to_view().net_balance, 13.68);
    }

    #[test]
    fn insufficient_surplus_leaves_pool_non_compliant() {
        let deficit = result("NG002", 120.0);
        let surplus = result("NG001", 80.0);

        let pooled = pool(&deficit, &surplus).expect("valid pair");
        assert!(pooled.net_balance() < 0.0);
        assert!(!pooled.pool_compliant());
        assert!(pooled.verdict().starts_with("POOL NON-COMPLIANT"));
    }

    #[test]
    fn exactly_offsetting_balances_are_compliant() {
        let deficit = ComplianceResult::new("D", classify(10.0, 5.0).expect("valid"));
        let surplus = ComplianceResult::new("S", classify(0.0, 5.0).expect("valid"));

        let pooled = pool(&deficit, &surplus).expect("valid pair");
        assert_eq!(pooled.net_balance(), 0.0);
        assert!(pooled.pool_compliant());
    }

    #[test]
    fn two_surplus_vessels_are_rejected() {
        let first = result("NG001", 70.0);
        let second = result("NG003", 80.0);
        let err = pool(&first, &second).expect_err("same status");
        assert!(matches!(err, ComplianceError::InvalidPoolingPair(_)));
    }

    #[test]
    fn two_deficit_vessels_are_rejected() {
        let first = result("NG002", 95.0);
        let second = result("NG004", 101.0);
        let err = pool(&first, &second).expect_err("same status");
        assert!(matches!(err, ComplianceError::InvalidPoolingPair(_)));
    }

    #[test]
    fn swapped_sides_are_rejected_not_commuted() {
        let deficit = result("NG002", 95.0);
        let surplus = result("NG001", 70.0);
        assert!(pool(&deficit, &surplus).is_ok());
        let err = pool(&surplus, &deficit).expect_err("swapped pair");
        assert!(matches!(err, ComplianceError::InvalidPoolingPair(_)));
    }

    #[test]
    fn missing_selection_is_rejected() {
        let surplus = result("NG001", 70.0);
        assert!(matches!(
            pool_selection(None, Some(&surplus)),
            Err(ComplianceError::InvalidPoolingPair(_))
        ));
        let deficit = result("NG002", 95.0);
        assert!(matches!(
            pool_selection(Some(&deficit), None),
            Err(ComplianceError::InvalidPoolingPair(_))
        ));
    }

    #[test]
    fn pooling_leaves_inputs_untouched() {
        let deficit = result("NG002", 95.0);
        let surplus = result("NG001", 70.0);
        let before = (deficit.clone(), surplus.clone());

        let _ = pool(&deficit, &surplus).expect("valid pair");
        let _ = pool(&deficit, &surplus).expect("valid pair");

        assert_eq!((deficit, surplus), before);
    }
}
