//! FGTS deposit and termination-penalty provision.
//!
//! Employers deposit a percentage of the employee's compensation into the
//! FGTS severance fund every month, and accrue a provision for the penalty
//! owed on that balance if the employee is dismissed without cause.

use rust_decimal::Decimal;

use crate::config::StatutoryRates;
use crate::models::AuditStep;

use super::provisions::ProvisionsResult;
use super::percent_of;

const THIRD: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// The result of the FGTS rule.
#[derive(Debug, Clone)]
pub struct FgtsResult {
    /// Compensation the deposit is computed on.
    pub base: Decimal,
    /// Monthly FGTS deposit.
    pub deposit: Decimal,
    /// Monthly accrual for the termination penalty.
    pub termination_penalty: Decimal,
    /// Audit steps for the deposit and the penalty.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates the FGTS deposit and the termination-penalty provision.
///
/// - base = `salary + thirteenth + vacation + vacation / 3`
///   (provisions are zero when not accrued, leaving the bare salary)
/// - deposit = base × `fgts_percent`
/// - penalty = deposit × `fgts_penalty_percent`, always accrued
///
/// # Legal Reference
///
/// Lei 8.036/1990 art. 15 (deposit) and art. 18 §1 (40% penalty).
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::{calculate_fgts, calculate_provisions};
/// use employer_cost_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
///
/// let config = StatutoryConfig::default();
/// let provisions = calculate_provisions(Decimal::from(3000), false, 1);
/// let result = calculate_fgts(Decimal::from(3000), &provisions, &config.rates, 2);
/// assert_eq!(result.deposit, Decimal::from(240));
/// assert_eq!(result.termination_penalty, Decimal::from(96));
/// ```
pub fn calculate_fgts(
    base_salary: Decimal,
    provisions: &ProvisionsResult,
    rates: &StatutoryRates,
    step_number: u32,
) -> FgtsResult {
    let base = base_salary
        + provisions.thirteenth_salary
        + provisions.vacation
        + provisions.vacation / THIRD;
    let deposit = percent_of(base, rates.fgts_percent);
    let termination_penalty = percent_of(deposit, rates.fgts_penalty_percent);

    let deposit_step = AuditStep {
        step_number,
        rule_id: "fgts_deposit".to_string(),
        rule_name: "FGTS Deposit".to_string(),
        legal_ref: "Lei 8.036/1990 art. 15".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "thirteenth_salary": provisions.thirteenth_salary.normalize().to_string(),
            "vacation": provisions.vacation.normalize().to_string(),
            "fgts_percent": rates.fgts_percent.normalize().to_string()
        }),
        output: serde_json::json!({
            "base": base.normalize().to_string(),
            "deposit": deposit.normalize().to_string()
        }),
        reasoning: format!(
            "R${} × {}% = R${}",
            base.round_dp(2),
            rates.fgts_percent.normalize(),
            deposit.round_dp(2)
        ),
    };

    let penalty_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "fgts_penalty".to_string(),
        rule_name: "FGTS Termination Penalty Provision".to_string(),
        legal_ref: "Lei 8.036/1990 art. 18 §1".to_string(),
        input: serde_json::json!({
            "deposit": deposit.normalize().to_string(),
            "fgts_penalty_percent": rates.fgts_penalty_percent.normalize().to_string()
        }),
        output: serde_json::json!({
            "termination_penalty": termination_penalty.normalize().to_string()
        }),
        reasoning: format!(
            "R${} × {}% = R${}",
            deposit.round_dp(2),
            rates.fgts_penalty_percent.normalize(),
            termination_penalty.round_dp(2)
        ),
    };

    FgtsResult {
        base,
        deposit,
        termination_penalty,
        audit_steps: vec![deposit_step, penalty_step],
    }
}
