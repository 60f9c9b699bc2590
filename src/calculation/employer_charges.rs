//! Employer payroll charges: INSS patronal, RAT and third-party.
//!
//! Companies under Lucro Presumido or Lucro Real pay these charges on top of
//! payroll. Simples Nacional companies pay them inside the unified tax, so
//! they contribute nothing to the employee's marginal cost.

use rust_decimal::Decimal;

use crate::models::{AuditStep, EmployerChargeRates, Regime};

use super::percent_of;

/// The result of the employer charges rule.
#[derive(Debug, Clone)]
pub struct EmployerChargesResult {
    /// Salary the charges are computed on, capped at the INSS ceiling.
    pub inss_base: Decimal,
    /// Employer INSS.
    pub inss: Decimal,
    /// Occupational-risk insurance.
    pub rat: Decimal,
    /// Third-party ("Sistema S") contributions.
    pub third_party: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates employer payroll charges.
///
/// Under [`Regime::CltPresumidoReal`]:
///
/// - base = `min(salary, inss_ceiling)`
/// - INSS = base × `rates.inss`, RAT = base × `rates.rat`,
///   third-party = base × `rates.third_party`
///
/// Every other regime yields zero charges.
///
/// # Legal Reference
///
/// Lei 8.212/1991 art. 22, I (INSS) and II (RAT); third-party
/// contributions per the FPAS code of the company.
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::calculate_employer_charges;
/// use employer_cost_engine::models::{EmployerChargeRates, Regime};
/// use rust_decimal::Decimal;
///
/// let result = calculate_employer_charges(
///     Decimal::from(3000),
///     Regime::CltPresumidoReal,
///     &EmployerChargeRates::default(),
///     Decimal::new(815741, 2),
///     1,
/// );
/// assert_eq!(result.inss, Decimal::from(600));
/// assert_eq!(result.rat, Decimal::from(60));
/// assert_eq!(result.third_party, Decimal::from(174));
/// ```
pub fn calculate_employer_charges(
    base_salary: Decimal,
    regime: Regime,
    rates: &EmployerChargeRates,
    inss_ceiling: Decimal,
    step_number: u32,
) -> EmployerChargesResult {
    if regime != Regime::CltPresumidoReal {
        let audit_step = AuditStep {
            step_number,
            rule_id: "employer_charges".to_string(),
            rule_name: "Employer Payroll Charges".to_string(),
            legal_ref: "Lei 8.212/1991 art. 22".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "regime": regime.code()
            }),
            output: serde_json::json!({
                "charges_applied": false,
                "inss": "0",
                "rat": "0",
                "third_party": "0"
            }),
            reasoning: format!(
                "No payroll charges on top of salary - regime is {}",
                regime.code()
            ),
        };

        return EmployerChargesResult {
            inss_base: Decimal::ZERO,
            inss: Decimal::ZERO,
            rat: Decimal::ZERO,
            third_party: Decimal::ZERO,
            audit_step,
        };
    }

    let ceiling_applied = base_salary > inss_ceiling;
    let inss_base = base_salary.min(inss_ceiling);
    let inss = percent_of(inss_base, rates.inss);
    let rat = percent_of(inss_base, rates.rat);
    let third_party = percent_of(inss_base, rates.third_party);

    let reasoning = format!(
        "Base R${}{}: INSS {}% = R${}, RAT {}% = R${}, third-party {}% = R${}",
        inss_base.normalize(),
        if ceiling_applied { " (capped at INSS ceiling)" } else { "" },
        rates.inss.normalize(),
        inss.round_dp(2),
        rates.rat.normalize(),
        rat.round_dp(2),
        rates.third_party.normalize(),
        third_party.round_dp(2)
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "employer_charges".to_string(),
        rule_name: "Employer Payroll Charges".to_string(),
        legal_ref: "Lei 8.212/1991 art. 22".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "regime": regime.code(),
            "inss_ceiling": inss_ceiling.normalize().to_string(),
            "inss_percent": rates.inss.normalize().to_string(),
            "rat_percent": rates.rat.normalize().to_string(),
            "third_party_percent": rates.third_party.normalize().to_string()
        }),
        output: serde_json::json!({
            "charges_applied": true,
            "ceiling_applied": ceiling_applied,
            "inss_base": inss_base.normalize().to_string(),
            "inss": inss.normalize().to_string(),
            "rat": rat.normalize().to_string(),
            "third_party": third_party.normalize().to_string()
        }),
        reasoning,
    };

    EmployerChargesResult {
        inss_base,
        inss,
        rat,
        third_party,
        audit_step,
    }
}
