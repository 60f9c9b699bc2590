//! Employee take-home estimate.
//!
//! This is not part of the employer cost. It is reported next to the
//! breakdown so HR can show the candidate what the salary nets.

use rust_decimal::Decimal;

use crate::config::StatutoryConfig;
use crate::models::{AuditStep, NetPayEstimate};

use super::brackets::{BandPortion, progressive_tax};

/// The result of the net-pay rule.
#[derive(Debug, Clone)]
pub struct NetPayResult {
    /// The estimate itself.
    pub estimate: NetPayEstimate,
    /// Audit steps for the employee INSS and the income tax.
    pub audit_steps: Vec<AuditStep>,
}

fn portions_json(portions: &[BandPortion]) -> serde_json::Value {
    portions
        .iter()
        .map(|p| {
            serde_json::json!({
                "up_to": p.upper.map(|u| u.normalize().to_string()),
                "percent": p.percent.normalize().to_string(),
                "taxed_amount": p.taxed_amount.normalize().to_string(),
                "tax": p.tax.normalize().to_string()
            })
        })
        .collect()
}

/// Estimates the employee's net monthly salary.
///
/// - employee INSS = progressive table over the gross salary, nothing
///   above the last band
/// - income-tax base = `max(0, gross - INSS - dependents × deduction)`
/// - income tax = progressive table over the base
/// - net = gross - INSS - income tax
///
/// # Legal Reference
///
/// Lei 8.212/1991 art. 20 (employee INSS); Lei 7.713/1988 and Lei
/// 9.250/1995 art. 4, III (IRRF and dependent deduction).
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::estimate_net_pay;
/// use employer_cost_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
///
/// let result = estimate_net_pay(Decimal::from(2000), 0, &StatutoryConfig::default(), 1);
/// assert_eq!(result.estimate.income_tax, Decimal::ZERO);
/// assert!(result.estimate.net_salary < Decimal::from(2000));
/// ```
pub fn estimate_net_pay(
    gross_salary: Decimal,
    dependents_count: u32,
    config: &StatutoryConfig,
    step_number: u32,
) -> NetPayResult {
    let inss = progressive_tax(gross_salary, &config.employee_inss);
    let employee_inss = inss.tax;

    let dependents_deduction =
        Decimal::from(dependents_count) * config.income_tax.dependent_deduction;
    let income_tax_base = (gross_salary - employee_inss - dependents_deduction).max(Decimal::ZERO);
    let irrf = progressive_tax(income_tax_base, &config.income_tax.brackets);
    let income_tax = irrf.tax;

    let net_salary = gross_salary - employee_inss - income_tax;

    let inss_step = AuditStep {
        step_number,
        rule_id: "employee_inss".to_string(),
        rule_name: "Employee INSS Withholding".to_string(),
        legal_ref: "Lei 8.212/1991 art. 20".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "employee_inss": employee_inss.normalize().to_string(),
            "bands": portions_json(&inss.portions)
        }),
        reasoning: format!(
            "Progressive INSS over {} band(s) on R${} = R${}",
            inss.portions.len(),
            gross_salary.normalize(),
            employee_inss.round_dp(2)
        ),
    };

    let irrf_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax Withholding (IRRF)".to_string(),
        legal_ref: "Lei 7.713/1988; Lei 9.250/1995 art. 4".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "employee_inss": employee_inss.normalize().to_string(),
            "dependents_count": dependents_count,
            "dependent_deduction": config.income_tax.dependent_deduction.normalize().to_string()
        }),
        output: serde_json::json!({
            "income_tax_base": income_tax_base.normalize().to_string(),
            "income_tax": income_tax.normalize().to_string(),
            "net_salary": net_salary.normalize().to_string(),
            "bands": portions_json(&irrf.portions)
        }),
        reasoning: format!(
            "Base R${} - INSS R${} - {} dependent(s) = R${}; IRRF R${}; net R${}",
            gross_salary.normalize(),
            employee_inss.round_dp(2),
            dependents_count,
            income_tax_base.round_dp(2),
            income_tax.round_dp(2),
            net_salary.round_dp(2)
        ),
    };

    NetPayResult {
        estimate: NetPayEstimate {
            gross_salary,
            employee_inss,
            dependents_deduction,
            income_tax_base,
            income_tax,
            net_salary,
        },
        audit_steps: vec![inss_step, irrf_step],
    }
}
