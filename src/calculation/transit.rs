//! Transit voucher ("vale-transporte") employer cost.

use rust_decimal::Decimal;

use crate::config::StatutoryRates;
use crate::models::AuditStep;

use super::percent_of;

/// The result of the transit voucher rule.
#[derive(Debug, Clone)]
pub struct TransitVoucherResult {
    /// Monthly cost of the passes before any discount.
    pub raw_cost: Decimal,
    /// Maximum the employee can be charged (a share of the salary).
    pub discount_cap: Decimal,
    /// What the employee actually pays.
    pub employee_discount: Decimal,
    /// What the employer pays; never negative.
    pub employer_cost: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employer share of the transit voucher.
///
/// - raw = passes × unit price × working days per month
/// - cap = salary × `transit_discount_percent`
/// - employee discount = `min(raw, cap)`
/// - employer cost = `max(0, raw - employee discount)`
///
/// # Legal Reference
///
/// Lei 7.418/1985 art. 4, sole paragraph (6% employee share).
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::calculate_transit_voucher;
/// use employer_cost_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = StatutoryConfig::default().rates;
/// let result = calculate_transit_voucher(
///     2,
///     Decimal::from_str("5.50").unwrap(),
///     Decimal::from(3000),
///     &rates,
///     1,
/// );
/// assert_eq!(result.raw_cost, Decimal::from(242));
/// assert_eq!(result.discount_cap, Decimal::from(180));
/// assert_eq!(result.employer_cost, Decimal::from(62));
/// ```
pub fn calculate_transit_voucher(
    daily_passes: u32,
    unit_price: Decimal,
    base_salary: Decimal,
    rates: &StatutoryRates,
    step_number: u32,
) -> TransitVoucherResult {
    let working_days = Decimal::from(rates.working_days_per_month);
    let raw_cost = Decimal::from(daily_passes) * unit_price * working_days;
    let discount_cap = percent_of(base_salary, rates.transit_discount_percent);
    let employee_discount = raw_cost.min(discount_cap);
    let employer_cost = (raw_cost - employee_discount).max(Decimal::ZERO);

    let reasoning = format!(
        "{} passes × R${} × {} days = R${}; employee pays min(R${}, {}% of R${}) = R${}; employer pays R${}",
        daily_passes,
        unit_price.normalize(),
        rates.working_days_per_month,
        raw_cost.normalize(),
        raw_cost.normalize(),
        rates.transit_discount_percent.normalize(),
        base_salary.normalize(),
        employee_discount.round_dp(2),
        employer_cost.round_dp(2)
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "transit_voucher".to_string(),
        rule_name: "Transit Voucher".to_string(),
        legal_ref: "Lei 7.418/1985 art. 4".to_string(),
        input: serde_json::json!({
            "daily_passes": daily_passes,
            "unit_price": unit_price.normalize().to_string(),
            "working_days_per_month": rates.working_days_per_month,
            "base_salary": base_salary.normalize().to_string(),
            "transit_discount_percent": rates.transit_discount_percent.normalize().to_string()
        }),
        output: serde_json::json!({
            "raw_cost": raw_cost.normalize().to_string(),
            "discount_cap": discount_cap.normalize().to_string(),
            "employee_discount": employee_discount.normalize().to_string(),
            "employer_cost": employer_cost.normalize().to_string()
        }),
        reasoning,
    };

    TransitVoucherResult {
        raw_cost,
        discount_cap,
        employee_discount,
        employer_cost,
        audit_step,
    }
}
