//! Monthly provisions for the 13th salary and for vacation pay.
//!
//! CLT employees are owed one extra salary a year (the 13th) and thirty days
//! of paid vacation with a constitutional one-third bonus. Employers accrue
//! both monthly so the annual payout does not land as a single spike.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// Months in a year, used to pro-rate annual entitlements.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

const VACATION_BONUS_DIVISOR: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// The result of the provisions rule.
#[derive(Debug, Clone)]
pub struct ProvisionsResult {
    /// Monthly accrual for the 13th salary.
    pub thirteenth_salary: Decimal,
    /// Monthly accrual for vacation pay, one-third bonus included.
    pub vacation: Decimal,
    /// The one-third bonus portion of `vacation`.
    pub vacation_bonus: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly 13th-salary and vacation provisions.
///
/// When `accrue` is false both provisions are zero. Otherwise:
///
/// - 13th salary = `salary / 12`
/// - vacation = `salary / 12 + (salary / 3) / 12`
///
/// The one-third bonus is taken on the salary and then pro-rated, so the
/// order of operations is division by 3 first, then by 12.
///
/// # Legal Reference
///
/// Lei 4.090/1962 (13th salary); CF/88 art. 7, XVII (vacation + 1/3).
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::calculate_provisions;
/// use rust_decimal::Decimal;
///
/// let result = calculate_provisions(Decimal::from(3600), true, 1);
/// assert_eq!(result.thirteenth_salary, Decimal::from(300));
/// assert_eq!(result.vacation, Decimal::from(400));
/// ```
pub fn calculate_provisions(base_salary: Decimal, accrue: bool, step_number: u32) -> ProvisionsResult {
    if !accrue {
        let audit_step = AuditStep {
            step_number,
            rule_id: "provisions".to_string(),
            rule_name: "13th Salary and Vacation Provisions".to_string(),
            legal_ref: "Lei 4.090/1962; CF/88 art. 7, XVII".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "accrue_provisions": false
            }),
            output: serde_json::json!({
                "thirteenth_salary": "0",
                "vacation": "0"
            }),
            reasoning: "Provisions not accrued - 13th salary and vacation are zero".to_string(),
        };

        return ProvisionsResult {
            thirteenth_salary: Decimal::ZERO,
            vacation: Decimal::ZERO,
            vacation_bonus: Decimal::ZERO,
            audit_step,
        };
    }

    let thirteenth_salary = base_salary / MONTHS_PER_YEAR;
    let vacation_bonus = base_salary / VACATION_BONUS_DIVISOR / MONTHS_PER_YEAR;
    let vacation = base_salary / MONTHS_PER_YEAR + vacation_bonus;

    let audit_step = AuditStep {
        step_number,
        rule_id: "provisions".to_string(),
        rule_name: "13th Salary and Vacation Provisions".to_string(),
        legal_ref: "Lei 4.090/1962; CF/88 art. 7, XVII".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "accrue_provisions": true
        }),
        output: serde_json::json!({
            "thirteenth_salary": thirteenth_salary.normalize().to_string(),
            "vacation": vacation.normalize().to_string(),
            "vacation_bonus": vacation_bonus.normalize().to_string()
        }),
        reasoning: format!(
            "13th: R${} / 12 = R${}; vacation: R${} / 12 + (R${} / 3) / 12 = R${}",
            base_salary.normalize(),
            thirteenth_salary.round_dp(2),
            base_salary.normalize(),
            base_salary.normalize(),
            vacation.round_dp(2)
        ),
    };

    ProvisionsResult {
        thirteenth_salary,
        vacation,
        vacation_bonus,
        audit_step,
    }
}
