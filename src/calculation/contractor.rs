//! Contractor (PJ) cost buckets.
//!
//! A PJ contractor invoices the company directly, so there are no payroll
//! provisions or charges. Whatever benefits the company still pays for are
//! grouped into three buckets.

use rust_decimal::Decimal;

use crate::models::{AuditStep, CompensationProfile};

/// The result of the contractor rule.
#[derive(Debug, Clone)]
pub struct ContractorCostsResult {
    /// Monthly invoice value, reported but not added to the total.
    pub invoice_value: Decimal,
    /// Meal and food allowances.
    pub benefits: Decimal,
    /// Health plan, dental plan and life insurance.
    pub health_and_insurance: Decimal,
    /// Home-office, equipment and other costs.
    pub infrastructure: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl ContractorCostsResult {
    /// Sum of the three buckets.
    pub fn total(&self) -> Decimal {
        self.benefits + self.health_and_insurance + self.infrastructure
    }
}

/// Groups the profile's benefit inputs into the PJ cost buckets.
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::calculate_contractor_costs;
/// use employer_cost_engine::models::{CompensationProfile, Regime};
/// use rust_decimal::Decimal;
///
/// let profile = CompensationProfile::default().with_regime(Regime::Pj);
/// let result = calculate_contractor_costs(&profile, 1);
/// assert_eq!(result.benefits, Decimal::from(800));
/// assert_eq!(result.total(), Decimal::from(800));
/// ```
pub fn calculate_contractor_costs(
    profile: &CompensationProfile,
    step_number: u32,
) -> ContractorCostsResult {
    let invoice_value = profile.base_salary;
    let benefits = profile.meal_allowance + profile.food_allowance;
    let health_and_insurance = profile.health_plan + profile.dental_plan + profile.life_insurance;
    let infrastructure =
        profile.home_office_allowance + profile.equipment_allowance + profile.other_costs;

    let audit_step = AuditStep {
        step_number,
        rule_id: "contractor_costs".to_string(),
        rule_name: "Contractor Cost Buckets".to_string(),
        legal_ref: "Lei 13.429/2017".to_string(),
        input: serde_json::json!({
            "invoice_value": invoice_value.normalize().to_string(),
            "meal_allowance": profile.meal_allowance.normalize().to_string(),
            "food_allowance": profile.food_allowance.normalize().to_string(),
            "health_plan": profile.health_plan.normalize().to_string(),
            "dental_plan": profile.dental_plan.normalize().to_string(),
            "life_insurance": profile.life_insurance.normalize().to_string(),
            "home_office_allowance": profile.home_office_allowance.normalize().to_string(),
            "equipment_allowance": profile.equipment_allowance.normalize().to_string(),
            "other_costs": profile.other_costs.normalize().to_string()
        }),
        output: serde_json::json!({
            "benefits": benefits.normalize().to_string(),
            "health_and_insurance": health_and_insurance.normalize().to_string(),
            "infrastructure": infrastructure.normalize().to_string()
        }),
        reasoning: format!(
            "Invoice R${} is not an additional cost; benefits R${} + health/insurance R${} + infrastructure R${}",
            invoice_value.normalize(),
            benefits.normalize(),
            health_and_insurance.normalize(),
            infrastructure.normalize()
        ),
    };

    ContractorCostsResult {
        invoice_value,
        benefits,
        health_and_insurance,
        infrastructure,
        audit_step,
    }
}
