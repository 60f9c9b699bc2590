//! The cost-calculation rules engine.
//!
//! [`CostCalculator`] validates a [`CompensationProfile`], runs each rule
//! for the profile's regime in a fixed order and assembles the resulting
//! [`CostBreakdown`] with its audit trace.

use rust_decimal::Decimal;

use crate::config::{RateBounds, StatutoryConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CompensationProfile, CostBreakdown, CostComponent, LineItem, Regime,
};

use super::{
    calculate_contractor_costs, calculate_employer_charges, calculate_fgts, calculate_provisions,
    calculate_transit_voucher, estimate_net_pay,
};

/// Largest accepted monetary input: R$ 1 trillion.
///
/// Keeps every product and sum the rules form within the `Decimal` range,
/// so no combination of accepted inputs can overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Computes employer cost breakdowns against one statutory configuration.
///
/// The calculator holds no mutable state; a single instance can be shared
/// across threads and requests.
///
/// # Example
///
/// ```
/// use employer_cost_engine::calculation::CostCalculator;
/// use employer_cost_engine::models::{CompensationProfile, CostComponent, Regime};
/// use rust_decimal::Decimal;
///
/// let calculator = CostCalculator::default();
/// let profile = CompensationProfile::default().with_regime(Regime::CltPresumidoReal);
/// let breakdown = calculator.compute(&profile).unwrap();
/// assert_eq!(breakdown.amount_of(CostComponent::InssEmployer), Some(Decimal::from(600)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    config: StatutoryConfig,
}

impl CostCalculator {
    /// Creates a calculator for the given statutory configuration.
    pub fn new(config: StatutoryConfig) -> Self {
        Self { config }
    }

    /// Returns the statutory configuration in use.
    pub fn config(&self) -> &StatutoryConfig {
        &self.config
    }

    /// Computes the full breakdown for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if a monetary field or rate is
    /// negative, if a monetary field exceeds [`MAX_AMOUNT`], or if a charge
    /// rate is outside the configured bounds under
    /// [`Regime::CltPresumidoReal`].
    pub fn compute(&self, profile: &CompensationProfile) -> EngineResult<CostBreakdown> {
        self.validate(profile)?;

        let breakdown = match profile.regime {
            Regime::CltSimples | Regime::CltPresumidoReal => self.compute_clt(profile),
            Regime::Pj => compute_contractor(profile),
        };
        Ok(breakdown)
    }

    /// Computes the same profile under every regime, in [`Regime::ALL`] order.
    ///
    /// # Errors
    ///
    /// Fails if the profile is invalid under any of the regimes.
    pub fn compare(&self, profile: &CompensationProfile) -> EngineResult<Vec<CostBreakdown>> {
        Regime::ALL
            .into_iter()
            .map(|regime| self.compute(&profile.with_regime(regime)))
            .collect()
    }

    fn validate(&self, profile: &CompensationProfile) -> EngineResult<()> {
        for (field, value) in profile.monetary_fields() {
            if value < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
            if value > MAX_AMOUNT {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not exceed {}, got {}", MAX_AMOUNT, value),
                ));
            }
        }

        let rates = &profile.employer_charge_rates;
        let limits = &self.config.rates.charge_rate_bounds;
        for (field, rate, bounds) in [
            ("employer_charge_rates.inss", rates.inss, limits.inss),
            ("employer_charge_rates.rat", rates.rat, limits.rat),
            ("employer_charge_rates.third_party", rates.third_party, limits.third_party),
        ] {
            if rate < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not be negative, got {}", rate),
                ));
            }
            if profile.regime == Regime::CltPresumidoReal && !bounds.contains(rate) {
                return Err(out_of_bounds(field, rate, bounds));
            }
        }

        Ok(())
    }

    fn compute_clt(&self, profile: &CompensationProfile) -> CostBreakdown {
        let rates = &self.config.rates;
        let salary = profile.base_salary;
        let mut audit_trace: Vec<AuditStep> = Vec::new();
        let mut step_number: u32 = 1;

        let provisions = calculate_provisions(salary, profile.accrue_provisions, step_number);
        step_number += 1;

        let fgts = calculate_fgts(salary, &provisions, rates, step_number);
        step_number += fgts.audit_steps.len() as u32;

        let charges = calculate_employer_charges(
            salary,
            profile.regime,
            &profile.employer_charge_rates,
            rates.inss_ceiling,
            step_number,
        );
        step_number += 1;

        let transit = calculate_transit_voucher(
            profile.daily_transit_passes,
            profile.transit_pass_unit_price,
            salary,
            rates,
            step_number,
        );
        step_number += 1;

        let pass_through = pass_through_items(profile);
        let pass_through_step = pass_through_audit_step(&pass_through, step_number);
        step_number += 1;

        let charge_labels = if profile.regime == Regime::CltPresumidoReal {
            let charge_rates = &profile.employer_charge_rates;
            [
                rated_label(CostComponent::InssEmployer, charge_rates.inss),
                rated_label(CostComponent::Rat, charge_rates.rat),
                rated_label(CostComponent::ThirdParty, charge_rates.third_party),
            ]
        } else {
            [
                CostComponent::InssEmployer.label().to_string(),
                CostComponent::Rat.label().to_string(),
                CostComponent::ThirdParty.label().to_string(),
            ]
        };
        let [inss_label, rat_label, third_party_label] = charge_labels;

        let mut line_items = vec![
            LineItem::new(CostComponent::BaseSalary, salary),
            LineItem::new(CostComponent::ThirteenthSalary, provisions.thirteenth_salary),
            LineItem::new(CostComponent::Vacation, provisions.vacation),
            LineItem::with_label(
                CostComponent::Fgts,
                rated_label(CostComponent::Fgts, rates.fgts_percent),
                fgts.deposit,
            ),
            LineItem::with_label(
                CostComponent::FgtsPenalty,
                rated_label(CostComponent::FgtsPenalty, rates.fgts_penalty_percent),
                fgts.termination_penalty,
            ),
            LineItem::with_label(CostComponent::InssEmployer, inss_label, charges.inss),
            LineItem::with_label(CostComponent::Rat, rat_label, charges.rat),
            LineItem::with_label(CostComponent::ThirdParty, third_party_label, charges.third_party),
            LineItem::new(CostComponent::TransitVoucher, transit.employer_cost),
        ];
        line_items.extend(pass_through);

        audit_trace.push(provisions.audit_step);
        audit_trace.extend(fgts.audit_steps);
        audit_trace.push(charges.audit_step);
        audit_trace.push(transit.audit_step);
        audit_trace.push(pass_through_step);

        let net_pay = if profile.estimate_net_pay {
            let result = estimate_net_pay(salary, profile.dependents_count, &self.config, step_number);
            audit_trace.extend(result.audit_steps);
            Some(result.estimate)
        } else {
            None
        };

        CostBreakdown::from_line_items(profile.regime, salary, line_items, net_pay, audit_trace)
    }
}

fn compute_contractor(profile: &CompensationProfile) -> CostBreakdown {
    let result = calculate_contractor_costs(profile, 1);

    let line_items = vec![
        LineItem::new(CostComponent::InvoiceValue, result.invoice_value),
        LineItem::new(CostComponent::Benefits, result.benefits),
        LineItem::new(CostComponent::HealthAndInsurance, result.health_and_insurance),
        LineItem::new(CostComponent::Infrastructure, result.infrastructure),
    ];

    CostBreakdown::from_line_items(
        Regime::Pj,
        profile.base_salary,
        line_items,
        None,
        vec![result.audit_step],
    )
}

/// Flat monthly benefits, passed through unchanged.
fn pass_through_items(profile: &CompensationProfile) -> Vec<LineItem> {
    [
        (CostComponent::MealVoucher, profile.meal_allowance),
        (CostComponent::FoodVoucher, profile.food_allowance),
        (CostComponent::HealthPlan, profile.health_plan),
        (CostComponent::DentalPlan, profile.dental_plan),
        (CostComponent::LifeInsurance, profile.life_insurance),
        (CostComponent::HomeOffice, profile.home_office_allowance),
        (CostComponent::Equipment, profile.equipment_allowance),
        (CostComponent::OtherCosts, profile.other_costs),
    ]
    .into_iter()
    .map(|(component, amount)| LineItem::new(component, amount))
    .collect()
}

fn pass_through_audit_step(items: &[LineItem], step_number: u32) -> AuditStep {
    let total: Decimal = items.iter().map(|item| item.amount).sum();
    let amounts: serde_json::Map<String, serde_json::Value> = items
        .iter()
        .map(|item| {
            (
                item.component.code().to_string(),
                serde_json::Value::String(item.amount.normalize().to_string()),
            )
        })
        .collect();

    AuditStep {
        step_number,
        rule_id: "benefits".to_string(),
        rule_name: "Flat Benefits and Allowances".to_string(),
        legal_ref: "Employer policy".to_string(),
        input: serde_json::Value::Object(amounts),
        output: serde_json::json!({
            "total": total.normalize().to_string()
        }),
        reasoning: format!(
            "{} flat item(s) passed through unchanged, R${} in total",
            items.len(),
            total.normalize()
        ),
    }
}

fn rated_label(component: CostComponent, percent: Decimal) -> String {
    format!("{} ({}%)", component.label(), percent.normalize())
}

fn out_of_bounds(field: &str, rate: Decimal, bounds: RateBounds) -> EngineError {
    EngineError::invalid_input(
        field,
        format!(
            "{}% is outside the accepted range {}%..={}%",
            rate.normalize(),
            bounds.min.normalize(),
            bounds.max.normalize()
        ),
    )
}
