//! Compensation profile and hiring regime types.
//!
//! A [`CompensationProfile`] is the full set of inputs for one cost
//! calculation. It is built once per run, passed by reference into the
//! calculator and never mutated by it.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The hiring regime that decides which cost rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// CLT employment for a company taxed under Simples Nacional.
    /// Employer payroll charges are collected through the unified tax.
    #[default]
    CltSimples,
    /// CLT employment for a company under Lucro Presumido or Lucro Real.
    /// INSS patronal, RAT and third-party charges are paid on payroll.
    CltPresumidoReal,
    /// Independent contractor paid by invoice.
    Pj,
}

impl Regime {
    /// Every regime, in display order.
    pub const ALL: [Regime; 3] = [Regime::CltSimples, Regime::CltPresumidoReal, Regime::Pj];

    /// Returns true for both CLT variants.
    pub fn is_clt(self) -> bool {
        matches!(self, Regime::CltSimples | Regime::CltPresumidoReal)
    }

    /// Returns the snake_case identifier used in JSON and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Regime::CltSimples => "clt_simples",
            Regime::CltPresumidoReal => "clt_presumido_real",
            Regime::Pj => "pj",
        }
    }

    /// Returns the label shown to HR users.
    pub fn label(self) -> &'static str {
        match self {
            Regime::CltSimples => "CLT (Simples Nacional)",
            Regime::CltPresumidoReal => "CLT (Lucro Presumido/Real)",
            Regime::Pj => "PJ",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Regime {
    type Err = EngineError;

    /// Accepts the snake_case code or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Regime::ALL
            .into_iter()
            .find(|r| trimmed.eq_ignore_ascii_case(r.code()) || trimmed == r.label())
            .ok_or_else(|| {
                EngineError::invalid_input("regime", format!("unrecognized regime '{}'", s))
            })
    }
}

/// Employer payroll charge rates, as percentages.
///
/// Only used under [`Regime::CltPresumidoReal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployerChargeRates {
    /// Employer INSS ("patronal") rate.
    pub inss: Decimal,
    /// Occupational-risk insurance rate, 1% to 3% by risk class.
    pub rat: Decimal,
    /// Third-party ("Sistema S") contributions.
    pub third_party: Decimal,
}

impl Default for EmployerChargeRates {
    fn default() -> Self {
        Self {
            inss: Decimal::from(20),
            rat: Decimal::TWO,
            third_party: Decimal::new(58, 1),
        }
    }
}

/// All inputs for one employer cost calculation.
///
/// Missing fields deserialize to the same defaults the calculator form
/// starts with, so `{}` is a valid profile.
///
/// # Example
///
/// ```
/// use employer_cost_engine::models::{CompensationProfile, Regime};
/// use rust_decimal::Decimal;
///
/// let profile: CompensationProfile =
///     serde_json::from_str(r#"{"base_salary": "4500", "regime": "pj"}"#).unwrap();
/// assert_eq!(profile.regime, Regime::Pj);
/// assert_eq!(profile.base_salary, Decimal::from(4500));
/// assert_eq!(profile.meal_allowance, Decimal::from(550));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationProfile {
    /// Gross monthly salary (CLT) or monthly invoice value (PJ).
    pub base_salary: Decimal,
    /// The hiring regime.
    pub regime: Regime,
    /// Whether to accrue monthly 13th-salary and vacation provisions (CLT only).
    pub accrue_provisions: bool,
    /// Transit passes used per working day.
    pub daily_transit_passes: u32,
    /// Price of a single transit pass.
    pub transit_pass_unit_price: Decimal,
    /// Meal voucher ("vale refeição").
    pub meal_allowance: Decimal,
    /// Food voucher ("vale alimentação").
    pub food_allowance: Decimal,
    /// Health plan.
    pub health_plan: Decimal,
    /// Dental plan.
    pub dental_plan: Decimal,
    /// Life insurance.
    pub life_insurance: Decimal,
    /// Home-office allowance.
    pub home_office_allowance: Decimal,
    /// Equipment or PPE allowance.
    pub equipment_allowance: Decimal,
    /// Any other monthly cost.
    pub other_costs: Decimal,
    /// Employer payroll charge rates.
    pub employer_charge_rates: EmployerChargeRates,
    /// Dependents declared for income-tax withholding.
    pub dependents_count: u32,
    /// Whether to attach an employee net-pay estimate to the breakdown.
    pub estimate_net_pay: bool,
}

impl Default for CompensationProfile {
    fn default() -> Self {
        Self {
            base_salary: Decimal::from(3000),
            regime: Regime::default(),
            accrue_provisions: true,
            daily_transit_passes: 2,
            transit_pass_unit_price: Decimal::new(550, 2),
            meal_allowance: Decimal::from(550),
            food_allowance: Decimal::from(250),
            health_plan: Decimal::ZERO,
            dental_plan: Decimal::ZERO,
            life_insurance: Decimal::ZERO,
            home_office_allowance: Decimal::ZERO,
            equipment_allowance: Decimal::ZERO,
            other_costs: Decimal::ZERO,
            employer_charge_rates: EmployerChargeRates::default(),
            dependents_count: 0,
            estimate_net_pay: false,
        }
    }
}

impl CompensationProfile {
    /// Returns a copy of this profile with a different base salary.
    ///
    /// The batch pipeline uses this to apply one set of benefit settings to
    /// every employee in a spreadsheet.
    pub fn with_salary(&self, base_salary: Decimal) -> Self {
        Self {
            base_salary,
            ..self.clone()
        }
    }

    /// Returns a copy of this profile under a different regime.
    pub fn with_regime(&self, regime: Regime) -> Self {
        Self {
            regime,
            ..self.clone()
        }
    }

    /// Returns every monetary field paired with its name.
    pub(crate) fn monetary_fields(&self) -> [(&'static str, Decimal); 10] {
        [
            ("base_salary", self.base_salary),
            ("transit_pass_unit_price", self.transit_pass_unit_price),
            ("meal_allowance", self.meal_allowance),
            ("food_allowance", self.food_allowance),
            ("health_plan", self.health_plan),
            ("dental_plan", self.dental_plan),
            ("life_insurance", self.life_insurance),
            ("home_office_allowance", self.home_office_allowance),
            ("equipment_allowance", self.equipment_allowance),
            ("other_costs", self.other_costs),
        ]
    }
}
