//! Cost breakdown models for the Employer Cost Engine.
//!
//! This module contains the [`CostBreakdown`] type and its associated
//! structures that capture every output of a cost calculation: the ordered
//! line items, the monthly and annual totals, the optional net-pay estimate
//! and an audit trace of each rule applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// Column name of the monthly total in tabular views.
pub const TOTAL_MONTHLY_COLUMN: &str = "total_monthly";

/// Column name of the annual total in tabular views.
pub const TOTAL_ANNUAL_COLUMN: &str = "total_annual";

/// A single cost source in a breakdown.
///
/// CLT and PJ use disjoint sets of components; [`CostComponent::for_regime`]
/// gives the ledger shape for each regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    /// Gross salary, reported but not counted as additional cost.
    BaseSalary,
    /// Monthly accrual for the 13th salary.
    ThirteenthSalary,
    /// Monthly accrual for vacation pay plus the one-third bonus.
    Vacation,
    /// FGTS deposit.
    Fgts,
    /// Accrual for the 40% FGTS termination penalty.
    FgtsPenalty,
    /// Employer INSS.
    InssEmployer,
    /// Occupational-risk insurance.
    Rat,
    /// Third-party ("Sistema S") contributions.
    ThirdParty,
    /// Transit voucher cost after the employee discount.
    TransitVoucher,
    /// Meal voucher.
    MealVoucher,
    /// Food voucher.
    FoodVoucher,
    /// Health plan.
    HealthPlan,
    /// Dental plan.
    DentalPlan,
    /// Life insurance.
    LifeInsurance,
    /// Home-office allowance.
    HomeOffice,
    /// Equipment or PPE.
    Equipment,
    /// Other costs.
    OtherCosts,
    /// Contractor invoice value, reported but not counted as additional cost.
    InvoiceValue,
    /// Contractor meal and food benefits.
    Benefits,
    /// Contractor health, dental and life insurance.
    HealthAndInsurance,
    /// Contractor home-office, equipment and other costs.
    Infrastructure,
}

const CLT_COMPONENTS: [CostComponent; 17] = [
    CostComponent::BaseSalary,
    CostComponent::ThirteenthSalary,
    CostComponent::Vacation,
    CostComponent::Fgts,
    CostComponent::FgtsPenalty,
    CostComponent::InssEmployer,
    CostComponent::Rat,
    CostComponent::ThirdParty,
    CostComponent::TransitVoucher,
    CostComponent::MealVoucher,
    CostComponent::FoodVoucher,
    CostComponent::HealthPlan,
    CostComponent::DentalPlan,
    CostComponent::LifeInsurance,
    CostComponent::HomeOffice,
    CostComponent::Equipment,
    CostComponent::OtherCosts,
];

const PJ_COMPONENTS: [CostComponent; 4] = [
    CostComponent::InvoiceValue,
    CostComponent::Benefits,
    CostComponent::HealthAndInsurance,
    CostComponent::Infrastructure,
];

impl CostComponent {
    /// Returns the components a breakdown for `regime` contains, in order.
    pub fn for_regime(regime: Regime) -> &'static [CostComponent] {
        match regime {
            Regime::CltSimples | Regime::CltPresumidoReal => &CLT_COMPONENTS,
            Regime::Pj => &PJ_COMPONENTS,
        }
    }

    /// Returns the snake_case identifier used as a table column.
    pub fn code(self) -> &'static str {
        match self {
            CostComponent::BaseSalary => "base_salary",
            CostComponent::ThirteenthSalary => "thirteenth_salary",
            CostComponent::Vacation => "vacation",
            CostComponent::Fgts => "fgts",
            CostComponent::FgtsPenalty => "fgts_penalty",
            CostComponent::InssEmployer => "inss_employer",
            CostComponent::Rat => "rat",
            CostComponent::ThirdParty => "third_party",
            CostComponent::TransitVoucher => "transit_voucher",
            CostComponent::MealVoucher => "meal_voucher",
            CostComponent::FoodVoucher => "food_voucher",
            CostComponent::HealthPlan => "health_plan",
            CostComponent::DentalPlan => "dental_plan",
            CostComponent::LifeInsurance => "life_insurance",
            CostComponent::HomeOffice => "home_office",
            CostComponent::Equipment => "equipment",
            CostComponent::OtherCosts => "other_costs",
            CostComponent::InvoiceValue => "invoice_value",
            CostComponent::Benefits => "benefits",
            CostComponent::HealthAndInsurance => "health_and_insurance",
            CostComponent::Infrastructure => "infrastructure",
        }
    }

    /// Returns the label shown to HR users.
    pub fn label(self) -> &'static str {
        match self {
            CostComponent::BaseSalary => "Salário Base",
            CostComponent::ThirteenthSalary => "13º Salário (Provisão Mensal)",
            CostComponent::Vacation => "Férias + 1/3 (Provisão Mensal)",
            CostComponent::Fgts => "FGTS Mensal",
            CostComponent::FgtsPenalty => "Provisão Multa FGTS",
            CostComponent::InssEmployer => "INSS Patronal",
            CostComponent::Rat => "RAT",
            CostComponent::ThirdParty => "Terceiros/Sistema S",
            CostComponent::TransitVoucher => "Vale Transporte (Custo Empresa)",
            CostComponent::MealVoucher => "Vale Refeição",
            CostComponent::FoodVoucher => "Vale Alimentação",
            CostComponent::HealthPlan => "Plano de Saúde",
            CostComponent::DentalPlan => "Plano Odontológico",
            CostComponent::LifeInsurance => "Seguro de Vida",
            CostComponent::HomeOffice => "Auxílio Home Office",
            CostComponent::Equipment => "Equipamentos/EPI",
            CostComponent::OtherCosts => "Outros Custos",
            CostComponent::InvoiceValue => "Valor Nota Fiscal (PJ)",
            CostComponent::Benefits => "Benefícios",
            CostComponent::HealthAndInsurance => "Saúde e Seguros",
            CostComponent::Infrastructure => "Infraestrutura",
        }
    }

    /// Returns true for components reported but excluded from the totals.
    pub fn is_informational(self) -> bool {
        matches!(self, CostComponent::BaseSalary | CostComponent::InvoiceValue)
    }
}

/// One named amount in a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Which cost source this line represents.
    pub component: CostComponent,
    /// Display label, which may embed the applied rate (e.g. "RAT (2%)").
    pub label: String,
    /// Monthly amount.
    pub amount: Decimal,
    /// Whether the line is excluded from the totals.
    pub informational: bool,
}

impl LineItem {
    /// Creates a line item labelled with the component's default label.
    pub fn new(component: CostComponent, amount: Decimal) -> Self {
        Self::with_label(component, component.label(), amount)
    }

    /// Creates a line item with a custom label.
    pub fn with_label(component: CostComponent, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            component,
            label: label.into(),
            amount,
            informational: component.is_informational(),
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or regulation behind this rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Employee-side take-home estimate.
///
/// Not part of the employer cost; reported alongside it when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPayEstimate {
    /// Gross monthly salary.
    pub gross_salary: Decimal,
    /// Employee INSS withheld.
    pub employee_inss: Decimal,
    /// Total dependent deduction applied to the income-tax base.
    pub dependents_deduction: Decimal,
    /// Income-tax base after INSS and dependents.
    pub income_tax_base: Decimal,
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Gross salary minus INSS and income tax.
    pub net_salary: Decimal,
}

/// The complete result of a cost calculation.
///
/// # Example
///
/// ```
/// use employer_cost_engine::calculation::CostCalculator;
/// use employer_cost_engine::models::CompensationProfile;
/// use rust_decimal::Decimal;
///
/// let breakdown = CostCalculator::default()
///     .compute(&CompensationProfile::default())
///     .unwrap();
/// assert_eq!(breakdown.total_annual, breakdown.total_monthly * Decimal::from(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// The regime the breakdown was computed for.
    pub regime: Regime,
    /// The salary or invoice value the breakdown was computed from.
    pub base_salary: Decimal,
    /// Ordered line items, informational ones included.
    pub line_items: Vec<LineItem>,
    /// Sum of the non-informational line items.
    pub total_monthly: Decimal,
    /// Twelve times the monthly total.
    pub total_annual: Decimal,
    /// Employee take-home estimate, when requested for a CLT regime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_pay: Option<NetPayEstimate>,
    /// Every rule applied, in order.
    pub audit_trace: Vec<AuditStep>,
}

impl CostBreakdown {
    /// Builds a breakdown from its line items, deriving both totals.
    pub fn from_line_items(
        regime: Regime,
        base_salary: Decimal,
        line_items: Vec<LineItem>,
        net_pay: Option<NetPayEstimate>,
        audit_trace: Vec<AuditStep>,
    ) -> Self {
        let total_monthly: Decimal = line_items
            .iter()
            .filter(|item| !item.informational)
            .map(|item| item.amount)
            .sum();

        Self {
            regime,
            base_salary,
            line_items,
            total_monthly,
            total_annual: total_monthly * Decimal::from(12),
            net_pay,
            audit_trace,
        }
    }

    /// Extra monthly cost per unit of salary; zero when the salary is zero.
    pub fn multiplier(&self) -> Decimal {
        if self.base_salary.is_zero() {
            Decimal::ZERO
        } else {
            self.total_monthly / self.base_salary
        }
    }

    /// Returns the amount of `component`, if the breakdown contains it.
    pub fn amount_of(&self, component: CostComponent) -> Option<Decimal> {
        self.line_items
            .iter()
            .find(|item| item.component == component)
            .map(|item| item.amount)
    }

    /// Returns the line items that count towards the totals.
    pub fn cost_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| !item.informational)
    }

    /// Returns the cost items with a positive amount, as shown in the
    /// per-employee detail view.
    pub fn nonzero_cost_items(&self) -> impl Iterator<Item = &LineItem> {
        self.cost_items().filter(|item| item.amount > Decimal::ZERO)
    }

    /// Returns the value of a tabular column: a component code or one of
    /// the two total columns.
    pub fn column_value(&self, column: &str) -> Option<Decimal> {
        match column {
            TOTAL_MONTHLY_COLUMN => Some(self.total_monthly),
            TOTAL_ANNUAL_COLUMN => Some(self.total_annual),
            code => self
                .line_items
                .iter()
                .find(|item| item.component.code() == code)
                .map(|item| item.amount),
        }
    }

    /// Returns the tabular columns for `regime`: component codes followed
    /// by the two totals.
    pub fn columns_for(regime: Regime) -> Vec<&'static str> {
        CostComponent::for_regime(regime)
            .iter()
            .map(|c| c.code())
            .chain([TOTAL_MONTHLY_COLUMN, TOTAL_ANNUAL_COLUMN])
            .collect()
    }
}
