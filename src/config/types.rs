//! Configuration types for the statutory tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every rate is a
//! percentage (`8` means 8%).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Inclusive lower and upper bounds for a caller-supplied rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBounds {
    /// Lowest accepted percentage.
    pub min: Decimal,
    /// Highest accepted percentage.
    pub max: Decimal,
}

impl RateBounds {
    /// Creates bounds from whole-number percentages.
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Returns true if `rate` lies within the bounds.
    pub fn contains(&self, rate: Decimal) -> bool {
        rate >= self.min && rate <= self.max
    }
}

/// Accepted ranges for the employer charge rates a caller may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRateBounds {
    /// Bounds for the employer INSS ("patronal") rate.
    pub inss: RateBounds,
    /// Bounds for the occupational-risk (RAT) rate.
    pub rat: RateBounds,
    /// Bounds for the third-party ("Sistema S") rate.
    pub third_party: RateBounds,
}

/// Statutory constants loaded from `statutory.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRates {
    /// The year these values were published for.
    pub reference_year: i32,
    /// Monthly salary ceiling for INSS contributions.
    pub inss_ceiling: Decimal,
    /// FGTS deposit rate.
    pub fgts_percent: Decimal,
    /// Termination penalty on the FGTS balance.
    pub fgts_penalty_percent: Decimal,
    /// Share of the salary the employee pays towards the transit voucher.
    pub transit_discount_percent: Decimal,
    /// Working days used to turn a daily transit cost into a monthly one.
    pub working_days_per_month: u32,
    /// Accepted override ranges for employer charges.
    pub charge_rate_bounds: ChargeRateBounds,
}

/// One band of a progressive table.
///
/// `up_to` is the inclusive upper limit of the band; `None` marks an open
/// top band that taxes everything above the previous limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper limit of this band, or `None` for the open top band.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Marginal rate applied to the portion inside this band.
    pub percent: Decimal,
}

/// An ordered progressive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketTable(Vec<TaxBracket>);

impl BracketTable {
    /// Creates a table from its bands, lowest first.
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self(brackets)
    }

    /// Returns the bands, lowest first.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.0
    }

    /// Checks that limits ascend, rates are not negative and only the last
    /// band is open.
    pub fn validate(&self, name: &str) -> EngineResult<()> {
        if self.0.is_empty() {
            return Err(EngineError::invalid_input(name, "bracket table is empty"));
        }

        let mut previous = Decimal::ZERO;
        for (i, bracket) in self.0.iter().enumerate() {
            if bracket.percent < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    name,
                    format!("bracket {} has a negative rate", i + 1),
                ));
            }
            match bracket.up_to {
                Some(limit) if limit <= previous => {
                    return Err(EngineError::invalid_input(
                        name,
                        format!("bracket {} limit {} does not ascend", i + 1, limit),
                    ));
                }
                Some(limit) => previous = limit,
                None if i + 1 != self.0.len() => {
                    return Err(EngineError::invalid_input(
                        name,
                        format!("bracket {} is open but is not the last bracket", i + 1),
                    ));
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// The employee income-tax withholding (IRRF) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxTable {
    /// Monthly deduction per declared dependent.
    pub dependent_deduction: Decimal,
    /// Progressive bands, starting with the zero-rate band.
    pub brackets: BracketTable,
}

/// Employee INSS table file structure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EmployeeInssConfig {
    /// Progressive bands, the last one ending at the INSS ceiling.
    pub brackets: BracketTable,
}

/// The complete statutory configuration the calculator runs against.
///
/// `Default` carries the 2025 reference values so the calculator works
/// without a configuration directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryConfig {
    /// Flat statutory rates and limits.
    pub rates: StatutoryRates,
    /// Employee-side INSS table.
    pub employee_inss: BracketTable,
    /// Employee-side income-tax table.
    pub income_tax: IncomeTaxTable,
}

impl StatutoryConfig {
    /// Validates every table and bound in the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        let rates = &self.rates;
        if rates.inss_ceiling < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "inss_ceiling",
                "must not be negative",
            ));
        }
        for (field, value) in [
            ("fgts_percent", rates.fgts_percent),
            ("fgts_penalty_percent", rates.fgts_penalty_percent),
            ("transit_discount_percent", rates.transit_discount_percent),
        ] {
            if value < Decimal::ZERO {
                return Err(EngineError::invalid_input(field, "must not be negative"));
            }
        }
        for (field, bounds) in [
            ("charge_rate_bounds.inss", rates.charge_rate_bounds.inss),
            ("charge_rate_bounds.rat", rates.charge_rate_bounds.rat),
            ("charge_rate_bounds.third_party", rates.charge_rate_bounds.third_party),
        ] {
            if bounds.min < Decimal::ZERO || bounds.min > bounds.max {
                return Err(EngineError::invalid_input(
                    field,
                    format!("invalid range {}..={}", bounds.min, bounds.max),
                ));
            }
        }
        if self.income_tax.dependent_deduction < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "income_tax.dependent_deduction",
                "must not be negative",
            ));
        }
        self.employee_inss.validate("employee_inss")?;
        self.income_tax.brackets.validate("income_tax")?;
        Ok(())
    }
}

impl Default for StatutoryConfig {
    fn default() -> Self {
        Self {
            rates: StatutoryRates {
                reference_year: 2025,
                inss_ceiling: Decimal::new(815741, 2),
                fgts_percent: Decimal::from(8),
                fgts_penalty_percent: Decimal::from(40),
                transit_discount_percent: Decimal::from(6),
                working_days_per_month: 22,
                charge_rate_bounds: ChargeRateBounds {
                    inss: RateBounds::new(Decimal::ZERO, Decimal::ONE_HUNDRED),
                    rat: RateBounds::new(Decimal::ONE, Decimal::from(3)),
                    third_party: RateBounds::new(Decimal::ZERO, Decimal::TEN),
                },
            },
            employee_inss: BracketTable::new(vec![
                TaxBracket {
                    up_to: Some(Decimal::new(151800, 2)),
                    percent: Decimal::new(75, 1),
                },
                TaxBracket {
                    up_to: Some(Decimal::new(279388, 2)),
                    percent: Decimal::from(9),
                },
                TaxBracket {
                    up_to: Some(Decimal::new(419083, 2)),
                    percent: Decimal::from(12),
                },
                TaxBracket {
                    up_to: Some(Decimal::new(815741, 2)),
                    percent: Decimal::from(14),
                },
            ]),
            income_tax: IncomeTaxTable {
                dependent_deduction: Decimal::new(18959, 2),
                brackets: BracketTable::new(vec![
                    TaxBracket {
                        up_to: Some(Decimal::new(242880, 2)),
                        percent: Decimal::ZERO,
                    },
                    TaxBracket {
                        up_to: Some(Decimal::new(282665, 2)),
                        percent: Decimal::new(75, 1),
                    },
                    TaxBracket {
                        up_to: Some(Decimal::new(375105, 2)),
                        percent: Decimal::from(15),
                    },
                    TaxBracket {
                        up_to: Some(Decimal::new(466468, 2)),
                        percent: Decimal::new(225, 1),
                    },
                    TaxBracket {
                        up_to: None,
                        percent: Decimal::new(275, 1),
                    },
                ]),
            },
        }
    }
}
