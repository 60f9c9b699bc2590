//! Marginal progressive-table accumulation.
//!
//! Shared by the employee INSS and the income-tax withholding estimates.

use rust_decimal::Decimal;

use crate::config::BracketTable;

use super::percent_of;

/// The share of an amount that fell inside one band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandPortion {
    /// Lower limit of the band (exclusive).
    pub lower: Decimal,
    /// Upper limit of the band, `None` for the open top band.
    pub upper: Option<Decimal>,
    /// Marginal rate of the band.
    pub percent: Decimal,
    /// Portion of the amount inside the band.
    pub taxed_amount: Decimal,
    /// Tax on that portion.
    pub tax: Decimal,
}

/// Total tax and its per-band decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveTax {
    /// Sum of the tax over every band.
    pub tax: Decimal,
    /// Bands the amount reached, lowest first.
    pub portions: Vec<BandPortion>,
}

/// Applies `table` to `amount` band by band.
///
/// Each band taxes only the portion of `amount` between the previous limit
/// and its own. When the last band is closed, anything above its limit is
/// not taxed (the INSS ceiling). Negative amounts yield zero.
///
/// # Examples
///
/// ```
/// use employer_cost_engine::calculation::progressive_tax;
/// use employer_cost_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = StatutoryConfig::default();
/// let inss = progressive_tax(Decimal::from(3000), &config.employee_inss);
/// assert_eq!(inss.tax, Decimal::from_str("253.4136").unwrap());
/// assert_eq!(inss.portions.len(), 3);
/// ```
pub fn progressive_tax(amount: Decimal, table: &BracketTable) -> ProgressiveTax {
    let mut tax = Decimal::ZERO;
    let mut portions = Vec::new();
    let mut lower = Decimal::ZERO;

    for bracket in table.brackets() {
        if amount <= lower {
            break;
        }

        let top = match bracket.up_to {
            Some(limit) => amount.min(limit),
            None => amount,
        };
        let taxed_amount = top - lower;
        let band_tax = percent_of(taxed_amount, bracket.percent);
        tax += band_tax;
        portions.push(BandPortion {
            lower,
            upper: bracket.up_to,
            percent: bracket.percent,
            taxed_amount,
            tax: band_tax,
        });

        match bracket.up_to {
            Some(limit) => lower = limit,
            None => break,
        }
    }

    ProgressiveTax { tax, portions }
}
