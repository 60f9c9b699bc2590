//! Calculation logic for the Employer Cost Engine.
//!
//! Each rule lives in its own module and returns its amounts together with
//! the audit step that explains them: monthly provisions, FGTS, employer
//! payroll charges, the transit voucher, contractor cost buckets and the
//! employee net-pay estimate. [`CostCalculator`] runs them in order and
//! assembles the [`crate::models::CostBreakdown`].

mod brackets;
mod calculator;
mod contractor;
mod employer_charges;
mod fgts;
mod net_pay;
mod provisions;
mod transit;

use rust_decimal::Decimal;

pub use brackets::{BandPortion, ProgressiveTax, progressive_tax};
pub use calculator::{CostCalculator, MAX_AMOUNT};
pub use contractor::{ContractorCostsResult, calculate_contractor_costs};
pub use employer_charges::{EmployerChargesResult, calculate_employer_charges};
pub use fgts::{FgtsResult, calculate_fgts};
pub use net_pay::{NetPayResult, estimate_net_pay};
pub use provisions::{MONTHS_PER_YEAR, ProvisionsResult, calculate_provisions};
pub use transit::{TransitVoucherResult, calculate_transit_voucher};

/// Applies a percentage rate (`8` means 8%).
pub(crate) fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}
