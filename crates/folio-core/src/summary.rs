//! # Monetary Calculator
//!
//! Line amounts and invoice totals. Pure functions; negative inputs are
//! rejected by [`crate::validation`] before they get here.
//!
//! ## Formula
//! ```text
//! subtotal   = Σ line.amount + extraRevision + expressDelivery + addonsAmount
//! taxAmount  = round2(subtotal × taxPercent / 100)
//! total      = max(0, round2(subtotal + taxAmount − discount))
//! ```
//! `subtotal` is never rounded.

use rust_decimal::Decimal;

use crate::money::Money;
use crate::types::{AdditionalCharges, ServiceLine, Summary};

/// Amount of one line: the explicit amount when given and non-negative,
/// otherwise `quantity × rate`.
///
/// ```rust
/// use folio_core::money::Money;
/// use folio_core::summary::line_amount;
/// use rust_decimal::Decimal;
///
/// let q = Decimal::from(2);
/// assert_eq!(line_amount(q, Money::from_major(150), None), Money::from_major(300));
/// assert_eq!(
///     line_amount(q, Money::from_major(150), Some(Money::from_major(250))),
///     Money::from_major(250)
/// );
/// ```
pub fn line_amount(quantity: Decimal, rate: Money, explicit: Option<Money>) -> Money {
    match explicit {
        Some(amount) if !amount.is_negative() => amount,
        _ => rate.times(quantity),
    }
}

/// Computes the summary block for a set of lines and charges.
pub fn summarize(
    lines: &[ServiceLine],
    charges: &AdditionalCharges,
    tax_percent: Decimal,
    discount: Money,
) -> Summary {
    let subtotal: Money = lines.iter().map(|line| line.amount).sum::<Money>() + charges.total();
    let tax_amount = subtotal.percent(tax_percent).round2();
    let total = (subtotal + tax_amount - discount).round2().clamp_non_negative();

    Summary {
        subtotal,
        tax_percent,
        tax_amount,
        discount,
        total,
    }
}
