//! # Document Totals Aggregator
//!
//! Folds priced line items into the totals shown at the bottom of a
//! document.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each line (left to right):                                        │
//! │      taxable_amount += line.rate                                        │
//! │      total_discount += line.discount                                    │
//! │      vat            += line.tax                                         │
//! │                                                                         │
//! │  total = taxable_amount − total_discount + vat                          │
//! │                                                                         │
//! │  round_off?  ── yes ──► round_off_value = round(total) − total          │
//! │      │                  total           = round(total)                  │
//! │      no ──────────────► round_off_value = 0                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that `taxable_amount` here is the sum of line *rates* (pre-discount),
//! matching the field the backend stores. The total is derived from the
//! three sums, never accumulated from line amounts, for every variant.
//!
//! Totals are a disposable snapshot: recompute them whenever an item or the
//! round-off flag changes. Nothing here caches.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::{price_line, LinePricing};
use crate::types::{LineItem, PricingVariant};

/// Document-level totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentTotals {
    /// Sum of line rates (before discount).
    pub taxable_amount: Money,
    pub total_discount: Money,
    /// Sum of line taxes.
    pub vat: Money,
    /// Purchase screens send this as `TotalAmount`.
    #[serde(alias = "TotalAmount")]
    pub total: Money,
    pub round_off_value: Money,
}

impl DocumentTotals {
    /// All-zero totals, the result for an empty document.
    pub fn zero() -> Self {
        DocumentTotals::default()
    }

    /// Prices every item under `variant` and folds the results.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::{DocumentTotals, PricingVariant};
    ///
    /// let totals = DocumentTotals::from_items(PricingVariant::Sales, &[], true);
    /// assert_eq!(totals, DocumentTotals::zero());
    /// ```
    pub fn from_items(variant: PricingVariant, items: &[LineItem], round_off: bool) -> Self {
        Self::from_pricings(
            items.iter().map(|item| price_line(variant, Some(item))),
            round_off,
        )
    }

    /// Folds already-priced lines, in order.
    pub fn from_pricings<I>(lines: I, round_off: bool) -> Self
    where
        I: IntoIterator<Item = LinePricing>,
    {
        let (taxable_amount, total_discount, vat) = lines.into_iter().fold(
            (Money::zero(), Money::zero(), Money::zero()),
            |(taxable, discount, vat), line| {
                (taxable + line.rate, discount + line.discount, vat + line.tax)
            },
        );

        DocumentTotals {
            taxable_amount,
            total_discount,
            vat,
            total: taxable_amount - total_discount + vat,
            round_off_value: Money::zero(),
        }
        .with_round_off(round_off)
    }

    /// Applies (or clears) the whole-unit round-off.
    ///
    /// The unrounded total is always re-derived from the three sums, so
    /// toggling the flag back and forth is lossless.
    pub fn with_round_off(self, round_off: bool) -> Self {
        let exact = self.taxable_amount - self.total_discount + self.vat;

        if round_off {
            let rounded = exact.round_whole();
            DocumentTotals {
                total: rounded,
                round_off_value: rounded - exact,
                ..self
            }
        } else {
            DocumentTotals {
                total: exact,
                round_off_value: Money::zero(),
                ..self
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
