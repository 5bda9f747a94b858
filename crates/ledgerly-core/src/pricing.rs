//! # Line-Item Pricing Engine
//!
//! Turns one [`LineItem`] into its priced fields.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    price_line(variant, item)                            │
//! │                                                                         │
//! │  quantity ──┐                                                           │
//! │             ├──► rate = round2(qty × unit_rate)                         │
//! │  unit_rate ─┘         │                                                 │
//! │                       ├──► discount (round2, per-variant rule)          │
//! │                       ▼                                                 │
//! │             taxable_amount = rate − discount                            │
//! │                       │                                                 │
//! │  tax_rate ────────────┼──► tax = tax_rate / 100 × taxable_amount        │
//! │                       ▼                                                 │
//! │             amount = taxable_amount + tax                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `rate` and `discount` are rounded, each at the step that produces
//! it. Tax and amount stay exact.
//!
//! ## Discount Resolution Per Variant
//! ```text
//! ┌──────────────────┬──────────────────────────────┬───────────────────────────┐
//! │                  │ form-updated                 │ original                  │
//! ├──────────────────┼──────────────────────────────┼───────────────────────────┤
//! │ Sales            │ ORIGINAL type == % ?         │ round2(original_discount) │
//! │                  │   round2(rate × fu / 100)    │ (type ignored)            │
//! │                  │   : round2(fu)               │                           │
//! ├──────────────────┼──────────────────────────────┼───────────────────────────┤
//! │ Purchase,        │ FU type == % ?               │ ORIGINAL type == % ?      │
//! │ PurchaseReturn   │   round2(rate × fu / 100)    │   round2(rate × orig/100) │
//! │                  │   : round2(fu)               │   : round2(orig)          │
//! └──────────────────┴──────────────────────────────┴───────────────────────────┘
//! ```
//!
//! A sales row's original discount is stored already resolved to money.

use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DiscountType, LineItem, PricingVariant, TaxRate};

// =============================================================================
// Line Pricing
// =============================================================================

/// The priced fields of one line item.
///
/// ## Invariants
/// - `taxable_amount == rate − discount`
/// - `amount == taxable_amount + tax`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LinePricing {
    #[ts(type = "number")]
    pub quantity: i64,
    /// The unit price the engine selected.
    pub unit_rate: Money,
    /// Line subtotal before discount (`quantity × unit_rate`).
    pub rate: Money,
    #[ts(type = "number")]
    pub discount_type: DiscountType,
    /// Discount resolved to money.
    pub discount: Money,
    pub taxable_amount: Money,
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub amount: Money,
}

impl LinePricing {
    /// The result for a missing line: every field zero.
    pub fn zero() -> Self {
        LinePricing::default()
    }
}

/// A line item together with its priced fields, as sent to the backend.
///
/// Serializes as one flat object: the item's fields with the priced fields
/// written over them (`quantity` appears on both sides with equal value).
#[derive(Debug, Clone, PartialEq, TS)]
#[ts(export)]
pub struct PricedLineItem {
    #[ts(flatten)]
    pub item: LineItem,
    #[ts(flatten)]
    pub pricing: LinePricing,
}

impl Serialize for PricedLineItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = Map::new();
        for part in [
            serde_json::to_value(&self.item),
            serde_json::to_value(&self.pricing),
        ] {
            if let Value::Object(map) = part.map_err(S::Error::custom)? {
                fields.extend(map);
            }
        }
        fields.serialize(serializer)
    }
}

impl PricedLineItem {
    /// Prices `item` and pairs it with the result.
    pub fn new(variant: PricingVariant, item: LineItem) -> Self {
        let pricing = price_line(variant, Some(&item));
        PricedLineItem { item, pricing }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Prices one line item under the given variant.
///
/// Never fails: a missing item prices as [`LinePricing::zero`], and
/// out-of-range percentages are applied as given.
///
/// ## Example
/// ```rust
/// use ledgerly_core::pricing::price_line;
/// use ledgerly_core::{DiscountType, LineItem, Money, PricingVariant, TaxRate};
/// use rust_decimal::Decimal;
///
/// let item = LineItem {
///     quantity: 1,
///     form_updated_rate: Money::new(Decimal::new(200, 0)),
///     is_form_updated: true,
///     original_discount_type: DiscountType::Percentage,
///     form_updated_discount_type: DiscountType::Percentage,
///     form_updated_discount: Decimal::new(10, 0),
///     form_updated_tax: TaxRate::from_percentage(Decimal::new(15, 0)),
///     ..LineItem::default()
/// };
///
/// let priced = price_line(PricingVariant::Sales, Some(&item));
/// assert_eq!(priced.discount.amount(), Decimal::new(20, 0));
/// assert_eq!(priced.tax.amount(), Decimal::new(27, 0));
/// assert_eq!(priced.amount.amount(), Decimal::new(207, 0));
/// ```
pub fn price_line(variant: PricingVariant, item: Option<&LineItem>) -> LinePricing {
    let Some(item) = item else {
        return LinePricing::zero();
    };

    let overridden = item.is_form_updated;

    // Every variant, sales included, reads the catalog price on an
    // untouched row; `form_updated_rate` is ignored until the row is edited.
    let unit_rate = if overridden {
        item.form_updated_rate
    } else {
        item.original_rate
    };
    let rate = unit_rate.multiply_quantity(item.quantity).round_cents();

    let (discount_type, discount) = match variant {
        PricingVariant::Sales => sales_discount(item, rate),
        PricingVariant::Purchase | PricingVariant::PurchaseReturn => purchase_discount(item, rate),
    };

    let taxable_amount = rate - discount;

    let tax_rate = if overridden {
        item.form_updated_tax
    } else {
        item.reference_tax_rate()
    };
    let tax = tax_rate.tax_on(taxable_amount);

    LinePricing {
        quantity: item.quantity,
        unit_rate,
        rate,
        discount_type,
        discount,
        taxable_amount,
        tax_rate,
        tax,
        amount: taxable_amount + tax,
    }
}

/// Resolves a discount magnitude against the line rate.
pub(crate) fn resolve_discount(rate: Money, kind: DiscountType, magnitude: Decimal) -> Money {
    match kind {
        DiscountType::Percentage => rate.percentage(magnitude).round_cents(),
        DiscountType::Fixed => Money::new(magnitude).round_cents(),
    }
}

/// Sales rows: the form-updated branch keys percentage math off the
/// ORIGINAL type; the original branch never applies it.
fn sales_discount(item: &LineItem, rate: Money) -> (DiscountType, Money) {
    if item.is_form_updated {
        let discount = resolve_discount(
            rate,
            item.original_discount_type,
            item.form_updated_discount,
        );
        (item.form_updated_discount_type, discount)
    } else {
        let discount = Money::new(item.original_discount).round_cents();
        (item.original_discount_type, discount)
    }
}

/// Purchase rows: type and magnitude come from the same branch.
fn purchase_discount(item: &LineItem, rate: Money) -> (DiscountType, Money) {
    let (kind, magnitude) = if item.is_form_updated {
        (item.form_updated_discount_type, item.form_updated_discount)
    } else {
        (item.original_discount_type, item.original_discount)
    };
    (kind, resolve_discount(rate, kind, magnitude))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxInfo;
    use rust_decimal_macros::dec;

    fn tax_info(percent: Decimal) -> Option<TaxInfo> {
        Some(TaxInfo {
            id: Some("tax-1".to_string()),
            name: Some("VAT".to_string()),
            rate: TaxRate::from_percentage(percent),
        })
    }

    /// A row priced from its original side.
    fn original_item(
        quantity: i64,
        unit: Decimal,
        kind: DiscountType,
        discount: Decimal,
        tax: Decimal,
    ) -> LineItem {
        LineItem {
            product_id: "p-1".to_string(),
            quantity,
            original_rate: Money::new(unit),
            original_discount: discount,
            original_discount_type: kind,
            tax_info: tax_info(tax),
            ..LineItem::default()
        }
    }

    /// A row priced from its form-updated side, original type matching.
    fn overridden_item(
        quantity: i64,
        unit: Decimal,
        kind: DiscountType,
        discount: Decimal,
        tax: Decimal,
    ) -> LineItem {
        LineItem {
            product_id: "p-1".to_string(),
            quantity,
            form_updated_rate: Money::new(unit),
            is_form_updated: true,
            form_updated_discount: discount,
            original_discount_type: kind,
            form_updated_discount_type: kind,
            form_updated_tax: TaxRate::from_percentage(tax),
            ..LineItem::default()
        }
    }

    fn assert_invariants(priced: &LinePricing) {
        assert_eq!(priced.taxable_amount, priced.rate - priced.discount);
        assert_eq!(priced.amount, priced.taxable_amount + priced.tax);
    }

    #[test]
    fn test_missing_item_prices_as_zero() {
        for variant in [
            PricingVariant::Sales,
            PricingVariant::Purchase,
            PricingVariant::PurchaseReturn,
        ] {
            assert_eq!(price_line(variant, None), LinePricing::zero());
        }
    }

    #[test]
    fn test_plain_line_no_discount_no_tax() {
        let item = original_item(2, dec!(50), DiscountType::Fixed, dec!(0), dec!(0));
        let priced = price_line(PricingVariant::Sales, Some(&item));

        assert_eq!(priced.rate.amount(), dec!(100));
        assert!(priced.discount.is_zero());
        assert!(priced.tax.is_zero());
        assert_eq!(priced.taxable_amount.amount(), dec!(100));
        assert_eq!(priced.amount.amount(), dec!(100));
        assert_invariants(&priced);
    }

    #[test]
    fn test_percentage_discount_precedes_tax_on_overridden_sales_row() {
        let item = overridden_item(1, dec!(200), DiscountType::Percentage, dec!(10), dec!(15));
        let priced = price_line(PricingVariant::Sales, Some(&item));

        assert_eq!(priced.discount.amount(), dec!(20));
        assert_eq!(priced.taxable_amount.amount(), dec!(180));
        assert_eq!(priced.tax.amount(), dec!(27));
        assert_eq!(priced.amount.amount(), dec!(207));
        assert_invariants(&priced);
    }

    #[test]
    fn test_percentage_discount_applies_on_both_purchase_branches() {
        let original = original_item(1, dec!(200), DiscountType::Percentage, dec!(10), dec!(15));
        let overridden = overridden_item(1, dec!(200), DiscountType::Percentage, dec!(10), dec!(15));

        for item in [original, overridden] {
            let priced = price_line(PricingVariant::Purchase, Some(&item));
            assert_eq!(priced.discount.amount(), dec!(20));
            assert_eq!(priced.amount.amount(), dec!(207));
        }
    }

    #[test]
    fn test_fixed_discount() {
        let item = original_item(3, dec!(30), DiscountType::Fixed, dec!(15), dec!(5));

        for variant in [PricingVariant::Sales, PricingVariant::Purchase] {
            let priced = price_line(variant, Some(&item));
            assert_eq!(priced.rate.amount(), dec!(90));
            assert_eq!(priced.discount.amount(), dec!(15));
            assert_eq!(priced.taxable_amount.amount(), dec!(75));
            assert_eq!(priced.tax.amount(), dec!(3.75));
            assert_eq!(priced.amount.amount(), dec!(78.75));
            assert_invariants(&priced);
        }
    }

    #[test]
    fn test_sales_original_branch_ignores_percentage_type() {
        // Stored sales discounts are already money.
        let item = original_item(1, dec!(200), DiscountType::Percentage, dec!(10), dec!(0));

        let sales = price_line(PricingVariant::Sales, Some(&item));
        assert_eq!(sales.discount.amount(), dec!(10));
        assert_eq!(sales.discount_type, DiscountType::Percentage);

        let purchase = price_line(PricingVariant::Purchase, Some(&item));
        assert_eq!(purchase.discount.amount(), dec!(20));
    }

    #[test]
    fn test_sales_override_keys_off_original_type() {
        // User switched to a fixed discount, but the original type was %.
        let mut item = overridden_item(1, dec!(200), DiscountType::Percentage, dec!(10), dec!(0));
        item.form_updated_discount_type = DiscountType::Fixed;

        let sales = price_line(PricingVariant::Sales, Some(&item));
        assert_eq!(sales.discount.amount(), dec!(20));
        assert_eq!(sales.discount_type, DiscountType::Fixed);

        let purchase = price_line(PricingVariant::Purchase, Some(&item));
        assert_eq!(purchase.discount.amount(), dec!(10));
    }

    #[test]
    fn test_purchase_return_prices_like_purchase() {
        let item = original_item(4, dec!(12.5), DiscountType::Percentage, dec!(5), dec!(7.25));
        assert_eq!(
            price_line(PricingVariant::PurchaseReturn, Some(&item)),
            price_line(PricingVariant::Purchase, Some(&item)),
        );
    }

    #[test]
    fn test_override_switch_reads_other_side_without_touching_it() {
        let mut item = original_item(2, dec!(10), DiscountType::Fixed, dec!(1), dec!(10));
        item.form_updated_rate = Money::new(dec!(12));
        item.form_updated_discount = dec!(2);
        item.form_updated_tax = TaxRate::from_percentage(dec!(20));
        let before = item.clone();

        let original = price_line(PricingVariant::Sales, Some(&item));
        assert_eq!(original.rate.amount(), dec!(20));
        assert_eq!(original.discount.amount(), dec!(1));
        assert_eq!(original.tax.amount(), dec!(1.9));

        item.is_form_updated = true;
        let overridden = price_line(PricingVariant::Sales, Some(&item));
        assert_eq!(overridden.rate.amount(), dec!(24));
        assert_eq!(overridden.discount.amount(), dec!(2));
        assert_eq!(overridden.tax.amount(), dec!(4.4));

        assert_eq!(item.original_rate, before.original_rate);
        assert_eq!(item.original_discount, before.original_discount);
        assert_eq!(item.tax_info, before.tax_info);
    }

    #[test]
    fn test_untouched_sales_row_ignores_stale_form_updated_rate() {
        let mut item = original_item(3, dec!(10), DiscountType::Fixed, dec!(0), dec!(0));
        item.form_updated_rate = Money::new(dec!(99));

        let priced = price_line(PricingVariant::Sales, Some(&item));
        assert_eq!(priced.unit_rate.amount(), dec!(10));
        assert_eq!(priced.rate.amount(), dec!(30));

        item.is_form_updated = true;
        let priced = price_line(PricingVariant::Sales, Some(&item));
        assert_eq!(priced.unit_rate.amount(), dec!(99));
        assert_eq!(priced.rate.amount(), dec!(297));
    }

    #[test]
    fn test_rate_and_discount_rounded_per_step_tax_is_not() {
        // 3 × 0.335 = 1.005 → 1.01; 12.5% of 1.01 = 0.12625 → 0.13
        let item = overridden_item(3, dec!(0.335), DiscountType::Percentage, dec!(12.5), dec!(7.5));
        let priced = price_line(PricingVariant::Sales, Some(&item));

        assert_eq!(priced.rate.amount(), dec!(1.01));
        assert_eq!(priced.discount.amount(), dec!(0.13));
        assert_eq!(priced.taxable_amount.amount(), dec!(0.88));
        assert_eq!(priced.tax.amount(), dec!(0.066));
        assert_eq!(priced.amount.amount(), dec!(0.946));
        assert_invariants(&priced);
    }

    #[test]
    fn test_out_of_range_percentage_is_not_clamped() {
        let item = overridden_item(1, dec!(100), DiscountType::Percentage, dec!(150), dec!(0));
        let priced = price_line(PricingVariant::Purchase, Some(&item));

        assert_eq!(priced.discount.amount(), dec!(150));
        assert_eq!(priced.taxable_amount.amount(), dec!(-50));
        assert_invariants(&priced);
    }

    #[test]
    fn test_missing_tax_reference_is_zero_tax() {
        let mut item = original_item(1, dec!(10), DiscountType::Fixed, dec!(0), dec!(0));
        item.tax_info = None;
        let priced = price_line(PricingVariant::Sales, Some(&item));

        assert!(priced.tax_rate.is_zero());
        assert!(priced.tax.is_zero());
    }

    #[test]
    fn test_priced_line_item_serializes_flat() {
        let item = original_item(3, dec!(30), DiscountType::Fixed, dec!(15), dec!(5));
        let priced = PricedLineItem::new(PricingVariant::Sales, item);
        let json = serde_json::to_value(&priced).unwrap();

        assert_eq!(json["productId"], "p-1");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["rate"], 90.0);
        assert_eq!(json["taxableAmount"], 75.0);
        assert_eq!(json["amount"], 78.75);
        assert_eq!(json["discountType"], 3);
    }
}
