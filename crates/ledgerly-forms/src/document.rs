//! # Document Form State
//!
//! The editable state behind one invoice / challan / purchase / debit-note
//! screen: its rows and the round-off flag. Every read of prices or totals
//! recomputes them from the rows; nothing derived is stored.
//!
//! ## Form Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Document Form Operations                             │
//! │                                                                         │
//! │  Frontend Action          Form Method             State Change          │
//! │  ───────────────          ───────────             ────────────          │
//! │                                                                         │
//! │  Pick Product ───────────► add_product() ───────► items.push(row)      │
//! │                                                                         │
//! │  Edit qty/rate/discount ─► apply_edit() ────────► row.form_updated_*    │
//! │                                                   is_form_updated=true  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► items.remove(i)      │
//! │                                                                         │
//! │  Toggle Round-off ───────► set_round_off() ─────► round_off = b        │
//! │                                                                         │
//! │  Render ─────────────────► priced_lines() ──────► (read only,          │
//! │                            totals()               recomputed)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use ledgerly_core::validation::{
    validate_discount, validate_item_count, validate_product_id, validate_quantity, validate_rate,
    validate_tax_percentage,
};
use ledgerly_core::{
    lenient, CatalogProduct, CoreError, DiscountType, DocumentKind, DocumentTotals, LineItem,
    Money, PricedLineItem, PricingVariant, TaxInfo, TaxRate, MAX_DOCUMENT_ITEMS,
};

use crate::config::FormsConfig;
use crate::error::FormResult;

/// A single user edit to one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LineEdit {
    Quantity(i64),
    Rate(Decimal),
    Discount(Decimal),
    DiscountType(DiscountType),
    Tax(Decimal),
}

/// What gets sent to the backend when the document is saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub draft_id: Uuid,
    pub kind: DocumentKind,
    pub items: Vec<PricedLineItem>,
    pub round_off: bool,
    #[serde(flatten)]
    pub totals: DocumentTotals,
}

/// Editable document state.
///
/// ## Invariants
/// - At most `MAX_DOCUMENT_ITEMS` rows
/// - Rows added or edited through this type pass validation; rows loaded
///   from saved form state are priced as they are
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentForm {
    draft_id: Uuid,
    kind: DocumentKind,
    #[serde(deserialize_with = "lenient::list")]
    items: Vec<LineItem>,
    #[serde(with = "lenient::flag")]
    round_off: bool,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    default_tax_rate: TaxRate,
}

impl DocumentForm {
    /// Creates an empty document.
    pub fn new(kind: DocumentKind, config: &FormsConfig) -> Self {
        DocumentForm {
            draft_id: Uuid::new_v4(),
            kind,
            items: Vec::new(),
            round_off: config.round_off_by_default,
            created_at: Utc::now(),
            default_tax_rate: config.default_tax_rate,
        }
    }

    /// Re-attaches session configuration to a form loaded from saved
    /// state, which does not carry it. The saved round-off flag is kept.
    pub fn with_config(mut self, config: &FormsConfig) -> Self {
        self.default_tax_rate = config.default_tax_rate;
        self
    }

    pub fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn variant(&self) -> PricingVariant {
        self.kind.pricing_variant()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn round_off(&self) -> bool {
        self.round_off
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a catalog product as a new row and returns its index.
    ///
    /// Products without a tax reference get the configured default tax.
    pub fn add_product(&mut self, product: &CatalogProduct, quantity: i64) -> FormResult<usize> {
        let mut item = LineItem::from_catalog(product, self.variant(), quantity);
        if item.tax_info.is_none() && !self.default_tax_rate.is_zero() {
            item.tax_info = Some(TaxInfo {
                id: None,
                name: None,
                rate: self.default_tax_rate,
            });
            item.form_updated_tax = self.default_tax_rate;
        }
        self.add_item(item)
    }

    /// Adds a prepared row and returns its index.
    pub fn add_item(&mut self, item: LineItem) -> FormResult<usize> {
        validate_item_count(self.items.len()).map_err(|_| CoreError::TooManyItems {
            max: MAX_DOCUMENT_ITEMS,
        })?;
        validate_product_id(&item.product_id).map_err(CoreError::from)?;
        validate_quantity(item.quantity).map_err(CoreError::from)?;

        debug!(product_id = %item.product_id, quantity = item.quantity, "Adding line item");
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Applies one edit to row `index`.
    ///
    /// The first edit to a row seeds every form-updated field from the
    /// original side, so fields the user did not touch keep their values
    /// once the row switches to form-updated pricing. Quantity is not an
    /// overridable field and leaves the flag alone.
    pub fn apply_edit(&mut self, index: usize, edit: LineEdit) -> FormResult<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CoreError::ItemNotFound { index, len })?;

        let variant = self.kind.pricing_variant();
        match edit {
            LineEdit::Quantity(qty) => {
                validate_quantity(qty).map_err(CoreError::from)?;
                item.quantity = qty;
                if variant == PricingVariant::Sales && !item.is_form_updated {
                    item.resolve_sales_discount();
                }
            }
            LineEdit::Rate(rate) => {
                validate_rate(rate).map_err(CoreError::from)?;
                mark_form_updated(item, variant);
                item.form_updated_rate = Money::new(rate);
            }
            LineEdit::Discount(discount) => {
                validate_discount(seeded_discount_type(item, variant), discount)
                    .map_err(CoreError::from)?;
                mark_form_updated(item, variant);
                item.form_updated_discount = discount;
            }
            LineEdit::DiscountType(kind) => {
                mark_form_updated(item, variant);
                item.form_updated_discount_type = kind;
            }
            LineEdit::Tax(percent) => {
                validate_tax_percentage(percent).map_err(CoreError::from)?;
                mark_form_updated(item, variant);
                item.form_updated_tax = TaxRate::from_percentage(percent);
            }
        }

        debug!(index, ?edit, "Applied line edit");
        Ok(())
    }

    /// Removes row `index` and returns it.
    pub fn remove_item(&mut self, index: usize) -> FormResult<LineItem> {
        let len = self.items.len();
        if index >= len {
            return Err(CoreError::ItemNotFound { index, len }.into());
        }
        debug!(index, "Removing line item");
        Ok(self.items.remove(index))
    }

    pub fn set_round_off(&mut self, round_off: bool) {
        self.round_off = round_off;
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Rows with their priced fields.
    pub fn priced_lines(&self) -> Vec<PricedLineItem> {
        let variant = self.variant();
        self.items
            .iter()
            .cloned()
            .map(|item| PricedLineItem::new(variant, item))
            .collect()
    }

    /// Document totals, recomputed from the rows.
    pub fn totals(&self) -> DocumentTotals {
        DocumentTotals::from_items(self.variant(), &self.items, self.round_off)
    }

    /// The save payload for the backend.
    pub fn payload(&self) -> DocumentPayload {
        let items = self.priced_lines();
        let totals = DocumentTotals::from_pricings(
            items.iter().map(|line| line.pricing),
            self.round_off,
        );

        DocumentPayload {
            draft_id: self.draft_id,
            kind: self.kind,
            items,
            round_off: self.round_off,
            totals,
        }
    }
}

/// Switches a row to form-updated pricing, seeding on the first switch.
///
/// A sales row with a percentage discount holds money on the original
/// side and the percentage on the form-updated side; the percentage is
/// kept, or implied from the money amount when the row never had one.
fn mark_form_updated(item: &mut LineItem, variant: PricingVariant) {
    if item.is_form_updated {
        return;
    }
    item.form_updated_rate = item.original_rate;
    item.form_updated_tax = item.reference_tax_rate();

    let sales_percentage =
        variant == PricingVariant::Sales && item.original_discount_type.is_percentage();
    if !sales_percentage {
        item.form_updated_discount = item.original_discount;
    } else if !item.form_updated_discount_type.is_percentage() || item.form_updated_discount.is_zero()
    {
        item.form_updated_discount = implied_percentage(item);
    }
    item.form_updated_discount_type = item.original_discount_type;
    item.is_form_updated = true;
}

/// The percentage of the original line rate that the original discount
/// amount represents.
fn implied_percentage(item: &LineItem) -> Decimal {
    let rate = item
        .original_rate
        .multiply_quantity(item.quantity)
        .round_cents()
        .amount();
    item.original_discount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(rate))
        .unwrap_or_default()
}

/// Discount type that decides how a discount edit is interpreted.
///
/// Sales rows always resolve form-updated discounts by the original type.
fn seeded_discount_type(item: &LineItem, variant: PricingVariant) -> DiscountType {
    if variant == PricingVariant::Sales || !item.is_form_updated {
        item.original_discount_type
    } else {
        item.form_updated_discount_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;

    fn product(id: &str, price: Decimal, tax: Option<Decimal>) -> CatalogProduct {
        CatalogProduct {
            id: id.to_string(),
            name: format!("Product {}", id),
            sale_price: Money::new(price),
            purchase_price: Money::new(price - dec!(1)),
            discount: dec!(0),
            discount_type: DiscountType::Fixed,
            tax_info: tax.map(|rate| TaxInfo {
                id: Some("vat".to_string()),
                name: Some("VAT".to_string()),
                rate: TaxRate::from_percentage(rate),
            }),
        }
    }

    fn discounted(id: &str, price: Decimal, percent: Decimal) -> CatalogProduct {
        CatalogProduct {
            discount: percent,
            discount_type: DiscountType::Percentage,
            ..product(id, price, None)
        }
    }

    fn invoice() -> DocumentForm {
        DocumentForm::new(DocumentKind::Invoice, &FormsConfig::default())
    }

    #[test]
    fn test_add_product_prices_line() {
        let mut form = invoice();
        form.add_product(&product("1", dec!(50), None), 2).unwrap();

        let lines = form.priced_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].pricing.rate.amount(), dec!(100));
        assert_eq!(form.totals().total.amount(), dec!(100));
    }

    #[test]
    fn test_purchase_document_uses_purchase_price() {
        let mut form = DocumentForm::new(DocumentKind::PurchaseOrder, &FormsConfig::default());
        form.add_product(&product("1", dec!(50), None), 1).unwrap();

        assert_eq!(form.totals().taxable_amount.amount(), dec!(49));
    }

    #[test]
    fn test_default_tax_applies_to_untaxed_products() {
        let config = FormsConfig {
            default_tax_rate: TaxRate::from_percentage(dec!(10)),
            ..FormsConfig::default()
        };
        let mut form = DocumentForm::new(DocumentKind::Invoice, &config);
        form.add_product(&product("1", dec!(20), None), 1).unwrap();
        form.add_product(&product("2", dec!(20), Some(dec!(5))), 1).unwrap();

        assert_eq!(form.totals().vat.amount(), dec!(3));
    }

    #[test]
    fn test_first_edit_seeds_override_fields() {
        let mut form = invoice();
        form.add_product(&product("1", dec!(10), Some(dec!(15))), 2).unwrap();

        form.apply_edit(0, LineEdit::Rate(dec!(12))).unwrap();

        let item = &form.items()[0];
        assert!(item.is_form_updated);
        assert_eq!(item.original_rate.amount(), dec!(10));
        assert_eq!(item.form_updated_tax.percentage(), dec!(15));

        let line = &form.priced_lines()[0].pricing;
        assert_eq!(line.rate.amount(), dec!(24));
        assert_eq!(line.tax.amount(), dec!(3.6));
    }

    #[test]
    fn test_quantity_edit_keeps_original_pricing() {
        let mut form = invoice();
        form.add_product(&product("1", dec!(10), None), 1).unwrap();

        form.apply_edit(0, LineEdit::Quantity(5)).unwrap();

        assert!(!form.items()[0].is_form_updated);
        assert_eq!(form.totals().total.amount(), dec!(50));
    }

    #[test]
    fn test_invalid_edits_are_rejected_and_leave_row_untouched() {
        let mut form = invoice();
        form.add_product(&discounted("1", dec!(10), dec!(5)), 1).unwrap();
        let before = form.items()[0].clone();

        let err = form.apply_edit(0, LineEdit::Discount(dec!(120))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(form.apply_edit(0, LineEdit::Quantity(0)).is_err());
        assert!(form.apply_edit(0, LineEdit::Rate(dec!(-1))).is_err());
        assert!(form.apply_edit(0, LineEdit::Tax(dec!(101))).is_err());

        assert_eq!(form.items()[0], before);
    }

    #[test]
    fn test_unknown_index() {
        let mut form = invoice();
        let err = form.apply_edit(3, LineEdit::Quantity(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(form.remove_item(0).is_err());
    }

    #[test]
    fn test_remove_and_round_off_recompute_totals() {
        let mut form = invoice();
        form.add_product(&product("1", dec!(10.20), None), 1).unwrap();
        form.add_product(&product("2", dec!(5.15), None), 1).unwrap();
        assert_eq!(form.totals().total.amount(), dec!(15.35));

        form.set_round_off(true);
        let totals = form.totals();
        assert_eq!(totals.total.amount(), dec!(15));
        assert_eq!(totals.round_off_value.amount(), dec!(-0.35));

        form.remove_item(1).unwrap();
        assert_eq!(form.totals().total.amount(), dec!(10));

        form.clear();
        assert_eq!(form.totals(), DocumentTotals::zero());
    }

    #[test]
    fn test_item_limit() {
        let mut form = invoice();
        let p = product("1", dec!(1), None);
        for _ in 0..MAX_DOCUMENT_ITEMS {
            form.add_product(&p, 1).unwrap();
        }

        let err = form.add_product(&p, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentError);
    }

    #[test]
    fn test_payload_totals_match_form_totals() {
        let mut form = invoice();
        form.add_product(&product("1", dec!(19.99), Some(dec!(8.25))), 3).unwrap();
        form.set_round_off(true);

        let payload = form.payload();
        assert_eq!(payload.totals, form.totals());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "invoice");
        assert_eq!(json["roundOff"], true);
        assert!(json["total"].is_number());
        assert_eq!(json["items"][0]["productId"], "1");
    }

    #[test]
    fn test_sales_percentage_discount_survives_unchanged_rate_edit() {
        let mut form = invoice();
        form.add_product(&discounted("1", dec!(30), dec!(10)), 1).unwrap();
        let untouched = form.priced_lines()[0].pricing;
        assert_eq!(untouched.discount.amount(), dec!(3));

        form.apply_edit(0, LineEdit::Rate(dec!(30))).unwrap();

        let edited = form.priced_lines()[0].pricing;
        assert!(form.items()[0].is_form_updated);
        assert_eq!(edited.discount, untouched.discount);
        assert_eq!(edited.amount, untouched.amount);
    }

    #[test]
    fn test_first_edit_keeps_pricing_for_every_variant() {
        for kind in [
            DocumentKind::Invoice,
            DocumentKind::PurchaseOrder,
            DocumentKind::DebitNote,
        ] {
            let mut form = DocumentForm::new(kind, &FormsConfig::default());
            let p = CatalogProduct {
                tax_info: Some(TaxInfo {
                    id: None,
                    name: Some("VAT".to_string()),
                    rate: TaxRate::from_percentage(dec!(5)),
                }),
                ..discounted("1", dec!(19.99), dec!(12.5))
            };
            form.add_product(&p, 7).unwrap();
            let untouched = form.priced_lines()[0].pricing;
            assert!(!untouched.discount.is_zero(), "{:?}", kind);

            let unit = form.items()[0].original_rate.amount();
            form.apply_edit(0, LineEdit::Rate(unit)).unwrap();

            let edited = form.priced_lines()[0].pricing;
            assert_eq!(edited.discount, untouched.discount, "{:?}", kind);
            assert_eq!(edited.tax, untouched.tax, "{:?}", kind);
            assert_eq!(edited.amount, untouched.amount, "{:?}", kind);
        }
    }

    #[test]
    fn test_sales_quantity_edit_re_resolves_percentage_discount() {
        let mut form = invoice();
        form.add_product(&discounted("1", dec!(30), dec!(10)), 1).unwrap();

        form.apply_edit(0, LineEdit::Quantity(2)).unwrap();
        assert!(!form.items()[0].is_form_updated);
        assert_eq!(form.priced_lines()[0].pricing.discount.amount(), dec!(6));

        form.apply_edit(0, LineEdit::Tax(dec!(0))).unwrap();
        assert_eq!(form.priced_lines()[0].pricing.discount.amount(), dec!(6));
    }

    #[test]
    fn test_first_edit_implies_percentage_for_loaded_sales_rows() {
        let mut form = invoice();
        form.add_item(LineItem {
            product_id: "loaded".to_string(),
            quantity: 2,
            original_rate: Money::new(dec!(40)),
            original_discount: dec!(8),
            original_discount_type: DiscountType::Percentage,
            ..LineItem::default()
        })
        .unwrap();
        assert_eq!(form.priced_lines()[0].pricing.discount.amount(), dec!(8));

        form.apply_edit(0, LineEdit::Rate(dec!(40))).unwrap();

        assert_eq!(form.items()[0].form_updated_discount, dec!(10));
        assert_eq!(form.priced_lines()[0].pricing.discount.amount(), dec!(8));
    }

    #[test]
    fn test_loaded_form_reattaches_default_tax() {
        let config = FormsConfig {
            default_tax_rate: TaxRate::from_percentage(dec!(10)),
            ..FormsConfig::default()
        };
        let mut form = DocumentForm::new(DocumentKind::Invoice, &config);
        form.add_product(&product("1", dec!(20), None), 1).unwrap();
        let saved = serde_json::to_string(&form).unwrap();

        let bare: DocumentForm = serde_json::from_str(&saved).unwrap();
        let mut restored = bare.clone().with_config(&config);
        let mut plain = bare;
        restored.add_product(&product("2", dec!(20), None), 1).unwrap();
        plain.add_product(&product("2", dec!(20), None), 1).unwrap();

        assert_eq!(restored.totals().vat.amount(), dec!(4));
        assert_eq!(plain.totals().vat.amount(), dec!(2));
        assert_eq!(restored.draft_id(), form.draft_id());
    }

    #[test]
    fn test_line_edit_wire_format() {
        let edit: LineEdit =
            serde_json::from_value(serde_json::json!({ "field": "discountType", "value": 2 }))
                .unwrap();
        assert_eq!(edit, LineEdit::DiscountType(DiscountType::Percentage));
    }
}
