//! # Domain Types
//!
//! Record shapes shared by the pricing engine and the form layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CatalogProduct  │──►│    LineItem     │──►│ PricingVariant  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sale_price     │   │  original_*     │   │  Sales          │       │
//! │  │  purchase_price │   │  form_updated_* │   │  Purchase       │       │
//! │  │  tax_info       │   │  is_form_updated│   │  PurchaseReturn │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                       ▲                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────┴────────┐       │
//! │  │    TaxRate      │   │  DiscountType   │   │  DocumentKind   │       │
//! │  │  percent (dec)  │   │  2 = Percentage │   │  Invoice, ...   │       │
//! │  │  15 = 15%       │   │  3 = Fixed      │   │  DebitNote      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Original vs. Form-Updated Values
//! Every priced field exists twice on a [`LineItem`]: the catalog-derived
//! `original_*` value and the user-edited `form_updated_*` value. The
//! `is_form_updated` flag selects which side the engine reads; neither side
//! is ever overwritten by pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use ts_rs::TS;

use crate::lenient;
use crate::money::Money;
use crate::pricing::resolve_discount;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as a percentage (`15` = 15%).
///
/// ## Why a Decimal Percentage?
/// Tax references from the backend carry rates like `7.25` or `12.5`;
/// keeping the percentage exact means `tax = rate / 100 × taxable` needs
/// no intermediate rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "number")] Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percentage(percent: Decimal) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percentage(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Tax owed on `taxable`, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::{Money, TaxRate};
    /// use rust_decimal::Decimal;
    ///
    /// let rate = TaxRate::from_percentage(Decimal::new(5, 0));
    /// let tax = rate.tax_on(Money::new(Decimal::new(75, 0)));
    /// assert_eq!(tax.amount(), Decimal::new(375, 2));
    /// ```
    pub fn tax_on(&self, taxable: Money) -> Money {
        taxable.percentage(self.0)
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        lenient::decimal::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::decimal::deserialize(deserializer).map(TaxRate)
    }
}

/// A tax-info reference attached to a product (e.g. "VAT 15%").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxInfo {
    /// Backend identifier of the tax reference.
    pub id: Option<String>,
    /// Display name, e.g. "VAT".
    pub name: Option<String>,
    /// Rate as a percentage.
    pub rate: TaxRate,
}

// =============================================================================
// Discount Type
// =============================================================================

/// How a discount magnitude is interpreted.
///
/// ## Wire Format
/// The backend encodes this as a number: `2` means percentage, every other
/// value (canonically `3`) means a fixed amount. Numeric strings are
/// accepted on input; output is always the canonical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiscountType {
    /// Discount is a percentage of the line rate.
    Percentage,
    /// Discount is a fixed monetary amount.
    #[default]
    Fixed,
}

impl DiscountType {
    /// Wire code for percentage discounts.
    pub const PERCENTAGE_CODE: i64 = 2;
    /// Canonical wire code for fixed discounts.
    pub const FIXED_CODE: i64 = 3;

    /// Maps a wire code to a discount type.
    pub fn from_code(code: i64) -> Self {
        if code == Self::PERCENTAGE_CODE {
            DiscountType::Percentage
        } else {
            DiscountType::Fixed
        }
    }

    /// Returns the canonical wire code.
    pub fn code(&self) -> i64 {
        match self {
            DiscountType::Percentage => Self::PERCENTAGE_CODE,
            DiscountType::Fixed => Self::FIXED_CODE,
        }
    }

    #[inline]
    pub fn is_percentage(&self) -> bool {
        matches!(self, DiscountType::Percentage)
    }
}

impl Serialize for DiscountType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for DiscountType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(DiscountType::from_code(lenient::to_integer(&value)))
    }
}

// =============================================================================
// Document Kind / Pricing Variant
// =============================================================================

/// The business document a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Invoice,
    Quotation,
    DeliveryChallan,
    PurchaseOrder,
    PurchaseBill,
    /// Purchase return issued to a vendor.
    DebitNote,
}

impl DocumentKind {
    /// The pricing rule this document's lines follow.
    pub fn pricing_variant(&self) -> PricingVariant {
        match self {
            DocumentKind::Invoice | DocumentKind::Quotation | DocumentKind::DeliveryChallan => {
                PricingVariant::Sales
            }
            DocumentKind::PurchaseOrder | DocumentKind::PurchaseBill => PricingVariant::Purchase,
            DocumentKind::DebitNote => PricingVariant::PurchaseReturn,
        }
    }
}

/// Per-domain pricing rule, see [`crate::pricing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingVariant {
    /// Invoices, quotations, delivery challans.
    #[default]
    Sales,
    /// Purchase orders and bills.
    Purchase,
    /// Debit notes (purchase returns).
    PurchaseReturn,
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A product as returned by the backend catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub sale_price: Money,
    pub purchase_price: Money,
    /// Default discount magnitude.
    #[serde(with = "lenient::decimal")]
    #[ts(type = "number")]
    pub discount: Decimal,
    #[ts(type = "number")]
    pub discount_type: DiscountType,
    pub tax_info: Option<TaxInfo>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One row on a document, as held in form state.
///
/// Deserialization is lenient (see [`crate::lenient`]): any missing field
/// takes its zero value, and the flag accepts `"true"`/`"false"` strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    /// Opaque catalog reference.
    #[serde(with = "lenient::text")]
    #[ts(type = "string")]
    pub product_id: String,

    #[serde(with = "lenient::integer")]
    #[ts(type = "number")]
    pub quantity: i64,

    /// Catalog unit price. Purchase documents send it as `purchasePrice`.
    #[serde(alias = "purchasePrice")]
    pub original_rate: Money,

    /// User-edited unit price.
    pub form_updated_rate: Money,

    /// Selects form-updated values over original ones.
    #[serde(with = "lenient::flag")]
    #[ts(type = "boolean")]
    pub is_form_updated: bool,

    #[serde(with = "lenient::decimal")]
    #[ts(type = "number")]
    pub original_discount: Decimal,

    #[serde(with = "lenient::decimal")]
    #[ts(type = "number")]
    pub form_updated_discount: Decimal,

    #[ts(type = "number")]
    pub original_discount_type: DiscountType,

    #[ts(type = "number")]
    pub form_updated_discount_type: DiscountType,

    /// Tax reference used when the row is not form-updated.
    pub tax_info: Option<TaxInfo>,

    /// Tax percentage used when the row is form-updated.
    pub form_updated_tax: TaxRate,
}

impl LineItem {
    /// Creates a row from a catalog product.
    ///
    /// Sales rows take the sale price, purchase rows the purchase price.
    /// Both sides are seeded so that flipping `is_form_updated` on an
    /// untouched row prices the same. For sales rows that means a
    /// percentage discount is stored on the original side already
    /// resolved to money (see [`LineItem::resolve_sales_discount`]), while
    /// the form-updated side keeps the percentage.
    pub fn from_catalog(product: &CatalogProduct, variant: PricingVariant, quantity: i64) -> Self {
        let unit_price = match variant {
            PricingVariant::Sales => product.sale_price,
            PricingVariant::Purchase | PricingVariant::PurchaseReturn => product.purchase_price,
        };
        let tax_rate = product
            .tax_info
            .as_ref()
            .map(|info| info.rate)
            .unwrap_or_default();

        let mut item = LineItem {
            product_id: product.id.clone(),
            quantity,
            original_rate: unit_price,
            form_updated_rate: unit_price,
            is_form_updated: false,
            original_discount: product.discount,
            form_updated_discount: product.discount,
            original_discount_type: product.discount_type,
            form_updated_discount_type: product.discount_type,
            tax_info: product.tax_info.clone(),
            form_updated_tax: tax_rate,
        };
        if variant == PricingVariant::Sales {
            item.resolve_sales_discount();
        }
        item
    }

    /// Stores a sales row's percentage discount on the original side as
    /// money, resolved against the current original line rate.
    ///
    /// Sales pricing reads `original_discount` as an amount, so it must be
    /// re-resolved whenever the quantity changes. The percentage is taken
    /// from `form_updated_discount`; rows whose percentage is not known
    /// there (fixed discounts, or a zero percentage next to a non-zero
    /// amount) are left as they are.
    pub fn resolve_sales_discount(&mut self) {
        let percent_known = self.original_discount_type.is_percentage()
            && self.form_updated_discount_type.is_percentage()
            && !(self.form_updated_discount.is_zero() && !self.original_discount.is_zero());
        if !percent_known {
            return;
        }

        let rate = self
            .original_rate
            .multiply_quantity(self.quantity)
            .round_cents();
        self.original_discount =
            resolve_discount(rate, DiscountType::Percentage, self.form_updated_discount).amount();
    }

    /// The rate of the attached tax reference, zero when there is none.
    pub fn reference_tax_rate(&self) -> TaxRate {
        self.tax_info
            .as_ref()
            .map(|info| info.rate)
            .unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
