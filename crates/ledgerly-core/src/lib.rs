//! # ledgerly-core: Pure Pricing Logic for Ledgerly
//!
//! This crate prices document line items (invoices, delivery challans,
//! purchase orders, debit notes) and folds them into document totals. It is
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledgerly Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend forms                               │   │
//! │  │    Add product ──► Edit row ──► Toggle round-off ──► Submit    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ledgerly-forms (form state)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ ledgerly-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │ pricing  │ │ totals           │  │   │
//! │  │   │ LineItem │ │  Money   │ │price_line│ │ DocumentTotals   │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HIDDEN STATE • NO CACHING • NEVER PANICS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, TaxRate, DiscountType, ...)
//! - [`money`] - Decimal money with the two rounding rules pricing uses
//! - [`pricing`] - The line-item pricing engine
//! - [`totals`] - Document totals aggregation and round-off
//! - [`lenient`] - Coercion of loosely typed form state
//! - [`validation`] - Edit validation (run by callers, never by pricing)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ledgerly_core::{DocumentTotals, LineItem, PricingVariant};
//! use rust_decimal::Decimal;
//!
//! let items: Vec<LineItem> = serde_json::from_str(r#"[
//!     { "productId": "p-1", "quantity": 3, "originalRate": 30,
//!       "originalDiscount": 15, "originalDiscountType": 3,
//!       "taxInfo": { "rate": 5 } }
//! ]"#).unwrap();
//!
//! let totals = DocumentTotals::from_items(PricingVariant::Sales, &items, false);
//! assert_eq!(totals.total.amount(), Decimal::new(7875, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lenient;
pub mod money;
pub mod pricing;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{price_line, LinePricing, PricedLineItem};
pub use totals::DocumentTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single document.
pub const MAX_DOCUMENT_ITEMS: usize = 250;

/// Maximum quantity on a single line.
///
/// Guards against a mistyped quantity (an extra few zeros) silently
/// producing an enormous document.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;
