//! Food-storage label engine.
//!
//! Two stages run per print or preview request:
//!
//! 1. [`Resolver::resolve`] looks a material code up in a [`Catalog`],
//!    classifies it as a normal item or a soup, and dates its expiry.
//! 2. [`generate`] turns the resulting [`ResolvedLabel`] and a
//!    [`LayoutConfig`] into ZPL markup ready for a printer transport.
//!
//! Both stages are synchronous and hold no shared state. The current time is
//! injected through [`Clock`] so output can be reproduced exactly.

#![warn(missing_docs)]

/// Soup batch codes.
pub mod batch;
/// Material catalog lookup seam.
pub mod catalog;
/// Time sources.
pub mod clock;
/// Error types.
pub mod error;
/// Hex escaping of field data.
pub mod field_data;
/// Layout parameters and label geometry.
pub mod layout;
/// ZPL markup generation.
pub mod markup;
/// Material and label records.
pub mod model;
/// Printable-ASCII sanitization.
pub mod sanitize;
/// Material classification and shelf-life rules.
pub mod validity;
/// Greedy word wrap.
pub mod wrap;

/// Format of dates printed on labels.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ── Convenience re-exports ──────────────────────────────────────────────────

pub use batch::{BatchCode, Shift};
pub use catalog::{Catalog, InMemoryCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CatalogError, LabelError};
pub use layout::LayoutConfig;
pub use markup::{CARE_INSTRUCTIONS, MarkupGenerator, generate, test_label};
pub use model::{LabelKind, MaterialRecord, ResolvedLabel};
pub use sanitize::sanitize;
pub use validity::{Resolver, classify, effective_shelf_life, resolve_record};
pub use wrap::{DESCRIPTION_COLUMNS, wrap_words};
