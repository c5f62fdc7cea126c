//! Validity resolver: turns a catalog lookup into an expiry decision.
//!
//! Classification and the shelf-life rules are pure functions of the catalog
//! fields; only [`Resolver::resolve`] touches the catalog and the clock.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::error::CatalogError;
use crate::markup::CARE_INSTRUCTIONS;
use crate::model::{LabelKind, MaterialRecord, ResolvedLabel};

/// Substring that marks a soup category.
pub const SOUP_CATEGORY_KEYWORD: &str = "sopa";

/// Description substrings that mark a soup-type material.
///
/// Matched after lowercasing, accents included: `líquido` does not match
/// `liquido`.
pub const SOUP_DESCRIPTION_KEYWORDS: [&str; 5] = ["sopa", "caldo", "cremoso", "líquido", "potage"];

/// Baseline shelf life that special soups extend.
pub const SPECIAL_SOUP_BASELINE_DAYS: u32 = 30;

/// Shelf life granted to special soups at the baseline.
pub const SPECIAL_SOUP_SHELF_LIFE_DAYS: u32 = 90;

/// Decide which template a material uses.
pub fn classify(category: &str, description: &str) -> LabelKind {
    if category.to_lowercase().contains(SOUP_CATEGORY_KEYWORD) {
        return LabelKind::Soup;
    }
    let description = description.to_lowercase();
    if SOUP_DESCRIPTION_KEYWORDS
        .iter()
        .any(|keyword| description.contains(keyword))
    {
        LabelKind::Soup
    } else {
        LabelKind::Normal
    }
}

/// Apply the soup rules to a catalog shelf life.
///
/// Only a special soup at exactly the 30-day baseline changes (to 90 days);
/// other baselines are never scaled.
pub fn effective_shelf_life(base_days: u32, kind: LabelKind, special: bool) -> u32 {
    match kind {
        LabelKind::Soup if special && base_days == SPECIAL_SOUP_BASELINE_DAYS => {
            SPECIAL_SOUP_SHELF_LIFE_DAYS
        }
        _ => base_days,
    }
}

/// Build the label record for a catalog entry as of `today`.
pub fn resolve_record(record: &MaterialRecord, today: NaiveDate) -> ResolvedLabel {
    let kind = classify(&record.category, &record.description);
    let shelf_life_days =
        effective_shelf_life(record.base_shelf_life_days, kind, record.special).max(1);
    let expiry_date = today
        .checked_add_days(Days::new(u64::from(shelf_life_days)))
        .unwrap_or(NaiveDate::MAX);
    let care_instructions = match kind {
        LabelKind::Soup => CARE_INSTRUCTIONS
            .iter()
            .map(|line| (*line).to_owned())
            .collect(),
        LabelKind::Normal => Vec::new(),
    };

    ResolvedLabel {
        code: record.code.clone(),
        description: record.description.clone(),
        kind,
        shelf_life_days,
        expiry_date,
        batch_code: None,
        care_instructions,
    }
}

/// Resolves material codes against a catalog using an injected clock.
#[derive(Debug, Clone)]
pub struct Resolver<C, K> {
    catalog: C,
    clock: K,
}

impl<C: Catalog, K: Clock> Resolver<C, K> {
    /// Create a resolver over `catalog`, dating expiries with `clock`.
    pub fn new(catalog: C, clock: K) -> Self {
        Self { catalog, clock }
    }

    /// Look up `code` and compute its label record.
    ///
    /// Returns `Ok(None)` when the catalog has no such material; that is a
    /// normal outcome, not a failure.
    pub fn resolve(&self, code: &str) -> Result<Option<ResolvedLabel>, CatalogError> {
        let Some(record) = self.catalog.lookup(code)? else {
            debug!(code, "material not found");
            return Ok(None);
        };
        let label = resolve_record(&record, self.clock.today());
        debug!(
            code,
            kind = label.kind.as_str(),
            days = label.shelf_life_days,
            expiry = %label.expiry_date,
            "material resolved"
        );
        Ok(Some(label))
    }
}
