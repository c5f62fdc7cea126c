//! Material and label records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A catalog entry: what the kitchen knows about one material code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialRecord {
    /// Material code, matched exactly on lookup.
    pub code: String,
    /// Free-text description printed on the label.
    pub description: String,
    /// Shelf life in days before any soup rule is applied. Always >= 1.
    #[serde(rename = "shelf_life_days")]
    pub base_shelf_life_days: u32,
    /// Catalog category (e.g. `"Sopa"`, `"Alimento Normal"`).
    pub category: String,
    /// Marks a special soup eligible for the extended shelf life.
    #[serde(default)]
    pub special: bool,
}

impl MaterialRecord {
    /// Build a record, checking the material invariants.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        base_shelf_life_days: u32,
        category: impl Into<String>,
        special: bool,
    ) -> Result<Self, CatalogError> {
        let record = Self {
            code: code.into(),
            description: description.into(),
            base_shelf_life_days,
            category: category.into(),
            special,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check that code and description are present and shelf life is positive.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidRecord {
            code: self.code.clone(),
            reason: reason.into(),
        };
        if self.code.trim().is_empty() {
            return Err(invalid("code must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description must not be empty"));
        }
        if self.base_shelf_life_days == 0 {
            return Err(invalid("shelf_life_days must be >= 1"));
        }
        Ok(())
    }
}

/// Which label template a material is printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Ordinary item.
    Normal,
    /// Soup-type item: batch code and care instructions on the label.
    Soup,
}

impl LabelKind {
    /// Lowercase name, as shown to operators.
    pub fn as_str(self) -> &'static str {
        match self {
            LabelKind::Normal => "normal",
            LabelKind::Soup => "soup",
        }
    }
}

/// Everything needed to print one label. Built fresh for each request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedLabel {
    /// Material code.
    pub code: String,
    /// Material description.
    pub description: String,
    /// Template selector.
    pub kind: LabelKind,
    /// Effective shelf life after the soup rules.
    pub shelf_life_days: u32,
    /// Date the item expires.
    pub expiry_date: NaiveDate,
    /// Boiler/shift/lot composite. Soup labels only; supplied by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,
    /// Care instructions carried by soup labels. Empty for normal labels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub care_instructions: Vec<String>,
}

impl ResolvedLabel {
    /// Attach the caller-supplied batch code.
    pub fn with_batch_code(mut self, batch_code: impl Into<String>) -> Self {
        self.batch_code = Some(batch_code.into());
        self
    }

    /// Expiry date as printed on labels (`dd/mm/yyyy`).
    pub fn expiry_text(&self) -> String {
        self.expiry_date.format(crate::DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_shelf_life() {
        let err = MaterialRecord::new("X1", "Arroz", 0, "Alimento Normal", false).unwrap_err();
        assert!(err.to_string().contains("shelf_life_days"));
    }

    #[test]
    fn new_rejects_blank_code() {
        assert!(MaterialRecord::new("  ", "Arroz", 3, "Alimento Normal", false).is_err());
    }

    #[test]
    fn record_json_uses_catalog_field_names() {
        let json = r#"{"code":"SOP001","description":"Sopa de Legumes","shelf_life_days":30,"category":"Sopa"}"#;
        let record: MaterialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.base_shelf_life_days, 30);
        assert!(!record.special);
    }

    #[test]
    fn expiry_text_is_day_month_year() {
        let label = ResolvedLabel {
            code: "A".into(),
            description: "B".into(),
            kind: LabelKind::Normal,
            shelf_life_days: 1,
            expiry_date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            batch_code: None,
            care_instructions: Vec::new(),
        };
        assert_eq!(label.expiry_text(), "07/03/2025");
    }
}
