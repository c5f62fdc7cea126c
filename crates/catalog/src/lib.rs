//! Material catalog backed by a JSON file.
//!
//! The file holds a single object with a `materials` array:
//!
//! ```json
//! {
//!   "materials": [
//!     { "code": "SOP001", "description": "Sopa de Legumes",
//!       "shelf_life_days": 30, "category": "Sopa", "special": true }
//!   ]
//! }
//! ```
//!
//! Records are validated on load and on [`JsonCatalog::add`], so a catalog
//! in memory always satisfies the material invariants. Edits are written
//! back with [`JsonCatalog::save`].

use std::fs;
use std::path::{Path, PathBuf};

use food_label_core::{Catalog, CatalogError, InMemoryCatalog, MaterialRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Longest shelf life a catalog entry may declare, in days.
pub const MAX_SHELF_LIFE_DAYS: u32 = 365;

/// Errors that can occur when loading, editing or saving a catalog.
#[derive(Debug, Error)]
pub enum CatalogFileError {
    /// The file could not be read or written.
    #[error("cannot access catalog {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("invalid catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A record field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Path of the offending field, e.g. `materials[2].shelf_life_days`.
        field: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A material passed to [`JsonCatalog::add`] is invalid.
    #[error("invalid material {code:?}: {field} {reason}")]
    InvalidMaterial {
        /// Code of the rejected material.
        code: String,
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// Two records share a material code.
    #[error("duplicate material code {0:?}")]
    DuplicateCode(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    materials: Vec<MaterialRecord>,
}

/// A validated catalog loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    records: InMemoryCatalog,
}

impl JsonCatalog {
    /// Read and validate the catalog at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogFileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = load_catalog_from_str(&text)?;
        info!(path = %path.display(), materials = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Like [`JsonCatalog::open`], but a missing file yields an empty catalog.
    pub fn open_or_default(path: impl AsRef<Path>) -> Result<Self, CatalogFileError> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the catalog to `path`, ordered by code.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogFileError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| CatalogFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), materials = self.len(), "catalog saved");
        Ok(())
    }

    /// Register a new material. Existing codes are rejected, never replaced.
    pub fn add(&mut self, record: MaterialRecord) -> Result<(), CatalogFileError> {
        if let Err((field, reason)) = check_record(&record) {
            return Err(CatalogFileError::InvalidMaterial {
                code: record.code,
                field,
                reason,
            });
        }
        self.insert_new(record)
    }

    /// Remove a material, returning it if the code was present.
    pub fn remove(&mut self, code: &str) -> Option<MaterialRecord> {
        self.records.remove(code)
    }

    /// All materials, ordered by code.
    pub fn list(&self) -> Vec<&MaterialRecord> {
        self.records.records().collect()
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the catalog back to the file format, ordered by code.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let file = CatalogFile {
            materials: self.records.records().cloned().collect(),
        };
        serde_json::to_string_pretty(&file)
    }

    fn insert_new(&mut self, record: MaterialRecord) -> Result<(), CatalogFileError> {
        if self.records.lookup(&record.code).ok().flatten().is_some() {
            return Err(CatalogFileError::DuplicateCode(record.code));
        }
        let code = record.code.clone();
        self.records
            .insert(record)
            .map_err(|e| CatalogFileError::InvalidMaterial {
                code,
                field: "code",
                reason: e.to_string(),
            })
    }
}

impl Catalog for JsonCatalog {
    fn lookup(&self, code: &str) -> Result<Option<MaterialRecord>, CatalogError> {
        self.records.lookup(code)
    }
}

/// Load and validate a catalog from a JSON string.
///
/// Each record must have a non-empty `code`, `description` and `category`,
/// and `shelf_life_days` in `1..=365`. Codes must be unique.
pub fn load_catalog_from_str(s: &str) -> Result<JsonCatalog, CatalogFileError> {
    let file: CatalogFile = serde_json::from_str(s)?;
    let mut catalog = JsonCatalog::default();

    for (i, record) in file.materials.into_iter().enumerate() {
        if let Err((field, reason)) = check_record(&record) {
            return Err(CatalogFileError::InvalidField {
                field: format!("materials[{i}].{field}"),
                reason,
            });
        }
        catalog.insert_new(record)?;
    }

    Ok(catalog)
}

/// Check the fields of one record, naming the first one that is invalid.
fn check_record(record: &MaterialRecord) -> Result<(), (&'static str, String)> {
    if record.code.trim().is_empty() {
        return Err(("code", "must not be empty".into()));
    }
    if record.description.trim().is_empty() {
        return Err(("description", "must not be empty".into()));
    }
    if record.category.trim().is_empty() {
        return Err(("category", "must not be empty".into()));
    }
    if !(1..=MAX_SHELF_LIFE_DAYS).contains(&record.base_shelf_life_days) {
        return Err((
            "shelf_life_days",
            format!(
                "{} is outside 1..={MAX_SHELF_LIFE_DAYS}",
                record.base_shelf_life_days
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "materials": [
            { "code": "SOP001", "description": "Sopa de Legumes",
              "shelf_life_days": 30, "category": "Sopa", "special": true },
            { "code": "ARZ01", "description": "Arroz Branco",
              "shelf_life_days": 3, "category": "Alimento Normal" }
        ]
    }"#;

    #[test]
    fn loads_and_looks_up() {
        let catalog = load_catalog_from_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let soup = catalog.lookup("SOP001").unwrap().unwrap();
        assert!(soup.special);
        assert_eq!(soup.base_shelf_life_days, 30);
        assert!(!catalog.lookup("ARZ01").unwrap().unwrap().special);
        assert!(catalog.lookup("missing").unwrap().is_none());
    }

    #[test]
    fn list_is_ordered_by_code() {
        let catalog = load_catalog_from_str(SAMPLE).unwrap();
        let codes: Vec<&str> = catalog.list().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["ARZ01", "SOP001"]);
    }

    #[test]
    fn rejects_zero_day_shelf_life() {
        let json = r#"{"materials":[{"code":"A","description":"x","shelf_life_days":0,"category":"c"}]}"#;
        match load_catalog_from_str(json) {
            Err(CatalogFileError::InvalidField { field, .. }) => {
                assert_eq!(field, "materials[0].shelf_life_days")
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn rejects_more_than_a_year() {
        let json = r#"{"materials":[{"code":"A","description":"x","shelf_life_days":366,"category":"c"}]}"#;
        assert!(matches!(
            load_catalog_from_str(json),
            Err(CatalogFileError::InvalidField { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let json = r#"{"materials":[
            {"code":"A","description":"x","shelf_life_days":1,"category":"c"},
            {"code":"A","description":"y","shelf_life_days":2,"category":"c"}
        ]}"#;
        match load_catalog_from_str(json) {
            Err(CatalogFileError::DuplicateCode(code)) => assert_eq!(code, "A"),
            other => panic!("expected DuplicateCode, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_category() {
        let json = r#"{"materials":[{"code":"A","description":"x","shelf_life_days":1,"category":" "}]}"#;
        assert!(load_catalog_from_str(json).is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            load_catalog_from_str("{ not json"),
            Err(CatalogFileError::InvalidJson(_))
        ));
    }

    fn record(code: &str, days: u32) -> MaterialRecord {
        MaterialRecord {
            code: code.into(),
            description: "Caldo Verde".into(),
            base_shelf_life_days: days,
            category: "Sopa".into(),
            special: false,
        }
    }

    #[test]
    fn add_registers_new_material() {
        let mut catalog = load_catalog_from_str(SAMPLE).unwrap();
        catalog.add(record("CLD02", 30)).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.lookup("CLD02").unwrap().unwrap().base_shelf_life_days, 30);
    }

    #[test]
    fn add_rejects_existing_code() {
        let mut catalog = load_catalog_from_str(SAMPLE).unwrap();
        match catalog.add(record("SOP001", 10)) {
            Err(CatalogFileError::DuplicateCode(code)) => assert_eq!(code, "SOP001"),
            other => panic!("expected DuplicateCode, got {other:?}"),
        }
        let kept = catalog.lookup("SOP001").unwrap().unwrap();
        assert_eq!(kept.base_shelf_life_days, 30);
        assert!(kept.special);
    }

    #[test]
    fn add_applies_load_rules() {
        let mut catalog = JsonCatalog::default();
        match catalog.add(record("CLD02", 400)) {
            Err(CatalogFileError::InvalidMaterial { code, field, .. }) => {
                assert_eq!(code, "CLD02");
                assert_eq!(field, "shelf_life_days");
            }
            other => panic!("expected InvalidMaterial, got {other:?}"),
        }
        let mut blank = record("CLD03", 5);
        blank.category = "  ".into();
        assert!(matches!(
            catalog.add(blank),
            Err(CatalogFileError::InvalidMaterial { field: "category", .. })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn removed_material_is_not_found() {
        let mut catalog = load_catalog_from_str(SAMPLE).unwrap();
        let removed = catalog.remove("ARZ01").unwrap();
        assert_eq!(removed.description, "Arroz Branco");
        assert!(catalog.lookup("ARZ01").unwrap().is_none());
        assert!(catalog.remove("ARZ01").is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn json_output_loads_back() {
        let catalog = load_catalog_from_str(SAMPLE).unwrap();
        let reloaded = load_catalog_from_str(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(catalog.list(), reloaded.list());
    }
}
