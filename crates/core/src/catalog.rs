//! Material catalog lookup seam.

use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::model::MaterialRecord;

/// Read-only access to material records by code.
pub trait Catalog {
    /// Look up a material by its exact code. `Ok(None)` means the code is unknown.
    fn lookup(&self, code: &str) -> Result<Option<MaterialRecord>, CatalogError>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn lookup(&self, code: &str) -> Result<Option<MaterialRecord>, CatalogError> {
        (**self).lookup(code)
    }
}

/// A catalog held in memory, keyed by material code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: BTreeMap<String, MaterialRecord>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record. Invalid records are rejected.
    pub fn insert(&mut self, record: MaterialRecord) -> Result<(), CatalogError> {
        record.validate()?;
        self.records.insert(record.code.clone(), record);
        Ok(())
    }

    /// Remove the record for `code`, returning it if it was present.
    pub fn remove(&mut self, code: &str) -> Option<MaterialRecord> {
        self.records.remove(code)
    }

    /// All records, ordered by code.
    pub fn records(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.records.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn lookup(&self, code: &str) -> Result<Option<MaterialRecord>, CatalogError> {
        Ok(self.records.get(code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_code_exactly() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .insert(MaterialRecord::new("ARZ01", "Arroz", 3, "Alimento Normal", false).unwrap())
            .unwrap();
        assert!(catalog.lookup("ARZ01").unwrap().is_some());
        assert!(catalog.lookup("arz01").unwrap().is_none());
        assert!(catalog.lookup("ARZ01 ").unwrap().is_none());
    }

    #[test]
    fn insert_rejects_invalid_record() {
        let mut catalog = InMemoryCatalog::new();
        let record = MaterialRecord {
            code: "BAD".into(),
            description: "x".into(),
            base_shelf_life_days: 0,
            category: "Sopa".into(),
            special: false,
        };
        assert!(catalog.insert(record).is_err());
        assert!(catalog.is_empty());
    }
}
