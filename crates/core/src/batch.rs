//! Soup batch codes: boiler number, production shift, and lot number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Production shift, printed as its Portuguese initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// Manhã.
    Morning,
    /// Tarde.
    Afternoon,
    /// Noite.
    Night,
}

impl Shift {
    /// Letter used inside the batch code.
    pub fn letter(self) -> char {
        match self {
            Shift::Morning => 'M',
            Shift::Afternoon => 'T',
            Shift::Night => 'N',
        }
    }
}

impl FromStr for Shift {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "morning" | "manha" | "manhã" => Ok(Shift::Morning),
            "t" | "afternoon" | "tarde" => Ok(Shift::Afternoon),
            "n" | "night" | "noite" => Ok(Shift::Night),
            other => Err(LabelError::InvalidBatchCode(format!("unknown shift {other:?}"))),
        }
    }
}

/// Composite batch identifier printed on soup labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCode {
    boiler: String,
    shift: Shift,
    lot: String,
}

impl BatchCode {
    /// Build a batch code. Boiler and lot are trimmed and must not be empty.
    pub fn new(boiler: &str, shift: Shift, lot: &str) -> Result<Self, LabelError> {
        let boiler = boiler.trim();
        let lot = lot.trim();
        if boiler.is_empty() {
            return Err(LabelError::InvalidBatchCode("boiler is required".into()));
        }
        if lot.is_empty() {
            return Err(LabelError::InvalidBatchCode("lot is required".into()));
        }
        Ok(Self {
            boiler: boiler.to_owned(),
            shift,
            lot: lot.to_owned(),
        })
    }
}

/// Boiler zero-padded to 2, shift letter, lot zero-padded to 3: `01M007`.
impl fmt::Display for BatchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0>2}{}{:0>3}",
            self.boiler,
            self.shift.letter(),
            self.lot
        )
    }
}
