use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Measurement unit for an intake entry: milliliters for liquids,
/// discrete units for capsules/tablets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IntakeUnit {
    #[default]
    Volume,
    Count,
}

impl IntakeUnit {
    pub const ALL: [IntakeUnit; 2] = [IntakeUnit::Volume, IntakeUnit::Count];

    pub fn as_str(self) -> &'static str {
        match self {
            IntakeUnit::Volume => "ml",
            IntakeUnit::Count => "un",
        }
    }
}

impl fmt::Display for IntakeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntakeUnit {
    type Err = ParseIntakeUnitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "ml" => Ok(IntakeUnit::Volume),
            "un" | "unit" => Ok(IntakeUnit::Count),
            _ => Err(ParseIntakeUnitError {
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for IntakeUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IntakeUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        IntakeUnit::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIntakeUnitError {
    value: String,
}

impl fmt::Display for ParseIntakeUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid intake unit '{}': expected one of {}",
            self.value,
            IntakeUnit::ALL
                .iter()
                .map(|unit| unit.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseIntakeUnitError {}
