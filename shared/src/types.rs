//! Common types used across the platform

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Records carrying a Mongo-style `_id`
pub trait Identified {
    fn raw_id(&self) -> &str;

    /// Identifier with surrounding whitespace removed, `None` when blank
    fn normalized_id(&self) -> Option<&str> {
        normalize_id(self.raw_id())
    }
}

/// Trim an identifier and reject blank values
pub fn normalize_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// A foreign reference as sent by the API: either a bare id or the populated
/// document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Embedded(Box<T>),
}

impl<T: Identified> Ref<T> {
    /// Normalized identifier of the referenced record, whatever form it came in
    pub fn id(&self) -> Option<&str> {
        match self {
            Ref::Id(id) => normalize_id(id),
            Ref::Embedded(record) => record.normalized_id(),
        }
    }

    /// The populated document, if the API sent one
    pub fn embedded(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Embedded(record) => Some(record),
        }
    }
}

impl<T> From<T> for Ref<T> {
    fn from(record: T) -> Self {
        Ref::Embedded(Box::new(record))
    }
}

/// Deserialize an amount or quantity, reading `null` and non-numeric values
/// as zero so one bad field does not reject the whole batch.
pub fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Value(Decimal),
        Malformed(IgnoredAny),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Value(amount) => amount,
        Amount::Malformed(_) => Decimal::ZERO,
    })
}
