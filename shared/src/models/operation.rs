//! Stock operation types

use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Kind of stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationType {
    /// Inbound stock
    #[serde(rename = "Entrée", alias = "Entree")]
    Entree,
    /// Outbound stock
    Sortie,
    Vente,
    Livraison,
    Commande,
}

impl OperationType {
    /// Every operation type, in display order
    pub const ALL: [OperationType; 5] = [
        OperationType::Entree,
        OperationType::Sortie,
        OperationType::Vente,
        OperationType::Livraison,
        OperationType::Commande,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Entree => "Entrée",
            OperationType::Sortie => "Sortie",
            OperationType::Vente => "Vente",
            OperationType::Livraison => "Livraison",
            OperationType::Commande => "Commande",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation type: {0}")]
pub struct UnknownOperationType(pub String);

impl FromStr for OperationType {
    type Err = UnknownOperationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Entrée" | "Entree" => Ok(OperationType::Entree),
            "Sortie" => Ok(OperationType::Sortie),
            "Vente" => Ok(OperationType::Vente),
            "Livraison" => Ok(OperationType::Livraison),
            "Commande" => Ok(OperationType::Commande),
            other => Err(UnknownOperationType(other.to_string())),
        }
    }
}

/// Deserialize an operation type, mapping unrecognized values to `None`
/// instead of rejecting the whole record.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<OperationType>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Label(String),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Label(label) => label.parse().ok(),
        Raw::Other(_) => None,
    })
}
