//! Dashboard roles

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of the connected user, as issued by the session layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    AdminRegion,
    AdminPointVente,
    Vendeur,
    Logisticien,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::AdminRegion => "AdminRegion",
            Role::AdminPointVente => "AdminPointVente",
            Role::Vendeur => "Vendeur",
            Role::Logisticien => "Logisticien",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SuperAdmin" => Ok(Role::SuperAdmin),
            "AdminRegion" => Ok(Role::AdminRegion),
            "AdminPointVente" => Ok(Role::AdminPointVente),
            "Vendeur" => Ok(Role::Vendeur),
            "Logisticien" => Ok(Role::Logisticien),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
