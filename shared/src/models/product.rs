//! Product catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Identified, Ref};

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Categorie {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub nom: String,
}

impl Identified for Categorie {
    fn raw_id(&self) -> &str {
        &self.id
    }
}

/// A sellable product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Produit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub nom: String,
    /// Unit price
    #[serde(default)]
    pub prix: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorie: Option<Ref<Categorie>>,
}

impl Identified for Produit {
    fn raw_id(&self) -> &str {
        &self.id
    }
}
