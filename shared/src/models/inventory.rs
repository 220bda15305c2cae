//! Stock movement and stock snapshot models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{operation, OperationType, PointVente, Produit};
use crate::types::{deserialize_lenient_amount, Ref};

/// A recorded stock transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MouvementStock {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produit: Option<Ref<Produit>>,
    /// Absent for central-depot movements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_vente: Option<Ref<PointVente>>,
    /// `None` when the API sent a type this platform does not know
    #[serde(rename = "type", default, deserialize_with = "operation::deserialize_lenient")]
    pub operation: Option<OperationType>,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub quantite: Decimal,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub montant: Decimal,
    /// Validation status
    #[serde(default)]
    pub statut: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MouvementStock {
    pub fn is_central_depot(&self) -> bool {
        self.point_vente.is_none()
    }

    pub fn is_operation(&self, op: OperationType) -> bool {
        self.operation == Some(op)
    }
}

/// Quantity on hand for a product at a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produit: Option<Ref<Produit>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_vente: Option<Ref<PointVente>>,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub quantite: Decimal,
    /// Valuation of the stock line
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub montant: Decimal,
    #[serde(default)]
    pub depot_central: bool,
}
