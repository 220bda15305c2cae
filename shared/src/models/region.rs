//! Region and point-of-sale models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{Identified, Ref};

/// A sales region grouping points of sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Region {
    #[serde(rename = "_id", default)]
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
}

impl Identified for Region {
    fn raw_id(&self) -> &str {
        &self.id
    }
}

/// A physical sales location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointVente {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    /// Owning region; upstream data occasionally omits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Ref<Region>>,
}

impl Identified for PointVente {
    fn raw_id(&self) -> &str {
        &self.id
    }
}
