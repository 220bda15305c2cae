//! Role-scoped region statistics
//!
//! Turns a flat list of stock movements into the summary a given role is
//! allowed to see:
//! - `SuperAdmin`: one rollup per region (point-of-sale count, product count,
//!   per-operation totals)
//! - `AdminRegion`: the breakdown of a single region by point of sale
//!
//! Results are full rebuilds over the input slice; nothing is cached.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_amount, validate_identifier, validate_region_scope};
use shared::{MouvementStock, OperationType, Region, Role};

use crate::config::StatsConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::resolve::{PointVenteKey, ReferenceDirectory, Resolver};

// ============================================================================
// Result types
// ============================================================================

/// Sum of `montant` per operation type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTotals {
    #[serde(rename = "Entrée", with = "rust_decimal::serde::float")]
    pub entree: Decimal,
    #[serde(rename = "Sortie", with = "rust_decimal::serde::float")]
    pub sortie: Decimal,
    #[serde(rename = "Vente", with = "rust_decimal::serde::float")]
    pub vente: Decimal,
    #[serde(rename = "Livraison", with = "rust_decimal::serde::float")]
    pub livraison: Decimal,
    #[serde(rename = "Commande", with = "rust_decimal::serde::float")]
    pub commande: Decimal,
}

impl OperationTotals {
    pub fn get(&self, op: OperationType) -> Decimal {
        match op {
            OperationType::Entree => self.entree,
            OperationType::Sortie => self.sortie,
            OperationType::Vente => self.vente,
            OperationType::Livraison => self.livraison,
            OperationType::Commande => self.commande,
        }
    }

    pub fn add(&mut self, op: OperationType, amount: Decimal) {
        let slot = match op {
            OperationType::Entree => &mut self.entree,
            OperationType::Sortie => &mut self.sortie,
            OperationType::Vente => &mut self.vente,
            OperationType::Livraison => &mut self.livraison,
            OperationType::Commande => &mut self.commande,
        };
        *slot += amount;
    }

    /// Sum over every operation type
    pub fn total(&self) -> Decimal {
        OperationType::ALL.iter().map(|op| self.get(*op)).sum()
    }
}

/// Region-level rollup shown to super admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRollup {
    pub region: String,
    /// Distinct points of sale with at least one movement
    pub point_ventes: usize,
    /// Distinct products moved
    pub produits: usize,
    #[serde(flatten)]
    pub totals: OperationTotals,
}

/// Per point-of-sale figures inside one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointVenteStats {
    /// Absent when the point of sale was sent without an `_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_vente_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    pub produits: usize,
    #[serde(flatten)]
    pub totals: OperationTotals,
}

/// A region broken down by point of sale, shown to region admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBreakdown {
    pub region: String,
    pub point_ventes: Vec<PointVenteStats>,
}

/// Region statistics, tagged with the role they were computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RegionStats {
    SuperAdmin(RegionRollup),
    AdminRegion(RegionBreakdown),
}

impl RegionStats {
    pub fn role(&self) -> Role {
        match self {
            RegionStats::SuperAdmin(_) => Role::SuperAdmin,
            RegionStats::AdminRegion(_) => Role::AdminRegion,
        }
    }
}

/// Why movements were left out of a computation.
///
/// Kept apart from the statistics so the figures themselves are unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionReport {
    /// Movements without a point of sale
    pub central_depot: usize,
    /// Point of sale present but its region id could not be resolved
    pub unresolved_region: usize,
    /// Movements outside the requested region
    pub out_of_scope: usize,
    /// Not validated while `validated_only` is set
    pub unvalidated: usize,
    /// Counted in distinct counts but not in any per-type total
    pub unrecognized_operation: usize,
    /// Aggregated as-is, reported for data quality
    pub negative_amounts: usize,
}

impl ExclusionReport {
    /// Movements that contributed nothing to the result
    pub fn excluded(&self) -> usize {
        self.central_depot + self.unresolved_region + self.out_of_scope + self.unvalidated
    }
}

/// Statistics plus the exclusion audit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub stats: Vec<RegionStats>,
    pub exclusions: ExclusionReport,
}

// ============================================================================
// Accumulators
// ============================================================================

#[derive(Default)]
struct Bucket<'a> {
    points_vente: HashSet<PointVenteKey<'a>>,
    produits: HashSet<&'a str>,
    totals: OperationTotals,
}

impl<'a> Bucket<'a> {
    fn add(&mut self, movement: &MouvementStock) {
        if let Some(op) = movement.operation {
            self.totals.add(op, movement.montant);
        }
    }
}

/// Buckets in first-occurrence order
struct Buckets<'a, K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Bucket<'a>)>,
}

impl<'a, K: Copy + Eq + Hash> Buckets<'a, K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut Bucket<'a> {
        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                self.entries.push((key, Bucket::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Computes region statistics under a role-based visibility policy
#[derive(Debug, Clone, Copy)]
pub struct RoleScopedStatsEngine<'a> {
    resolver: Resolver<'a>,
    config: &'a StatsConfig,
}

impl<'a> RoleScopedStatsEngine<'a> {
    pub fn new(directory: &'a ReferenceDirectory, config: &'a StatsConfig) -> Self {
        Self {
            resolver: Resolver::new(directory),
            config,
        }
    }

    /// Statistics visible to `role`.
    ///
    /// `AdminRegion` needs a region filter with an identifier; without one the
    /// result is empty. Roles without a regional view also get an empty result.
    pub fn compute_region_stats(
        &self,
        records: &'a [MouvementStock],
        role: Role,
        region_filter: Option<&Region>,
    ) -> Vec<RegionStats> {
        self.compute_region_stats_audited(records, role, region_filter)
            .stats
    }

    /// Same as [`compute_region_stats`](Self::compute_region_stats), with a
    /// count of the movements that were left out and why.
    pub fn compute_region_stats_audited(
        &self,
        records: &'a [MouvementStock],
        role: Role,
        region_filter: Option<&Region>,
    ) -> StatsReport {
        let mut exclusions = ExclusionReport::default();
        let stats = match role {
            Role::SuperAdmin => self
                .super_admin_rollups(records, &mut exclusions)
                .into_iter()
                .map(RegionStats::SuperAdmin)
                .collect(),
            Role::AdminRegion => match region_filter {
                Some(region) if validate_identifier(&region.id).is_ok() => {
                    vec![RegionStats::AdminRegion(self.admin_region_breakdown(
                        records,
                        region,
                        &mut exclusions,
                    ))]
                }
                _ => {
                    tracing::debug!("AdminRegion statistics requested without a region scope");
                    Vec::new()
                }
            },
            Role::AdminPointVente | Role::Vendeur | Role::Logisticien => {
                tracing::debug!(%role, "No regional statistics for role");
                Vec::new()
            }
        };

        tracing::debug!(
            %role,
            records = records.len(),
            buckets = stats.len(),
            excluded = exclusions.excluded(),
            "Computed region statistics"
        );

        StatsReport { stats, exclusions }
    }

    /// Strict variant of the region scope check, for callers that want to
    /// surface a missing scope instead of rendering an empty state.
    pub fn require_scope(region_filter: Option<&Region>) -> AnalyticsResult<&Region> {
        let region = region_filter
            .ok_or_else(|| AnalyticsError::InvalidScope("no region selected".to_string()))?;
        validate_region_scope(region).map_err(|e| {
            tracing::warn!(region_id = %region.id, "Rejected region scope");
            AnalyticsError::InvalidScope(e.to_string())
        })?;
        Ok(region)
    }

    fn is_eligible(&self, movement: &MouvementStock, exclusions: &mut ExclusionReport) -> bool {
        if self.config.validated_only && !movement.statut {
            exclusions.unvalidated += 1;
            return false;
        }
        true
    }

    fn super_admin_rollups(
        &self,
        records: &'a [MouvementStock],
        exclusions: &mut ExclusionReport,
    ) -> Vec<RegionRollup> {
        let mut buckets = Buckets::new();

        for movement in records {
            if !self.is_eligible(movement, exclusions) {
                continue;
            }
            let Some(region) = self.resolver.region_of(movement) else {
                note_unresolved(movement, exclusions);
                continue;
            };
            note_quality(movement, exclusions);

            let bucket = buckets.entry(region.name);
            if let Some(key) = self.resolver.point_vente_key(movement) {
                bucket.points_vente.insert(key);
            }
            if let Some(id) = self.resolver.product_id(movement.produit.as_ref()) {
                bucket.produits.insert(id);
            }
            bucket.add(movement);
        }

        buckets
            .entries
            .into_iter()
            .map(|(name, bucket)| RegionRollup {
                region: name.to_string(),
                point_ventes: bucket.points_vente.len(),
                produits: bucket.produits.len(),
                totals: bucket.totals,
            })
            .collect()
    }

    fn admin_region_breakdown(
        &self,
        records: &'a [MouvementStock],
        region: &Region,
        exclusions: &mut ExclusionReport,
    ) -> RegionBreakdown {
        let scope_id = region.id.trim();
        let mut buckets = Buckets::new();
        let mut names: HashMap<&'a str, &'a str> = HashMap::new();

        for movement in records {
            if !self.is_eligible(movement, exclusions) {
                continue;
            }
            let Some(region_id) = self.resolver.region_id_of(movement) else {
                note_unresolved(movement, exclusions);
                continue;
            };
            if region_id != scope_id {
                exclusions.out_of_scope += 1;
                continue;
            }
            // a resolved region implies a resolved point of sale
            let Some(key) = self.resolver.point_vente_key(movement) else {
                exclusions.unresolved_region += 1;
                continue;
            };
            note_quality(movement, exclusions);

            if let PointVenteKey::Id(id) = key {
                if let Some(label) = self.resolver.point_vente_label(movement) {
                    if label != id {
                        names.entry(id).or_insert(label);
                    }
                }
            }

            let bucket = buckets.entry(key);
            if let Some(id) = self.resolver.product_id(movement.produit.as_ref()) {
                bucket.produits.insert(id);
            }
            bucket.add(movement);
        }

        RegionBreakdown {
            region: region.nom.clone(),
            point_ventes: buckets
                .entries
                .into_iter()
                .map(|(key, bucket)| {
                    let (point_vente_id, nom) = match key {
                        PointVenteKey::Id(id) => {
                            (Some(id.to_string()), names.get(id).map(|n| n.to_string()))
                        }
                        PointVenteKey::Unidentified(name) => (
                            None,
                            Some(
                                name.unwrap_or(self.config.unidentified_point_vente_label.as_str())
                                    .to_string(),
                            ),
                        ),
                    };
                    PointVenteStats {
                        point_vente_id,
                        nom,
                        produits: bucket.produits.len(),
                        totals: bucket.totals,
                    }
                })
                .collect(),
        }
    }
}

fn note_unresolved(movement: &MouvementStock, exclusions: &mut ExclusionReport) {
    if movement.is_central_depot() {
        exclusions.central_depot += 1;
    } else {
        exclusions.unresolved_region += 1;
    }
}

fn note_quality(movement: &MouvementStock, exclusions: &mut ExclusionReport) {
    if movement.operation.is_none() {
        exclusions.unrecognized_operation += 1;
    }
    if validate_amount(movement.montant).is_err() {
        exclusions.negative_amounts += 1;
    }
}

/// Region statistics with embedded references only and default settings
pub fn compute_region_stats(
    records: &[MouvementStock],
    role: Role,
    region_filter: Option<&Region>,
) -> Vec<RegionStats> {
    let directory = ReferenceDirectory::default();
    let config = StatsConfig::default();
    RoleScopedStatsEngine::new(&directory, &config).compute_region_stats(
        records,
        role,
        region_filter,
    )
}
