//! Region statistics tests
//!
//! Tests for role-scoped aggregation including:
//! - Per-type totals match the input amounts
//! - Region admin breakdown agrees with the super admin rollup
//! - Distinct counts ignore duplicate movements

use analytics::{
    compute_region_stats, ReferenceDirectory, RegionStats, RoleScopedStatsEngine,
};
use analytics::config::StatsConfig;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{MouvementStock, OperationType, PointVente, Ref, Region, Role};

fn region(id: &str, nom: &str) -> Region {
    Region {
        id: id.to_string(),
        nom: nom.to_string(),
        ville: None,
    }
}

fn point_vente(id: &str, region: Option<Region>) -> PointVente {
    PointVente {
        id: id.to_string(),
        nom: format!("Boutique {}", id),
        adresse: None,
        region: region.map(Ref::from),
    }
}

fn movement(
    op: Option<OperationType>,
    montant: i64,
    point_vente: Option<PointVente>,
    produit: &str,
) -> MouvementStock {
    MouvementStock {
        id: format!("m-{}-{}", produit, montant),
        produit: Some(Ref::Id(produit.to_string())),
        point_vente: point_vente.map(Ref::from),
        operation: op,
        quantite: Decimal::ONE,
        montant: Decimal::from(montant),
        statut: true,
        created_at: None,
    }
}

fn rollups(stats: &[RegionStats]) -> Vec<&analytics::RegionRollup> {
    stats
        .iter()
        .map(|s| match s {
            RegionStats::SuperAdmin(rollup) => rollup,
            RegionStats::AdminRegion(_) => panic!("expected SuperAdmin stats"),
        })
        .collect()
}

fn breakdown(stats: &[RegionStats]) -> &analytics::RegionBreakdown {
    assert_eq!(stats.len(), 1);
    match &stats[0] {
        RegionStats::AdminRegion(breakdown) => breakdown,
        RegionStats::SuperAdmin(_) => panic!("expected AdminRegion stats"),
    }
}

/// Movements in the embedded form the API sends: point of sale → region by object
fn nord_sud_records() -> Vec<MouvementStock> {
    let nord = region("r1", "Nord");
    let sud = region("r2", "Sud");
    vec![
        movement(
            Some(OperationType::Vente),
            100,
            Some(point_vente("pv1", Some(nord.clone()))),
            "p1",
        ),
        movement(
            Some(OperationType::Vente),
            50,
            Some(point_vente("pv1", Some(nord))),
            "p2",
        ),
        movement(
            Some(OperationType::Entree),
            30,
            Some(point_vente("pv2", Some(sud))),
            "p1",
        ),
    ]
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_super_admin_rollup_per_region() {
        let stats = compute_region_stats(&nord_sud_records(), Role::SuperAdmin, None);
        let rollups = rollups(&stats);

        assert_eq!(rollups.len(), 2);
        let nord = rollups.iter().find(|r| r.region == "Nord").unwrap();
        let sud = rollups.iter().find(|r| r.region == "Sud").unwrap();

        assert_eq!(nord.totals.vente, Decimal::from(150));
        assert_eq!(nord.totals.entree, Decimal::ZERO);
        assert_eq!(nord.point_ventes, 1);
        assert_eq!(nord.produits, 2);

        assert_eq!(sud.totals.entree, Decimal::from(30));
        assert_eq!(sud.totals.vente, Decimal::ZERO);
        assert!(stats.iter().all(|s| s.role() == Role::SuperAdmin));
    }

    #[test]
    fn test_admin_region_breakdown_for_nord() {
        let filter = region("r1", "Nord");
        let stats = compute_region_stats(&nord_sud_records(), Role::AdminRegion, Some(&filter));
        let breakdown = breakdown(&stats);

        assert_eq!(breakdown.region, "Nord");
        assert_eq!(breakdown.point_ventes.len(), 1);
        let pv = &breakdown.point_ventes[0];
        assert_eq!(pv.point_vente_id.as_deref(), Some("pv1"));
        assert_eq!(pv.nom.as_deref(), Some("Boutique pv1"));
        assert_eq!(pv.produits, 2);
        assert_eq!(pv.totals.vente, Decimal::from(150));
        assert_eq!(pv.totals.entree, Decimal::ZERO);
    }

    #[test]
    fn test_admin_region_without_scope_is_empty() {
        let records = nord_sud_records();
        assert!(compute_region_stats(&records, Role::AdminRegion, None).is_empty());

        let no_id = region("", "Nord");
        assert!(compute_region_stats(&records, Role::AdminRegion, Some(&no_id)).is_empty());
    }

    #[test]
    fn test_admin_region_with_unknown_region_has_no_points_of_sale() {
        let filter = region("r9", "Ouest");
        let stats = compute_region_stats(&nord_sud_records(), Role::AdminRegion, Some(&filter));

        let breakdown = breakdown(&stats);
        assert_eq!(breakdown.region, "Ouest");
        assert!(breakdown.point_ventes.is_empty());
    }

    #[test]
    fn test_roles_without_regional_view_get_nothing() {
        let records = nord_sud_records();
        for role in [Role::AdminPointVente, Role::Vendeur, Role::Logisticien] {
            assert!(compute_region_stats(&records, role, None).is_empty());
        }
    }

    #[test]
    fn test_bare_id_references_resolve_through_directory() {
        let records = vec![MouvementStock {
            point_vente: Some(Ref::Id("pv1".to_string())),
            ..movement(Some(OperationType::Vente), 80, None, "p1")
        }];
        let directory = ReferenceDirectory::new()
            .with_regions(&[region("r1", "Nord")])
            .with_points_vente(&[PointVente {
                region: Some(Ref::Id("r1".to_string())),
                ..point_vente("pv1", None)
            }]);
        let config = StatsConfig::default();
        let engine = RoleScopedStatsEngine::new(&directory, &config);

        let stats = engine.compute_region_stats(&records, Role::SuperAdmin, None);
        assert_eq!(rollups(&stats)[0].region, "Nord");
        assert_eq!(rollups(&stats)[0].totals.vente, Decimal::from(80));

        let filter = region("r1", "Nord");
        let stats = engine.compute_region_stats(&records, Role::AdminRegion, Some(&filter));
        assert_eq!(breakdown(&stats).point_ventes[0].totals.vente, Decimal::from(80));
    }

    #[test]
    fn test_admin_region_keeps_points_of_sale_sent_without_id() {
        // the API shape where the point of sale only carries its region
        let json = r#"[
            {"type": "Vente", "montant": 100, "pointVente": {"region": {"_id": "r1", "nom": "Nord"}}},
            {"type": "Vente", "montant": 50, "pointVente": {"region": {"_id": "r1", "nom": "Nord"}}},
            {"type": "Entrée", "montant": 30, "pointVente": {"region": {"_id": "r2", "nom": "Sud"}}}
        ]"#;
        let records: Vec<MouvementStock> = serde_json::from_str(json).unwrap();

        let super_stats = compute_region_stats(&records, Role::SuperAdmin, None);
        let nord = rollups(&super_stats)
            .into_iter()
            .find(|r| r.region == "Nord")
            .unwrap();
        assert_eq!(nord.totals.vente, Decimal::from(150));

        let filter = region("r1", "Nord");
        let stats = compute_region_stats(&records, Role::AdminRegion, Some(&filter));
        let breakdown = breakdown(&stats);
        let vente: Decimal = breakdown.point_ventes.iter().map(|p| p.totals.vente).sum();
        let entree: Decimal = breakdown.point_ventes.iter().map(|p| p.totals.entree).sum();

        assert_eq!(breakdown.point_ventes.len(), 1);
        assert_eq!(breakdown.point_ventes[0].point_vente_id, None);
        assert_eq!(breakdown.point_ventes[0].nom.as_deref(), Some("Unknown"));
        assert_eq!(vente, Decimal::from(150));
        assert_eq!(entree, Decimal::ZERO);
        assert_eq!(nord.point_ventes, breakdown.point_ventes.len());
    }

    #[test]
    fn test_unidentified_points_of_sale_are_grouped_by_name() {
        let nord = region("r1", "Nord");
        let mut lille = point_vente("", Some(nord.clone()));
        lille.nom = "Lille".to_string();
        let mut roubaix = point_vente("", Some(nord.clone()));
        roubaix.nom = "Roubaix".to_string();
        let records = vec![
            movement(Some(OperationType::Vente), 10, Some(lille.clone()), "p1"),
            movement(Some(OperationType::Vente), 20, Some(roubaix), "p1"),
            movement(Some(OperationType::Vente), 5, Some(lille), "p2"),
        ];

        let stats = compute_region_stats(&records, Role::AdminRegion, Some(&nord));
        let breakdown = breakdown(&stats);
        let labels: Vec<_> = breakdown
            .point_ventes
            .iter()
            .map(|p| p.nom.as_deref())
            .collect();

        assert_eq!(labels, vec![Some("Lille"), Some("Roubaix")]);
        assert_eq!(breakdown.point_ventes[0].totals.vente, Decimal::from(15));
        assert_eq!(breakdown.point_ventes[0].produits, 2);
    }

    #[test]
    fn test_admin_region_matches_bare_region_id_without_directory() {
        let json = r#"[
            {"type": "Vente", "montant": 100, "pointVente": {"_id": "pv1", "nom": "Lille", "region": "r1"}}
        ]"#;
        let records: Vec<MouvementStock> = serde_json::from_str(json).unwrap();
        let directory = ReferenceDirectory::default();
        let config = StatsConfig::default();
        let engine = RoleScopedStatsEngine::new(&directory, &config);

        let filter = region("r1", "Nord");
        let report = engine.compute_region_stats_audited(&records, Role::AdminRegion, Some(&filter));
        let breakdown = breakdown(&report.stats);

        assert_eq!(breakdown.region, "Nord");
        assert_eq!(breakdown.point_ventes.len(), 1);
        assert_eq!(breakdown.point_ventes[0].point_vente_id.as_deref(), Some("pv1"));
        assert_eq!(breakdown.point_ventes[0].nom.as_deref(), Some("Lille"));
        assert_eq!(breakdown.point_ventes[0].totals.vente, Decimal::from(100));
        assert_eq!(report.exclusions.unresolved_region, 0);

        // without a name the super admin bucket is labelled by the region id
        let stats = engine.compute_region_stats(&records, Role::SuperAdmin, None);
        assert_eq!(rollups(&stats)[0].region, "r1");
        assert_eq!(rollups(&stats)[0].totals.vente, Decimal::from(100));
    }

    #[test]
    fn test_unresolvable_references_are_excluded_and_audited() {
        let mut records = nord_sud_records();
        // point of sale without a region
        records.push(movement(
            Some(OperationType::Vente),
            500,
            Some(point_vente("pv3", None)),
            "p3",
        ));
        // central depot
        records.push(movement(Some(OperationType::Entree), 700, None, "p4"));
        // bare point-of-sale id, nothing to resolve it with
        records.push(MouvementStock {
            point_vente: Some(Ref::Id("pv1".to_string())),
            ..movement(Some(OperationType::Vente), 900, None, "p5")
        });

        let directory = ReferenceDirectory::default();
        let config = StatsConfig::default();
        let report = RoleScopedStatsEngine::new(&directory, &config).compute_region_stats_audited(
            &records,
            Role::SuperAdmin,
            None,
        );

        let total_vente: Decimal = rollups(&report.stats).iter().map(|r| r.totals.vente).sum();
        assert_eq!(total_vente, Decimal::from(150));
        assert_eq!(report.exclusions.unresolved_region, 2);
        assert_eq!(report.exclusions.central_depot, 1);
        assert_eq!(report.exclusions.excluded(), 3);
    }

    #[test]
    fn test_unknown_operation_counts_but_does_not_sum() {
        let nord = region("r1", "Nord");
        let records = vec![
            movement(
                Some(OperationType::Vente),
                10,
                Some(point_vente("pv1", Some(nord.clone()))),
                "p1",
            ),
            movement(None, 999, Some(point_vente("pv2", Some(nord))), "p2"),
        ];

        let directory = ReferenceDirectory::default();
        let config = StatsConfig::default();
        let report = RoleScopedStatsEngine::new(&directory, &config).compute_region_stats_audited(
            &records,
            Role::SuperAdmin,
            None,
        );
        let rollup = rollups(&report.stats)[0];

        assert_eq!(rollup.totals.total(), Decimal::from(10));
        assert_eq!(rollup.point_ventes, 2);
        assert_eq!(rollup.produits, 2);
        assert_eq!(report.exclusions.unrecognized_operation, 1);
    }

    #[test]
    fn test_validated_only_skips_pending_movements() {
        let mut records = nord_sud_records();
        records[0].statut = false;

        let directory = ReferenceDirectory::default();
        let config = StatsConfig {
            validated_only: true,
            ..Default::default()
        };
        let report = RoleScopedStatsEngine::new(&directory, &config).compute_region_stats_audited(
            &records,
            Role::SuperAdmin,
            None,
        );
        let nord = rollups(&report.stats)
            .into_iter()
            .find(|r| r.region == "Nord")
            .unwrap();

        assert_eq!(nord.totals.vente, Decimal::from(50));
        assert_eq!(report.exclusions.unvalidated, 1);
    }

    #[test]
    fn test_source_records_are_untouched() {
        let records = nord_sud_records();
        let before = records.clone();
        compute_region_stats(&records, Role::SuperAdmin, None);
        assert_eq!(records, before);
    }

    #[test]
    fn test_admin_region_json_shape() {
        let filter = region("r1", "Nord");
        let stats = compute_region_stats(&nord_sud_records(), Role::AdminRegion, Some(&filter));
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json[0]["role"], "AdminRegion");
        assert_eq!(json[0]["region"], "Nord");
        assert_eq!(json[0]["pointVentes"][0]["pointVenteId"], "pv1");
        assert_eq!(json[0]["pointVentes"][0]["Vente"], 150.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    const REGIONS: [(&str, &str); 3] = [("r1", "Nord"), ("r2", "Sud"), ("r3", "Est")];

    /// Strategy for one movement: operation (or unknown), amount, region slot
    /// (or none), point of sale (sometimes without an id) and product drawn
    /// from small pools so that duplicates are frequent.
    fn movement_strategy() -> impl Strategy<Value = MouvementStock> {
        (
            prop::option::weighted(0.9, prop::sample::select(OperationType::ALL.to_vec())),
            0i64..10_000i64,
            prop::option::weighted(0.8, 0usize..REGIONS.len()),
            0usize..4,
            0usize..5,
            any::<bool>(),
            prop::bool::weighted(0.2),
        )
            .prop_map(|(op, cents, region_slot, pv, produit, central, anonymous)| {
                let point_vente = if central {
                    None
                } else {
                    let region = region_slot.map(|i| region(REGIONS[i].0, REGIONS[i].1));
                    // point-of-sale ids are unique per region
                    let id = format!("pv{}-{}", region_slot.map_or(9, |i| i), pv);
                    let mut point_vente = point_vente(&id, region);
                    if anonymous {
                        point_vente.id = String::new();
                    }
                    Some(point_vente)
                };
                MouvementStock {
                    montant: Decimal::new(cents, 2),
                    ..movement(op, 0, point_vente, &format!("p{}", produit))
                }
            })
    }

    fn movements_strategy() -> impl Strategy<Value = Vec<MouvementStock>> {
        prop::collection::vec(movement_strategy(), 0..60)
    }

    fn resolvable_total(records: &[MouvementStock], op: OperationType, region_id: Option<&str>) -> Decimal {
        records
            .iter()
            .filter(|m| m.is_operation(op))
            .filter(|m| {
                let region = m
                    .point_vente
                    .as_ref()
                    .and_then(|pv| pv.embedded())
                    .and_then(|pv| pv.region.as_ref())
                    .and_then(|r| r.id());
                match (region, region_id) {
                    (Some(found), Some(wanted)) => found == wanted,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
            .map(|m| m.montant)
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Per-type totals across all region buckets equal the input totals
        /// over movements with a resolvable region
        #[test]
        fn prop_super_admin_totals_match_input(records in movements_strategy()) {
            let stats = compute_region_stats(&records, Role::SuperAdmin, None);
            let rollups = rollups(&stats);

            for op in OperationType::ALL {
                let bucket_sum: Decimal = rollups.iter().map(|r| r.totals.get(op)).sum();
                prop_assert_eq!(bucket_sum, resolvable_total(&records, op, None));
            }
        }

        /// The region admin breakdown sums to the super admin bucket of the
        /// same region
        #[test]
        fn prop_admin_region_matches_super_admin_bucket(
            records in movements_strategy(),
            slot in 0usize..REGIONS.len(),
        ) {
            let (id, nom) = REGIONS[slot];
            let filter = region(id, nom);
            let super_stats = compute_region_stats(&records, Role::SuperAdmin, None);
            let admin_stats = compute_region_stats(&records, Role::AdminRegion, Some(&filter));
            let breakdown = breakdown(&admin_stats);

            let bucket = rollups(&super_stats).into_iter().find(|r| r.region == nom);
            for op in OperationType::ALL {
                let pv_sum: Decimal = breakdown.point_ventes.iter().map(|p| p.totals.get(op)).sum();
                let expected = bucket.map(|b| b.totals.get(op)).unwrap_or(Decimal::ZERO);
                prop_assert_eq!(pv_sum, expected);
            }
            prop_assert_eq!(
                breakdown.point_ventes.len(),
                bucket.map(|b| b.point_ventes).unwrap_or(0)
            );
        }

        /// Feeding every movement twice changes sums but never distinct counts
        #[test]
        fn prop_distinct_counts_ignore_duplicates(records in movements_strategy()) {
            let doubled: Vec<MouvementStock> =
                records.iter().chain(records.iter()).cloned().collect();

            let once = compute_region_stats(&records, Role::SuperAdmin, None);
            let twice = compute_region_stats(&doubled, Role::SuperAdmin, None);
            let once = rollups(&once);
            let twice = rollups(&twice);

            prop_assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(twice.iter()) {
                prop_assert_eq!(&a.region, &b.region);
                prop_assert_eq!(a.point_ventes, b.point_ventes);
                prop_assert_eq!(a.produits, b.produits);
                prop_assert_eq!(a.totals.total() * Decimal::TWO, b.totals.total());
            }
        }

        /// Distinct counts never exceed the number of contributing movements
        #[test]
        fn prop_distinct_counts_bounded_by_records(records in movements_strategy()) {
            let stats = compute_region_stats(&records, Role::SuperAdmin, None);
            for rollup in rollups(&stats) {
                let contributing = records
                    .iter()
                    .filter(|m| {
                        m.point_vente
                            .as_ref()
                            .and_then(|pv| pv.embedded())
                            .and_then(|pv| pv.region.as_ref())
                            .and_then(|r| r.embedded())
                            .map(|r| r.nom == rollup.region)
                            .unwrap_or(false)
                    })
                    .count();
                prop_assert!(rollup.point_ventes <= contributing);
                prop_assert!(rollup.produits <= contributing);
            }
        }
    }
}
