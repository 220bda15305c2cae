//! Headline figures for the dashboard cards

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{MouvementStock, OperationType, Stock};

use crate::stats::OperationTotals;

/// Quantity and valuation of a set of stock lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPosition {
    #[serde(with = "rust_decimal::serde::float")]
    pub quantite: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub montant: Decimal,
}

impl StockPosition {
    fn add(&mut self, stock: &Stock) {
        self.quantite += stock.quantite;
        self.montant += stock.montant;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    /// Sum of sales amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub chiffre_affaires: Decimal,
    pub totals: OperationTotals,
    pub movements: usize,
    pub validated_movements: usize,
    /// Distinct products with at least one movement
    pub products_moved: usize,
    pub depot_central: StockPosition,
    pub points_vente: StockPosition,
}

/// Compute the dashboard KPIs from raw movements and stock lines
pub fn compute_kpis(movements: &[MouvementStock], stocks: &[Stock]) -> DashboardKpis {
    let mut kpis = DashboardKpis {
        movements: movements.len(),
        ..Default::default()
    };
    let mut produits = HashSet::new();

    for movement in movements {
        if movement.statut {
            kpis.validated_movements += 1;
        }
        if let Some(op) = movement.operation {
            kpis.totals.add(op, movement.montant);
        }
        if let Some(id) = movement.produit.as_ref().and_then(|p| p.id()) {
            produits.insert(id);
        }
    }
    kpis.chiffre_affaires = kpis.totals.get(OperationType::Vente);
    kpis.products_moved = produits.len();

    for stock in stocks {
        // a stock line flagged central or without a point of sale sits in the depot
        if stock.depot_central || stock.point_vente.is_none() {
            kpis.depot_central.add(stock);
        } else {
            kpis.points_vente.add(stock);
        }
    }

    tracing::debug!(
        movements = kpis.movements,
        stocks = stocks.len(),
        "Computed dashboard KPIs"
    );

    kpis
}
