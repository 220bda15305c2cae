//! Categorical charts: sales per region / point of sale / product, stock per
//! category, amounts per operation type

use rust_decimal::Decimal;
use shared::{MouvementStock, OperationType, Stock};

use super::{aggregate_by_category, CategoryTotals, ChartBuilder, ChartData};
use crate::config::AnalyticsConfig;
use crate::resolve::ReferenceDirectory;

fn sales<'m>(movements: &'m [MouvementStock]) -> impl Iterator<Item = &'m MouvementStock> + 'm {
    movements
        .iter()
        .filter(|m| m.is_operation(OperationType::Vente))
}

impl<'a> ChartBuilder<'a> {
    /// Sales amount per region.
    ///
    /// Uses the same region resolution as the region rollups; sales whose
    /// region cannot be resolved land in `charts.unknown_region_label`.
    pub fn sales_by_region_totals(&self, movements: &'a [MouvementStock]) -> CategoryTotals {
        let unknown = &self.config.charts.unknown_region_label;
        aggregate_by_category(
            sales(movements),
            |m| match self.resolver.region_of(m) {
                Some(region) => region.name.to_string(),
                None => unknown.clone(),
            },
            |m| m.montant,
        )
    }

    pub fn sales_by_region(&self, movements: &'a [MouvementStock]) -> ChartData {
        self.colored(self.sales_by_region_totals(movements), "Sales")
    }

    /// Quantity on hand per product category; unresolved categories land in
    /// `charts.other_category_label`.
    pub fn stock_by_category_totals(&self, stocks: &'a [Stock]) -> CategoryTotals {
        let other = &self.config.charts.other_category_label;
        aggregate_by_category(
            stocks,
            |s| {
                self.resolver
                    .category_name(s)
                    .map_or_else(|| other.clone(), str::to_string)
            },
            |s| s.quantite,
        )
    }

    pub fn stock_by_category(&self, stocks: &'a [Stock]) -> ChartData {
        self.colored(self.stock_by_category_totals(stocks), "Stock")
    }

    /// Sales amount per point of sale, central-depot sales grouped under
    /// `charts.central_depot_label`.
    pub fn sales_by_point_vente(&self, movements: &'a [MouvementStock]) -> ChartData {
        let depot = &self.config.charts.central_depot_label;
        let totals = aggregate_by_category(
            sales(movements),
            |m| {
                self.resolver
                    .point_vente_label(m)
                    .map_or_else(|| depot.clone(), str::to_string)
            },
            |m| m.montant,
        );
        self.colored(totals, "Sales")
    }

    /// Amount per operation type, every type present even when zero.
    ///
    /// Movements with an unrecognized type are left out.
    pub fn movements_by_type(&self, movements: &'a [MouvementStock]) -> ChartData {
        let mut totals = CategoryTotals {
            labels: OperationType::ALL
                .iter()
                .map(|op| op.as_str().to_string())
                .collect(),
            values: vec![Decimal::ZERO; OperationType::ALL.len()],
        };
        for movement in movements {
            let Some(op) = movement.operation else {
                continue;
            };
            if let Some(position) = OperationType::ALL.iter().position(|o| *o == op) {
                totals.values[position] += movement.montant;
            }
        }
        self.colored(totals, "Amount")
    }

    /// Best-selling products by sales amount, highest first.
    ///
    /// Ties keep first-seen order. Sales without a product are skipped.
    pub fn top_products(&self, movements: &'a [MouvementStock], limit: usize) -> ChartData {
        let with_product = sales(movements)
            .filter_map(|m| Some((self.resolver.product_label(m.produit.as_ref())?, m)))
            .collect::<Vec<_>>();
        let totals = aggregate_by_category(
            with_product.iter(),
            |(label, _)| label.to_string(),
            |(_, m)| m.montant,
        );

        let mut ranked: Vec<_> = totals.labels.into_iter().zip(totals.values).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        let (labels, values): (Vec<String>, Vec<Decimal>) = ranked.into_iter().unzip();

        self.colored(CategoryTotals { labels, values }, "Sales")
    }
}

/// Sales per region with default settings
pub fn get_sales_by_region(movements: &[MouvementStock]) -> ChartData {
    let directory = ReferenceDirectory::default();
    let config = AnalyticsConfig::default();
    ChartBuilder::new(&directory, &config).sales_by_region(movements)
}

/// Stock per category with default settings
pub fn get_stock_by_category(stocks: &[Stock]) -> ChartData {
    let directory = ReferenceDirectory::default();
    let config = AnalyticsConfig::default();
    ChartBuilder::new(&directory, &config).stock_by_category(stocks)
}

pub fn get_sales_by_point_vente(movements: &[MouvementStock]) -> ChartData {
    let directory = ReferenceDirectory::default();
    let config = AnalyticsConfig::default();
    ChartBuilder::new(&directory, &config).sales_by_point_vente(movements)
}

pub fn get_movements_by_type(movements: &[MouvementStock]) -> ChartData {
    let directory = ReferenceDirectory::default();
    let config = AnalyticsConfig::default();
    ChartBuilder::new(&directory, &config).movements_by_type(movements)
}

pub fn get_top_products(movements: &[MouvementStock], limit: usize) -> ChartData {
    let directory = ReferenceDirectory::default();
    let config = AnalyticsConfig::default();
    ChartBuilder::new(&directory, &config).top_products(movements, limit)
}
