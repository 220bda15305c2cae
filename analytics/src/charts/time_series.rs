//! Monthly revenue series

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use shared::{MouvementStock, OperationType};

use super::{aggregate_by_category, to_chart_value, ChartBuilder, ChartData, ColorHint, Dataset};
use crate::config::{AnalyticsConfig, MonthOrdering};
use crate::resolve::ReferenceDirectory;

impl<'a> ChartBuilder<'a> {
    /// Revenue (`Vente` amounts) per month.
    ///
    /// Months are labelled with `charts.month_label_format`. Sales without a
    /// creation date have no month and are skipped.
    pub fn ca_by_month(&self, movements: &'a [MouvementStock]) -> ChartData {
        let charts = &self.config.charts;
        let format = charts.month_format();
        let mut first_day: HashMap<String, (i32, u32)> = HashMap::new();

        let sales = movements.iter().filter(|m| m.is_operation(OperationType::Vente));
        let dated = sales.filter_map(|m| m.created_at.map(|at| (m, at)));
        let buckets: Vec<_> = dated
            .map(|(m, at)| {
                let label = at.format(format).to_string();
                let month = (at.year(), at.month());
                first_day
                    .entry(label.clone())
                    .and_modify(|seen| *seen = (*seen).min(month))
                    .or_insert(month);
                (label, m)
            })
            .collect();

        let mut totals = aggregate_by_category(
            buckets.iter(),
            |(label, _)| label.clone(),
            |(_, m)| m.montant,
        );

        if charts.month_ordering == MonthOrdering::Chronological {
            let mut pairs: Vec<_> = totals.labels.into_iter().zip(totals.values).collect();
            pairs.sort_by_key(|(label, _)| first_day.get(label).copied());
            let (labels, values): (Vec<String>, Vec<Decimal>) = pairs.into_iter().unzip();
            totals.labels = labels;
            totals.values = values;
        }

        tracing::debug!(months = totals.labels.len(), "Built monthly revenue series");

        ChartData {
            labels: totals.labels,
            datasets: vec![Dataset {
                label: charts.revenue_label.clone(),
                data: totals.values.iter().map(to_chart_value).collect(),
                border_color: Some(ColorHint::Single(charts.revenue_border_color.clone())),
                background_color: Some(ColorHint::Single(
                    charts.revenue_background_color.clone(),
                )),
                fill: Some(charts.fill),
                tension: Some(charts.tension),
            }],
        }
    }
}

/// Monthly revenue with default settings
pub fn get_ca_by_month(movements: &[MouvementStock]) -> ChartData {
    let directory = ReferenceDirectory::default();
    let config = AnalyticsConfig::default();
    ChartBuilder::new(&directory, &config).ca_by_month(movements)
}
