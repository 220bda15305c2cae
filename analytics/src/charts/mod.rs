//! Chart-ready data builders
//!
//! Output mirrors the Chart.js `data` object: parallel `labels` and dataset
//! `data` arrays plus inline styling hints.

mod categorical;
mod time_series;

pub use categorical::*;
pub use time_series::*;

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::colors::EntityColorRegistry;
use crate::config::AnalyticsConfig;
use crate::resolve::{ReferenceDirectory, Resolver};

/// A color hint: one color for the whole dataset or one per label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorHint {
    Single(String),
    PerLabel(Vec<String>),
}

/// One series of a chart
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// Chart.js compatible chart data
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Color every label through `registry` and set the per-label colors on
    /// each dataset.
    pub fn apply_colors(&mut self, registry: &mut EntityColorRegistry) {
        let colors: Vec<String> = self
            .labels
            .iter()
            .map(|label| registry.get_color(label))
            .collect();
        for dataset in &mut self.datasets {
            dataset.background_color = Some(ColorHint::PerLabel(colors.clone()));
        }
    }

    /// Data of the first dataset
    pub fn values(&self) -> &[f64] {
        self.datasets.first().map(|d| d.data.as_slice()).unwrap_or(&[])
    }

    /// Value of `label` in the first dataset
    pub fn value_of(&self, label: &str) -> Option<f64> {
        let position = self.labels.iter().position(|l| l == label)?;
        self.datasets.first()?.data.get(position).copied()
    }
}

/// Category labels with their summed values, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CategoryTotals {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

impl CategoryTotals {
    pub fn get(&self, label: &str) -> Option<Decimal> {
        let position = self.labels.iter().position(|l| l == label)?;
        self.values.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Single-dataset chart of these totals
    pub fn into_chart(self, dataset_label: &str) -> ChartData {
        let data = self.values.iter().map(to_chart_value).collect();
        ChartData {
            labels: self.labels,
            datasets: vec![Dataset {
                label: dataset_label.to_string(),
                data,
                ..Default::default()
            }],
        }
    }
}

pub(crate) fn to_chart_value(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Group `records` by `category_key` and sum `value` per category.
///
/// Labels keep the order in which they are first produced.
pub fn aggregate_by_category<'r, T, I, K, V>(
    records: I,
    mut category_key: K,
    mut value: V,
) -> CategoryTotals
where
    T: 'r,
    I: IntoIterator<Item = &'r T>,
    K: FnMut(&'r T) -> String,
    V: FnMut(&'r T) -> Decimal,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals = CategoryTotals::default();

    for record in records {
        let key = category_key(record);
        let amount = value(record);
        match index.get(&key) {
            Some(position) => totals.values[*position] += amount,
            None => {
                index.insert(key.clone(), totals.labels.len());
                totals.labels.push(key);
                totals.values.push(amount);
            }
        }
    }

    totals
}

/// Builds chart data from movements and stocks with a shared configuration
/// and reference directory.
///
/// Every chart gets its own [`EntityColorRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct ChartBuilder<'a> {
    resolver: Resolver<'a>,
    config: &'a AnalyticsConfig,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(directory: &'a ReferenceDirectory, config: &'a AnalyticsConfig) -> Self {
        Self {
            resolver: Resolver::new(directory),
            config,
        }
    }

    fn registry(&self) -> EntityColorRegistry {
        EntityColorRegistry::new(&self.config.colors)
    }

    fn colored(&self, totals: CategoryTotals, dataset_label: &str) -> ChartData {
        let mut chart = totals.into_chart(dataset_label);
        chart.apply_colors(&mut self.registry());
        chart
    }
}
