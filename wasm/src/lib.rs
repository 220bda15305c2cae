//! WebAssembly module for the stock dashboard
//!
//! Provides client-side computation for:
//! - Role-scoped region statistics
//! - Chart-ready series (revenue, sales, stock, operation types)
//! - Dashboard KPIs and legend colors
//!
//! Every entry point takes and returns JSON strings. Optional
//! `references_json` carries the regions, points of sale, products and
//! categories needed to resolve records that only hold ids. Records that do
//! not parse are skipped; only a payload that is not a JSON array fails.

use std::io;

use analytics::config::ColorConfig;
use analytics::{
    compute_kpis, parse_records, AnalyticsConfig, AnalyticsError, AnalyticsResult, ChartBuilder,
    ChartData, EntityColorRegistry, ReferenceDirectory, RoleScopedStatsEngine,
};
use serde::{Deserialize, Serialize};
use shared::{Categorie, MouvementStock, PointVente, Produit, Region, Role, Stock};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;

/// Reference records shipped alongside movements and stocks
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceData {
    pub regions: Vec<Region>,
    pub points_vente: Vec<PointVente>,
    pub produits: Vec<Produit>,
    pub categories: Vec<Categorie>,
}

impl ReferenceData {
    fn into_directory(self) -> ReferenceDirectory {
        ReferenceDirectory::new()
            .with_regions(&self.regions)
            .with_points_vente(&self.points_vente)
            .with_produits(&self.produits)
            .with_categories(&self.categories)
    }
}

fn parse_directory(references_json: Option<&str>) -> AnalyticsResult<ReferenceDirectory> {
    match references_json {
        Some(json) if !json.trim().is_empty() => {
            let data: ReferenceData = serde_json::from_str(json)?;
            Ok(data.into_directory())
        }
        _ => Ok(ReferenceDirectory::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> AnalyticsResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn to_js_error(err: AnalyticsError) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(&err.to_string())
}

/// Tracing writer that hands each formatted event to `emit` line by line
#[derive(Debug, Clone, Copy)]
pub struct ConsoleMakeWriter {
    emit: fn(&str),
}

impl ConsoleMakeWriter {
    pub fn new(emit: fn(&str)) -> Self {
        Self { emit }
    }
}

pub struct ConsoleWriter {
    buffer: Vec<u8>,
    emit: fn(&str),
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            buffer: Vec::new(),
            emit: self.emit,
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let text = String::from_utf8_lossy(&self.buffer);
        for line in text.lines().filter(|line| !line.is_empty()) {
            (self.emit)(line);
        }
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[cfg(target_arch = "wasm32")]
fn console_log(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

/// Build one movement chart from JSON input
fn movement_chart<F>(
    records_json: &str,
    references_json: Option<&str>,
    build: F,
) -> AnalyticsResult<String>
where
    F: for<'a> FnOnce(&ChartBuilder<'a>, &'a [MouvementStock]) -> ChartData,
{
    let records = parse_records::<MouvementStock>(records_json)?.records;
    let directory = parse_directory(references_json)?;
    let config = AnalyticsConfig::default();
    let builder = ChartBuilder::new(&directory, &config);
    to_json(&build(&builder, &records))
}

// ============================================================================
// JSON halves
// ============================================================================

pub fn region_stats_json(
    records_json: &str,
    role: &str,
    region_json: Option<&str>,
    references_json: Option<&str>,
) -> AnalyticsResult<String> {
    let role: Role = role.parse()?;
    let records = parse_records::<MouvementStock>(records_json)?.records;
    let region: Option<Region> = match region_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
        _ => None,
    };
    let directory = parse_directory(references_json)?;
    let config = AnalyticsConfig::default();

    let stats = RoleScopedStatsEngine::new(&directory, &config.stats).compute_region_stats(
        &records,
        role,
        region.as_ref(),
    );
    to_json(&stats)
}

pub fn stock_by_category_json(
    stocks_json: &str,
    references_json: Option<&str>,
) -> AnalyticsResult<String> {
    let stocks = parse_records::<Stock>(stocks_json)?.records;
    let directory = parse_directory(references_json)?;
    let config = AnalyticsConfig::default();
    to_json(&ChartBuilder::new(&directory, &config).stock_by_category(&stocks))
}

pub fn dashboard_kpis_json(records_json: &str, stocks_json: &str) -> AnalyticsResult<String> {
    let records = parse_records::<MouvementStock>(records_json)?.records;
    let stocks = parse_records::<Stock>(stocks_json)?.records;
    to_json(&compute_kpis(&records, &stocks))
}

pub fn color_map_json(ids_json: &str) -> AnalyticsResult<String> {
    let ids: Vec<String> = serde_json::from_str(ids_json)?;
    let registry = EntityColorRegistry::from_entities(&ColorConfig::default(), &ids);
    to_json(&registry.get_map())
}

// ============================================================================
// WASM exports
// ============================================================================

/// Initialize the WASM module: route engine logs to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    analytics::telemetry::init_tracing_with_writer(
        analytics::telemetry::DEFAULT_FILTER,
        ConsoleMakeWriter::new(console_log),
    );
}

/// Region statistics visible to `role`
#[wasm_bindgen]
pub fn compute_region_stats(
    records_json: &str,
    role: &str,
    region_json: Option<String>,
    references_json: Option<String>,
) -> Result<String, JsValue> {
    region_stats_json(
        records_json,
        role,
        region_json.as_deref(),
        references_json.as_deref(),
    )
    .map_err(to_js_error)
}

/// Monthly revenue line chart
#[wasm_bindgen]
pub fn ca_by_month(records_json: &str, references_json: Option<String>) -> Result<String, JsValue> {
    movement_chart(records_json, references_json.as_deref(), |b, m| {
        b.ca_by_month(m)
    })
    .map_err(to_js_error)
}

/// Sales per region
#[wasm_bindgen]
pub fn sales_by_region(
    records_json: &str,
    references_json: Option<String>,
) -> Result<String, JsValue> {
    movement_chart(records_json, references_json.as_deref(), |b, m| {
        b.sales_by_region(m)
    })
    .map_err(to_js_error)
}

/// Stock quantity per product category
#[wasm_bindgen]
pub fn stock_by_category(
    stocks_json: &str,
    references_json: Option<String>,
) -> Result<String, JsValue> {
    stock_by_category_json(stocks_json, references_json.as_deref()).map_err(to_js_error)
}

/// Sales per point of sale
#[wasm_bindgen]
pub fn sales_by_point_vente(
    records_json: &str,
    references_json: Option<String>,
) -> Result<String, JsValue> {
    movement_chart(records_json, references_json.as_deref(), |b, m| {
        b.sales_by_point_vente(m)
    })
    .map_err(to_js_error)
}

/// Amount per operation type
#[wasm_bindgen]
pub fn movements_by_type(
    records_json: &str,
    references_json: Option<String>,
) -> Result<String, JsValue> {
    movement_chart(records_json, references_json.as_deref(), |b, m| {
        b.movements_by_type(m)
    })
    .map_err(to_js_error)
}

/// Best-selling products, at most `limit`
#[wasm_bindgen]
pub fn top_products(
    records_json: &str,
    limit: usize,
    references_json: Option<String>,
) -> Result<String, JsValue> {
    movement_chart(records_json, references_json.as_deref(), |b, m| {
        b.top_products(m, limit)
    })
    .map_err(to_js_error)
}

/// Headline KPIs
#[wasm_bindgen]
pub fn dashboard_kpis(records_json: &str, stocks_json: &str) -> Result<String, JsValue> {
    dashboard_kpis_json(records_json, stocks_json).map_err(to_js_error)
}

/// Legend colors for `ids`, assigned in the given order
#[wasm_bindgen]
pub fn color_map(ids_json: &str) -> Result<String, JsValue> {
    color_map_json(ids_json).map_err(to_js_error)
}
