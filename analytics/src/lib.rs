//! Analytics engine for the stock dashboard
//!
//! Turns movement and stock records into:
//! - role-scoped region statistics ([`stats`])
//! - chart-ready series and categorical breakdowns ([`charts`])
//! - stable legend colors ([`colors`])
//! - headline KPIs ([`kpi`])
//!
//! Everything here is synchronous and pure over in-memory slices.

pub mod charts;
pub mod colors;
pub mod config;
pub mod error;
pub mod kpi;
pub mod records;
pub mod resolve;
pub mod stats;
pub mod telemetry;

pub use charts::{
    aggregate_by_category, get_ca_by_month, get_movements_by_type, get_sales_by_point_vente,
    get_sales_by_region, get_stock_by_category, get_top_products, CategoryTotals, ChartBuilder,
    ChartData, ColorHint, Dataset,
};
pub use colors::EntityColorRegistry;
pub use config::{AnalyticsConfig, MonthOrdering};
pub use error::{AnalyticsError, AnalyticsResult};
pub use kpi::{compute_kpis, DashboardKpis};
pub use records::{parse_records, ParsedBatch};
pub use resolve::{PointVenteKey, ReferenceDirectory, RegionKey, Resolver};
pub use stats::{
    compute_region_stats, ExclusionReport, OperationTotals, PointVenteStats, RegionBreakdown,
    RegionRollup, RegionStats, RoleScopedStatsEngine, StatsReport,
};
