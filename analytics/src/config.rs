//! Configuration for the analytics engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/analytics.toml, config/{environment}.toml)
//! 3. Environment variable overrides with DASHBOARD_ prefix

use chrono::format::{Item, StrftimeItems};
use config::{ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_REVENUE_LABEL: &str = "Revenue";
const DEFAULT_REVENUE_BORDER_COLOR: &str = "rgb(75, 192, 192)";
const DEFAULT_REVENUE_BACKGROUND_COLOR: &str = "rgba(75, 192, 192, 0.2)";
const DEFAULT_TENSION: f64 = 0.4;
const DEFAULT_UNKNOWN_REGION_LABEL: &str = "Unknown";
const DEFAULT_OTHER_CATEGORY_LABEL: &str = "Other";
const DEFAULT_CENTRAL_DEPOT_LABEL: &str = "Dépôt central";
const DEFAULT_UNIDENTIFIED_POINT_VENTE_LABEL: &str = "Unknown";
const DEFAULT_MONTH_LABEL_FORMAT: &str = "%b %Y";
const DEFAULT_SATURATION: u8 = 70;
const DEFAULT_LIGHTNESS: u8 = 50;

/// Main analytics configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Current environment (development, production)
    pub environment: String,

    /// Chart labels, sentinels and styling hints
    pub charts: ChartConfig,

    /// Entity color generation
    pub colors: ColorConfig,

    /// Region statistics
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    /// Dataset label of the monthly revenue series
    pub revenue_label: String,

    pub revenue_border_color: String,

    pub revenue_background_color: String,

    /// Fill the area under the revenue line
    pub fill: bool,

    /// Bezier curve tension of the revenue line
    pub tension: f64,

    /// Bucket for sales whose region cannot be resolved
    pub unknown_region_label: String,

    /// Bucket for stock whose product category cannot be resolved
    pub other_category_label: String,

    /// Bucket for sales recorded without a point of sale
    pub central_depot_label: String,

    /// chrono format string for month buckets
    pub month_label_format: String,

    pub month_ordering: MonthOrdering,
}

/// Order of month buckets in the revenue series
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthOrdering {
    /// Order in which months first appear in the input
    #[default]
    FirstSeen,
    /// Calendar order
    Chronological,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ColorConfig {
    /// HSL saturation, in percent
    pub saturation: u8,

    /// HSL lightness, in percent
    pub lightness: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    /// Only aggregate movements whose `statut` is set
    pub validated_only: bool,
    /// Breakdown label for a point of sale sent without id or name
    pub unidentified_point_vente_label: String,
}

impl AnalyticsConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("DASHBOARD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("charts.revenue_label", DEFAULT_REVENUE_LABEL)?
            .set_default("charts.revenue_border_color", DEFAULT_REVENUE_BORDER_COLOR)?
            .set_default(
                "charts.revenue_background_color",
                DEFAULT_REVENUE_BACKGROUND_COLOR,
            )?
            .set_default("charts.fill", true)?
            .set_default("charts.tension", DEFAULT_TENSION)?
            .set_default("charts.unknown_region_label", DEFAULT_UNKNOWN_REGION_LABEL)?
            .set_default("charts.other_category_label", DEFAULT_OTHER_CATEGORY_LABEL)?
            .set_default("charts.central_depot_label", DEFAULT_CENTRAL_DEPOT_LABEL)?
            .set_default("charts.month_label_format", DEFAULT_MONTH_LABEL_FORMAT)?
            .set_default("charts.month_ordering", "first_seen")?
            .set_default("colors.saturation", i64::from(DEFAULT_SATURATION))?
            .set_default("colors.lightness", i64::from(DEFAULT_LIGHTNESS))?
            .set_default("stats.validated_only", false)?
            .set_default(
                "stats.unidentified_point_vente_label",
                DEFAULT_UNIDENTIFIED_POINT_VENTE_LABEL,
            )?
            .add_source(File::with_name("config/analytics").required(false))
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DASHBOARD_ prefix)
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            charts: ChartConfig::default(),
            colors: ColorConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            revenue_label: DEFAULT_REVENUE_LABEL.to_string(),
            revenue_border_color: DEFAULT_REVENUE_BORDER_COLOR.to_string(),
            revenue_background_color: DEFAULT_REVENUE_BACKGROUND_COLOR.to_string(),
            fill: true,
            tension: DEFAULT_TENSION,
            unknown_region_label: DEFAULT_UNKNOWN_REGION_LABEL.to_string(),
            other_category_label: DEFAULT_OTHER_CATEGORY_LABEL.to_string(),
            central_depot_label: DEFAULT_CENTRAL_DEPOT_LABEL.to_string(),
            month_label_format: DEFAULT_MONTH_LABEL_FORMAT.to_string(),
            month_ordering: MonthOrdering::default(),
        }
    }
}

impl ChartConfig {
    /// Month label format, falling back to the default when the configured
    /// one is not a valid strftime pattern
    pub fn month_format(&self) -> &str {
        let valid = StrftimeItems::new(&self.month_label_format)
            .all(|item| !matches!(item, Item::Error));
        if valid {
            &self.month_label_format
        } else {
            tracing::warn!(
                format = %self.month_label_format,
                "Invalid month label format, using default"
            );
            DEFAULT_MONTH_LABEL_FORMAT
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            validated_only: false,
            unidentified_point_vente_label: DEFAULT_UNIDENTIFIED_POINT_VENTE_LABEL.to_string(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            saturation: DEFAULT_SATURATION,
            lightness: DEFAULT_LIGHTNESS,
        }
    }
}
