//! Configuration management for the grid capital planner.
//!
//! Loads settings from an optional config file and environment variables.

use crate::plan::PlanParams;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Instrument contract specifics
    #[serde(default)]
    pub instrument: InstrumentConfig,
    /// Grid boundaries, zone counts and lot sizes
    #[serde(default)]
    pub grid: GridConfig,
    /// Account balance and entry point
    #[serde(default)]
    pub account: AccountConfig,
    /// Chart overlay settings
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Display symbol (e.g., "CL=F" for crude oil futures)
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Units of the underlying per lot; check the broker's contract spec
    #[serde(default = "default_contract_size")]
    pub contract_size: Decimal,
    /// Decimal places the instrument is quoted with
    #[serde(default = "default_asset_digit")]
    pub asset_digit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Last buy zone boundary; 0 for a close system on strong fundamentals
    #[serde(default = "default_min_price")]
    pub min_price: Decimal,
    /// Maximum boundary for the long-biased grid
    #[serde(default = "default_max_price")]
    pub max_price: Decimal,
    #[serde(default = "default_num_zone_fund_a")]
    pub num_zone_fund_a: u32,
    #[serde(default = "default_num_zone_fund_b")]
    pub num_zone_fund_b: u32,
    #[serde(default = "default_lot_size_fund_a")]
    pub lot_size_fund_a: Decimal,
    #[serde(default = "default_lot_size_fund_b")]
    pub lot_size_fund_b: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Balance in USD; converted to USC inside the engine
    #[serde(default = "default_balance")]
    pub balance: Decimal,
    /// Price at which the strategy is started
    #[serde(default = "default_first_action_price")]
    pub first_action_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Span of the EMA trend line
    #[serde(default = "default_ema_length")]
    pub ema_length: usize,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

/// Accepted EMA spans.
pub const EMA_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 10..=500;

/// Largest number of decimal places a price can carry.
const MAX_ASSET_DIGIT: u32 = 28;

// Default value functions
fn default_symbol() -> String {
    "CL=F".to_string()
}

fn default_contract_size() -> Decimal {
    Decimal::new(10, 0)
}

fn default_asset_digit() -> u32 {
    3
}

fn default_min_price() -> Decimal {
    Decimal::ZERO
}

fn default_max_price() -> Decimal {
    Decimal::new(100, 0)
}

fn default_num_zone_fund_a() -> u32 {
    10
}

fn default_num_zone_fund_b() -> u32 {
    20
}

fn default_lot_size_fund_a() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_lot_size_fund_b() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_balance() -> Decimal {
    Decimal::new(200, 0) // 200 USD
}

fn default_first_action_price() -> Decimal {
    Decimal::new(73, 0)
}

fn default_ema_length() -> usize {
    200
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    800
}

impl Config {
    /// Load configuration from `config.*` in the working directory and
    /// `GCP__`-prefixed environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => config::File::with_name(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::default().separator("__").prefix("GCP"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values at the input boundary.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.account.first_action_price > Decimal::ZERO,
            "first_action_price must be positive"
        );

        anyhow::ensure!(
            self.grid.min_price >= Decimal::ZERO && self.grid.min_price < self.grid.max_price,
            "min_price must be >= 0 and below max_price"
        );

        anyhow::ensure!(
            self.instrument.contract_size > Decimal::ZERO,
            "contract_size must be positive"
        );

        anyhow::ensure!(
            self.grid.lot_size_fund_a > Decimal::ZERO && self.grid.lot_size_fund_b > Decimal::ZERO,
            "lot sizes must be positive"
        );

        anyhow::ensure!(
            self.grid.num_zone_fund_a >= 1 && self.grid.num_zone_fund_b >= 1,
            "zone counts must be at least 1"
        );

        anyhow::ensure!(
            self.account.balance > Decimal::ZERO,
            "balance must be positive"
        );

        anyhow::ensure!(
            self.instrument.asset_digit <= MAX_ASSET_DIGIT,
            "asset_digit must be at most {}",
            MAX_ASSET_DIGIT
        );

        anyhow::ensure!(
            EMA_LENGTH_RANGE.contains(&self.chart.ema_length),
            "ema_length must be between {} and {}",
            EMA_LENGTH_RANGE.start(),
            EMA_LENGTH_RANGE.end()
        );

        Ok(())
    }

    /// Engine parameters for this configuration.
    pub fn plan_params(&self) -> PlanParams {
        PlanParams {
            first_action_price: self.account.first_action_price,
            min_price: self.grid.min_price,
            max_price: self.grid.max_price,
            contract_size: self.instrument.contract_size,
            lot_size_fund_a: self.grid.lot_size_fund_a,
            lot_size_fund_b: self.grid.lot_size_fund_b,
            num_zone_fund_a: self.grid.num_zone_fund_a,
            num_zone_fund_b: self.grid.num_zone_fund_b,
            balance: self.account.balance,
            asset_digit: self.instrument.asset_digit,
        }
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            contract_size: default_contract_size(),
            asset_digit: default_asset_digit(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_price: default_min_price(),
            max_price: default_max_price(),
            num_zone_fund_a: default_num_zone_fund_a(),
            num_zone_fund_b: default_num_zone_fund_b(),
            lot_size_fund_a: default_lot_size_fund_a(),
            lot_size_fund_b: default_lot_size_fund_b(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            balance: default_balance(),
            first_action_price: default_first_action_price(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            ema_length: default_ema_length(),
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}
