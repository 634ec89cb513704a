//! # Grid Capital Planner
//!
//! Computes the minimum capital a two-tier grid-trading strategy needs and
//! describes the resulting zones for charting against price history.
//!
//! ## Architecture
//!
//! - `plan`: Grid allocation engine (grids, zone pricing, capital plan)
//! - `config`: Configuration management and validation
//! - `market`: Close-price series loading and EMA trend for display
//! - `chart`: Renderer-agnostic chart overlay of the plan's zones
//! - `report`: Text summary, table rendering and CSV/JSON export
//! - `utils`: Shared utilities and decimal arithmetic

pub mod chart;
pub mod config;
pub mod market;
pub mod plan;
pub mod report;
pub mod utils;

pub use config::Config;
pub use plan::{compute_capital_plan, CapitalPlan, InvalidConfiguration, PlanParams};
