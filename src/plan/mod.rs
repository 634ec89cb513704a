//! Grid allocation engine.
//!
//! Pure, stateless calculation of the capital a two-tier grid needs:
//! - Fund A: wide, low-frequency zones with the larger lot
//! - Fund B: tight, high-frequency zones laid over the combined zone count,
//!   minus every level Fund A already owns
//!
//! All money is tracked in minor currency units (USC) as exact decimals.

mod allocation;
mod engine;
mod error;
mod grid;
mod pricing;

pub use allocation::{first_action_cost, AllocationTable, FundType, ZoneLevel};
pub use engine::{compute_capital_plan, CapitalPlan, PlanParams, RunSummary};
pub use error::InvalidConfiguration;
pub use grid::{build_grid, last_zone_bump, Floor, PriceRange};
pub use pricing::{level_cost, price_zone, price_zone_with_multiplier, ZonePricing};
