//! Capital plan orchestration: grids, pricing, summary and validation.

use super::allocation::{first_action_cost, AllocationTable};
use super::error::InvalidConfiguration;
use super::grid::{build_grid, Floor, PriceRange};
use super::pricing::{price_zone, ZonePricing};
use crate::utils::decimal::{round_to_precision, safe_div, to_minor_units};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Smallest remaining balance (in minor units) a plan must keep.
const MIN_REMAINING_FUNDS: Decimal = Decimal::ONE;

/// Inputs for a single capital plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// Price at which the strategy is started
    pub first_action_price: Decimal,
    /// Lowest boundary the asset must not hit
    pub min_price: Decimal,
    /// Upper boundary of the grid
    pub max_price: Decimal,
    /// Units of the underlying per lot (broker specification)
    pub contract_size: Decimal,
    /// Fixed lot per Fund A zone
    pub lot_size_fund_a: Decimal,
    /// Fixed lot per Fund B zone
    pub lot_size_fund_b: Decimal,
    pub num_zone_fund_a: u32,
    pub num_zone_fund_b: u32,
    /// Account balance in major currency units
    pub balance: Decimal,
    /// Decimal places the instrument is quoted with
    pub asset_digit: u32,
}

impl PlanParams {
    pub fn price_range(&self) -> PriceRange {
        PriceRange::new(self.min_price, self.max_price)
    }

    fn check_preconditions(&self) -> Result<(), InvalidConfiguration> {
        if self.first_action_price <= Decimal::ZERO {
            return Err(InvalidConfiguration::FirstActionPriceNotPositive {
                first_action_price: self.first_action_price,
            });
        }

        if self.min_price < Decimal::ZERO || self.min_price >= self.max_price {
            return Err(InvalidConfiguration::InvalidPriceRange {
                min: self.min_price,
                max: self.max_price,
            });
        }

        if self.num_zone_fund_a == 0 {
            return Err(InvalidConfiguration::InvalidZoneCount { fund: "fundA" });
        }
        if self.num_zone_fund_b == 0 {
            return Err(InvalidConfiguration::InvalidZoneCount { fund: "fundB" });
        }

        for (field, value) in [
            ("contract_size", self.contract_size),
            ("lot_size_fund_a", self.lot_size_fund_a),
            ("lot_size_fund_b", self.lot_size_fund_b),
            ("balance", self.balance),
        ] {
            if value <= Decimal::ZERO {
                return Err(InvalidConfiguration::NonPositive { field, value });
            }
        }

        Ok(())
    }
}

/// Headline figures of a plan. Money is in minor currency units (USC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Capital committed by every zone at or above the first action price
    pub first_action_cost: Decimal,
    pub balance_cents: Decimal,
    /// Cost of the whole grid, i.e. the worst-case drawdown commitment
    pub used_funds: Decimal,
    pub remaining_funds: Decimal,
    pub total_fund_a_cost: Decimal,
    pub total_fund_b_cost: Decimal,
    pub lot_size_fund_a: Decimal,
    pub lot_size_fund_b: Decimal,
}

impl RunSummary {
    /// Share of the balance consumed by the full grid, in percent.
    pub fn utilization_pct(&self) -> Decimal {
        safe_div(self.used_funds, self.balance_cents) * dec!(100)
    }
}

/// A complete, internally consistent capital plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalPlan {
    pub fund_a: ZonePricing,
    pub fund_b: ZonePricing,
    pub allocation: AllocationTable,
    pub summary: RunSummary,
}

impl CapitalPlan {
    pub fn grid_a(&self) -> &[Decimal] {
        &self.fund_a.levels
    }

    pub fn grid_b(&self) -> &[Decimal] {
        &self.fund_b.levels
    }
}

/// Build the two-tier grid and the capital it needs.
///
/// Fund B is laid over `num_zone_fund_a + num_zone_fund_b` divisions so its
/// density is relative to the combined grid, then any level Fund A already
/// owns is removed.
pub fn compute_capital_plan(params: &PlanParams) -> Result<CapitalPlan, InvalidConfiguration> {
    params.check_preconditions()?;

    let range = params.price_range();
    let digits = params.asset_digit;

    let grid_a = build_grid(&range, params.num_zone_fund_a, digits, Floor::Keep, &[]);
    let grid_b = build_grid(
        &range,
        params.num_zone_fund_a + params.num_zone_fund_b,
        digits,
        Floor::Drop,
        &grid_a,
    );

    let fund_a = price_zone(grid_a, params.contract_size, params.lot_size_fund_a);
    let fund_b = price_zone(grid_b, params.contract_size, params.lot_size_fund_b);

    let allocation = AllocationTable::merge(&fund_a, &fund_b);
    let first_action_cost = first_action_cost(params.first_action_price, &allocation, digits);

    let balance_cents = to_minor_units(params.balance);
    let used_funds = fund_a.total + fund_b.total;
    let remaining_funds = round_to_precision(balance_cents - used_funds, digits);

    debug!(
        zones_a = fund_a.len(),
        zones_b = fund_b.len(),
        %first_action_cost,
        %balance_cents,
        %used_funds,
        %remaining_funds,
        "Computed capital plan"
    );

    if first_action_cost <= Decimal::ZERO {
        return Err(InvalidConfiguration::FirstActionPriceAboveTopZone {
            first_action_price: params.first_action_price,
            top_zone: allocation.top_level(),
        });
    }

    if remaining_funds <= MIN_REMAINING_FUNDS {
        return Err(InvalidConfiguration::InsufficientFunds {
            balance_cents,
            used_funds,
            remaining_funds,
        });
    }

    let summary = RunSummary {
        first_action_cost,
        balance_cents,
        used_funds,
        remaining_funds,
        total_fund_a_cost: fund_a.total,
        total_fund_b_cost: fund_b.total,
        lot_size_fund_a: params.lot_size_fund_a,
        lot_size_fund_b: params.lot_size_fund_b,
    };

    Ok(CapitalPlan {
        fund_a,
        fund_b,
        allocation,
        summary,
    })
}
