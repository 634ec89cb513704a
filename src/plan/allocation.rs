//! The merged, price-ordered allocation table.

use super::pricing::ZonePricing;
use crate::utils::decimal::round_to_precision;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier a zone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundType {
    /// Wide, low-frequency zones with the larger lot
    #[serde(rename = "fundA")]
    FundA,
    /// Tight, high-frequency zones with the smaller lot
    #[serde(rename = "fundB")]
    FundB,
}

impl FundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundType::FundA => "fundA",
            FundType::FundB => "fundB",
        }
    }
}

impl fmt::Display for FundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the capital plan: "if price reaches `price_level`, invest
/// `cost_per_level` at `position_size`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLevel {
    pub index: usize,
    pub price_level: Decimal,
    pub cost_per_level: Decimal,
    pub fund_type: FundType,
    pub position_size: Decimal,
}

/// Both tiers merged and sorted by price, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    rows: Vec<ZoneLevel>,
}

impl AllocationTable {
    /// Merge two priced tiers into one table ordered by price descending.
    ///
    /// The sort is stable, so a Fund A row precedes a Fund B row at the same
    /// price.
    pub fn merge(fund_a: &ZonePricing, fund_b: &ZonePricing) -> Self {
        let mut rows: Vec<ZoneLevel> = Self::tier_rows(fund_a, FundType::FundA)
            .chain(Self::tier_rows(fund_b, FundType::FundB))
            .collect();

        rows.sort_by(|a, b| b.price_level.cmp(&a.price_level));
        for (index, row) in rows.iter_mut().enumerate() {
            row.index = index;
        }

        Self { rows }
    }

    fn tier_rows(pricing: &ZonePricing, fund_type: FundType) -> impl Iterator<Item = ZoneLevel> + '_ {
        pricing.iter().map(move |(price_level, cost_per_level)| ZoneLevel {
            index: 0,
            price_level,
            cost_per_level,
            fund_type,
            position_size: pricing.lot_size,
        })
    }

    pub fn rows(&self) -> &[ZoneLevel] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest zone in the table.
    pub fn top_level(&self) -> Option<Decimal> {
        self.rows.first().map(|row| row.price_level)
    }

    /// Sum of every row's cost.
    pub fn total_cost(&self) -> Decimal {
        self.rows.iter().map(|row| row.cost_per_level).sum()
    }

    /// Rows belonging to one tier, in table order.
    pub fn rows_for(&self, fund_type: FundType) -> impl Iterator<Item = &ZoneLevel> {
        self.rows.iter().filter(move |row| row.fund_type == fund_type)
    }

    /// Rows already triggered when the strategy starts at `price`.
    pub fn triggered_at(&self, price: Decimal) -> impl Iterator<Item = &ZoneLevel> {
        self.rows.iter().filter(move |row| row.price_level >= price)
    }
}

/// Capital committed immediately when starting at `first_action_price`.
///
/// Every zone at or above the entry price is already behind it.
pub fn first_action_cost(
    first_action_price: Decimal,
    table: &AllocationTable,
    asset_digit: u32,
) -> Decimal {
    let committed: Decimal = table
        .triggered_at(first_action_price)
        .map(|row| row.cost_per_level)
        .sum();
    round_to_precision(committed, asset_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::pricing::price_zone;
    use rust_decimal_macros::dec;

    fn sample_table() -> AllocationTable {
        let fund_a = price_zone(vec![dec!(75), dec!(50), dec!(25), dec!(1)], dec!(10), dec!(0.02));
        let fund_b = price_zone(
            vec![dec!(91.67), dec!(83.33), dec!(66.67), dec!(9.33)],
            dec!(10),
            dec!(0.01),
        );
        AllocationTable::merge(&fund_a, &fund_b)
    }

    #[test]
    fn test_merge_sorts_descending_and_reindexes() {
        let table = sample_table();

        let prices: Vec<Decimal> = table.rows().iter().map(|r| r.price_level).collect();
        assert_eq!(
            prices,
            vec![
                dec!(91.67),
                dec!(83.33),
                dec!(75),
                dec!(66.67),
                dec!(50),
                dec!(25),
                dec!(9.33),
                dec!(1),
            ]
        );

        for (i, row) in table.rows().iter().enumerate() {
            assert_eq!(row.index, i);
        }
        assert_eq!(table.top_level(), Some(dec!(91.67)));
    }

    #[test]
    fn test_rows_carry_fund_and_position_size() {
        let table = sample_table();

        let row = &table.rows()[2];
        assert_eq!(row.fund_type, FundType::FundA);
        assert_eq!(row.position_size, dec!(0.02));
        assert_eq!(row.cost_per_level, dec!(1500));

        assert_eq!(table.rows_for(FundType::FundA).count(), 4);
        assert!(table
            .rows_for(FundType::FundB)
            .all(|r| r.position_size == dec!(0.01)));
    }

    #[test]
    fn test_total_cost_matches_tiers() {
        let table = sample_table();
        // 3020 (fund A) + 2510 (fund B)
        assert_eq!(table.total_cost(), dec!(5530));
    }

    #[test]
    fn test_first_action_cost_includes_equal_level() {
        let table = sample_table();
        // 916.7 + 833.3 + 1500
        assert_eq!(first_action_cost(dec!(75), &table, 2), dec!(3250));
        assert_eq!(first_action_cost(dec!(73), &table, 2), dec!(3250));
        assert_eq!(first_action_cost(dec!(92), &table, 2), Decimal::ZERO);
    }

    #[test]
    fn test_first_action_cost_is_rounded() {
        let fund_a = price_zone(vec![dec!(1.23456)], dec!(1), dec!(0.01));
        let table = AllocationTable::merge(&fund_a, &price_zone(Vec::new(), dec!(1), dec!(0.01)));
        assert_eq!(first_action_cost(dec!(1), &table, 2), dec!(1.23));
    }

    #[test]
    fn test_fund_type_serializes_as_camel_case() {
        assert_eq!(serde_json::to_string(&FundType::FundA).unwrap(), "\"fundA\"");
        assert_eq!(serde_json::to_string(&FundType::FundB).unwrap(), "\"fundB\"");
        assert_eq!(FundType::FundB.to_string(), "fundB");
    }
}
