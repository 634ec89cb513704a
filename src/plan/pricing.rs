//! Zone pricing by contract specification.

use crate::utils::decimal::CENT_MULTIPLIER;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced grid: every level with the capital it consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePricing {
    /// Price levels, descending
    pub levels: Vec<Decimal>,
    /// Cost of opening the tier's position at each level, in minor units
    pub costs: Vec<Decimal>,
    /// Sum of `costs`
    pub total: Decimal,
    /// Fixed position size used for every level of this tier
    pub lot_size: Decimal,
}

impl ZonePricing {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate `(level, cost)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Decimal, Decimal)> + '_ {
        self.levels.iter().copied().zip(self.costs.iter().copied())
    }
}

/// Cost of one zone: `level × contract_size × lot_size × multiplier`.
pub fn level_cost(
    level: Decimal,
    contract_size: Decimal,
    lot_size: Decimal,
    multiplier: Decimal,
) -> Decimal {
    level * contract_size * lot_size * multiplier
}

/// Price every level in minor currency units.
pub fn price_zone(levels: Vec<Decimal>, contract_size: Decimal, lot_size: Decimal) -> ZonePricing {
    price_zone_with_multiplier(levels, contract_size, lot_size, CENT_MULTIPLIER)
}

/// Price every level with an explicit currency multiplier.
pub fn price_zone_with_multiplier(
    levels: Vec<Decimal>,
    contract_size: Decimal,
    lot_size: Decimal,
    multiplier: Decimal,
) -> ZonePricing {
    let costs: Vec<Decimal> = levels
        .iter()
        .map(|level| level_cost(*level, contract_size, lot_size, multiplier))
        .collect();
    let total: Decimal = costs.iter().sum();

    ZonePricing {
        levels,
        costs,
        total,
        lot_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_zone_in_cents() {
        // contract 10, lot 0.02 -> 20 USC per unit of price
        let pricing = price_zone(vec![dec!(75), dec!(50), dec!(25), dec!(1)], dec!(10), dec!(0.02));

        assert_eq!(
            pricing.costs,
            vec![dec!(1500), dec!(1000), dec!(500), dec!(20)]
        );
        assert_eq!(pricing.total, dec!(3020));
        assert_eq!(pricing.lot_size, dec!(0.02));
    }

    #[test]
    fn test_fractional_levels_sum_exactly() {
        let pricing = price_zone(
            vec![dec!(91.67), dec!(83.33), dec!(16.67), dec!(9.33)],
            dec!(10),
            dec!(0.01),
        );
        assert_eq!(pricing.total, dec!(2010));
    }

    #[test]
    fn test_custom_multiplier() {
        let pricing = price_zone_with_multiplier(vec![dec!(1.2345)], dec!(100000), dec!(0.01), Decimal::ONE);
        assert_eq!(pricing.total, dec!(1234.5));
    }

    #[test]
    fn test_empty_levels() {
        let pricing = price_zone(Vec::new(), dec!(10), dec!(0.01));
        assert!(pricing.is_empty());
        assert_eq!(pricing.total, Decimal::ZERO);
        assert_eq!(pricing.iter().count(), 0);
    }
}
