//! Price grid generation for the two fund tiers.

use crate::utils::decimal::{price_step, round_to_precision};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Top-of-grid price above which the last zone is bumped by a whole unit.
const WHOLE_UNIT_BUMP_THRESHOLD: Decimal = dec!(2);

/// Closed price interval the grid is laid over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest boundary the asset is assumed never to break
    pub min: Decimal,
    /// Upper boundary for the long-biased grid
    pub max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> Decimal {
        self.max - self.min
    }

    /// True when `price` lies strictly between the boundaries.
    pub fn contains_strictly(&self, price: Decimal) -> bool {
        price > self.min && price < self.max
    }
}

/// What happens to the generated point sitting exactly on `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor {
    /// Keep it as the lowest zone (coarse tier).
    Keep,
    /// Drop it; the coarse tier already owns the bottom of the range.
    Drop,
}

/// Build a descending grid of entry levels over `range`.
///
/// The range is split into `divisions` equal steps and every point is rounded
/// to `asset_digit` places. The point on `max` is never an entry zone; the
/// point on `min` is kept or dropped according to `floor`. The lowest level
/// then gets the last-zone bump (see [`last_zone_bump`]) so it never sits on
/// the boundary. Finally any level present in `exclude` is removed.
pub fn build_grid(
    range: &PriceRange,
    divisions: u32,
    asset_digit: u32,
    floor: Floor,
    exclude: &[Decimal],
) -> Vec<Decimal> {
    if divisions == 0 {
        return Vec::new();
    }

    let steps = Decimal::from(divisions);
    let last = match floor {
        Floor::Keep => divisions,
        Floor::Drop => divisions - 1,
    };

    let mut levels: Vec<Decimal> = (1..=last)
        .map(|i| {
            let point = if i == divisions {
                range.min
            } else {
                range.max - range.span() * Decimal::from(i) / steps
            };
            round_to_precision(point, asset_digit)
        })
        .collect();

    apply_last_zone_bump(&mut levels, asset_digit);

    if !exclude.is_empty() {
        levels.retain(|level| !exclude.contains(level));
    }

    levels
}

/// Amount added to the lowest zone of a grid whose highest zone is `top`.
///
/// A whole unit for instruments quoted above 2, one price step otherwise.
pub fn last_zone_bump(top: Decimal, asset_digit: u32) -> Decimal {
    if top > WHOLE_UNIT_BUMP_THRESHOLD {
        Decimal::ONE
    } else {
        price_step(asset_digit)
    }
}

fn apply_last_zone_bump(levels: &mut [Decimal], asset_digit: u32) {
    let Some(&top) = levels.first() else {
        return;
    };
    if let Some(lowest) = levels.last_mut() {
        *lowest += last_zone_bump(top, asset_digit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Decimal, max: Decimal) -> PriceRange {
        PriceRange::new(min, max)
    }

    // =========================================================================
    // Fund A style grids (floor kept)
    // =========================================================================

    #[test]
    fn test_coarse_grid_drops_top_and_bumps_floor() {
        let levels = build_grid(&range(dec!(0), dec!(100)), 4, 2, Floor::Keep, &[]);
        assert_eq!(levels, vec![dec!(75), dec!(50), dec!(25), dec!(1)]);
    }

    #[test]
    fn test_single_division_is_only_the_bumped_floor() {
        let levels = build_grid(&range(dec!(10), dec!(20)), 1, 2, Floor::Keep, &[]);
        assert_eq!(levels, vec![dec!(11)]);
    }

    #[test]
    fn test_low_priced_asset_bumps_by_one_step() {
        let levels = build_grid(&range(dec!(1.0), dec!(1.2)), 2, 4, Floor::Keep, &[]);
        assert_eq!(levels, vec![dec!(1.1), dec!(1.0001)]);
    }

    #[test]
    fn test_levels_are_rounded_to_asset_digits() {
        let levels = build_grid(&range(dec!(0), dec!(100)), 3, 2, Floor::Keep, &[]);
        assert_eq!(levels, vec![dec!(66.67), dec!(33.33), dec!(1)]);
    }

    #[test]
    fn test_levels_strictly_inside_range() {
        let r = range(dec!(0), dec!(100));
        for divisions in 1..=12 {
            let levels = build_grid(&r, divisions, 2, Floor::Keep, &[]);
            assert_eq!(levels.len(), divisions as usize);
            assert!(levels.iter().all(|l| r.contains_strictly(*l)));
            assert!(levels.windows(2).all(|w| w[0] > w[1]));
        }
    }

    // =========================================================================
    // Fund B style grids (floor dropped, exclusions)
    // =========================================================================

    #[test]
    fn test_fine_grid_excludes_coarse_levels() {
        let r = range(dec!(0), dec!(100));
        let coarse = build_grid(&r, 4, 2, Floor::Keep, &[]);
        let fine = build_grid(&r, 12, 2, Floor::Drop, &coarse);

        assert_eq!(
            fine,
            vec![
                dec!(91.67),
                dec!(83.33),
                dec!(66.67),
                dec!(58.33),
                dec!(41.67),
                dec!(33.33),
                dec!(16.67),
                dec!(9.33),
            ]
        );
        assert!(fine.iter().all(|l| !coarse.contains(l)));
    }

    #[test]
    fn test_exclusion_compares_at_rounded_precision() {
        // 100 * 2 / 3 rounds to 66.67 in both grids and must be treated as equal
        let r = range(dec!(0), dec!(100));
        let coarse = build_grid(&r, 3, 2, Floor::Keep, &[]);
        let fine = build_grid(&r, 6, 2, Floor::Drop, &coarse);
        assert!(!fine.contains(&dec!(66.67)));
        assert!(!fine.contains(&dec!(33.33)));
        assert!(fine.contains(&dec!(83.33)));
    }

    #[test]
    fn test_zero_divisions_yields_empty_grid() {
        assert!(build_grid(&range(dec!(0), dec!(100)), 0, 2, Floor::Keep, &[]).is_empty());
    }

    #[test]
    fn test_last_zone_bump_threshold() {
        assert_eq!(last_zone_bump(dec!(2.5), 3), Decimal::ONE);
        assert_eq!(last_zone_bump(dec!(2), 3), dec!(0.001));
        assert_eq!(last_zone_bump(dec!(1.1), 5), dec!(0.00001));
    }
}
