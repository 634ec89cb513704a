//! Trend indicators drawn alongside the grid.

use rust_decimal::Decimal;

/// Exponential moving average with `alpha = 2 / (period + 1)`.
///
/// Recursive form seeded with the first value:
/// `ema[0] = x[0]`, `ema[t] = alpha * x[t] + (1 - alpha) * ema[t - 1]`.
/// Values are `None` until `period` observations have been seen.
pub fn ema(values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let alpha = Decimal::TWO / Decimal::from(period + 1);
    let mut result = Vec::with_capacity(values.len());
    let mut current: Option<Decimal> = None;

    for (i, &value) in values.iter().enumerate() {
        let next = match current {
            Some(prev) => alpha * value + (Decimal::ONE - alpha) * prev,
            None => value,
        };
        current = Some(next);

        if i + 1 >= period {
            result.push(Some(next));
        } else {
            result.push(None);
        }
    }

    result
}
