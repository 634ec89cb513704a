//! Validation errors raised while building a capital plan.

use rust_decimal::Decimal;
use thiserror::Error;

/// A user-supplied parameter set that cannot produce a capital plan.
///
/// None of these are retryable: the caller has to change its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    /// The chosen entry price is zero or negative.
    #[error("first action price must be positive")]
    FirstActionPriceNotPositive { first_action_price: Decimal },

    /// The chosen entry price sits above every generated zone, so nothing
    /// would ever be committed.
    #[error("first action price outside top zone range")]
    FirstActionPriceAboveTopZone {
        first_action_price: Decimal,
        top_zone: Option<Decimal>,
    },

    /// The balance cannot cover a full-grid drawdown plus a one-cent buffer.
    #[error("insufficient funds")]
    InsufficientFunds {
        balance_cents: Decimal,
        used_funds: Decimal,
        remaining_funds: Decimal,
    },

    /// `min` must be non-negative and strictly below `max`.
    #[error("invalid price range: min {min} must be >= 0 and below max {max}")]
    InvalidPriceRange { min: Decimal, max: Decimal },

    /// Both funds need at least one zone.
    #[error("{fund} zone count must be at least 1")]
    InvalidZoneCount { fund: &'static str },

    /// A size or amount that has to be strictly positive.
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: Decimal },
}

impl InvalidConfiguration {
    /// Short machine-friendly code for logs and exports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FirstActionPriceNotPositive { .. } => "FIRST_ACTION_NOT_POSITIVE",
            Self::FirstActionPriceAboveTopZone { .. } => "FIRST_ACTION_ABOVE_TOP_ZONE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidPriceRange { .. } => "INVALID_PRICE_RANGE",
            Self::InvalidZoneCount { .. } => "INVALID_ZONE_COUNT",
            Self::NonPositive { .. } => "NON_POSITIVE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_messages_match_user_facing_text() {
        let err = InvalidConfiguration::FirstActionPriceNotPositive {
            first_action_price: Decimal::ZERO,
        };
        assert_eq!(err.to_string(), "first action price must be positive");

        let err = InvalidConfiguration::FirstActionPriceAboveTopZone {
            first_action_price: dec!(95),
            top_zone: Some(dec!(91.67)),
        };
        assert_eq!(err.to_string(), "first action price outside top zone range");

        let err = InvalidConfiguration::InsufficientFunds {
            balance_cents: dec!(7000),
            used_funds: dec!(7030),
            remaining_funds: dec!(-30),
        };
        assert_eq!(err.to_string(), "insufficient funds");
    }

    #[test]
    fn test_field_errors_name_the_field() {
        let err = InvalidConfiguration::NonPositive {
            field: "contract_size",
            value: dec!(-1),
        };
        assert_eq!(err.to_string(), "contract_size must be positive (got -1)");
        assert_eq!(err.code(), "NON_POSITIVE");
    }
}
