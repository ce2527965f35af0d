//! Error types for the anofox-replenish library.

use thiserror::Error;

/// Result type alias for replenishment operations.
pub type Result<T> = std::result::Result<T, ReplenishError>;

/// Errors that can occur while forecasting demand or building reorder lists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplenishError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// A base forecaster does not have enough periods to produce a value.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// None of the base forecasters could produce a value for the series.
    #[error("no forecast available for product {product_id} at store {store_id}")]
    NoForecastAvailable {
        store_id: String,
        product_id: String,
    },

    /// Configuration rejected at load time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Inventory or sales data violates a contract (e.g. reserved > on hand).
    #[error("data integrity violation for product {product_id} at store {store_id}: {reason}")]
    DataIntegrity {
        store_id: String,
        product_id: String,
        reason: String,
    },

    /// Product is not present in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration or snapshot could not be read or parsed.
    #[error("failed to load {0}")]
    ConfigLoad(String),
}

impl ReplenishError {
    /// Whether the error is a per-product anomaly rather than a run failure.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, ReplenishError::DataIntegrity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ReplenishError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ReplenishError::InsufficientData { needed: 3, got: 2 };
        assert_eq!(err.to_string(), "insufficient data: need at least 3, got 2");

        let err = ReplenishError::InvalidConfiguration("lead time must be >= 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: lead time must be >= 0"
        );

        let err = ReplenishError::NoForecastAvailable {
            store_id: "49".to_string(),
            product_id: "104468".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no forecast available for product 104468 at store 49"
        );
    }

    #[test]
    fn data_integrity_is_flagged() {
        let err = ReplenishError::DataIntegrity {
            store_id: "49".to_string(),
            product_id: "2007".to_string(),
            reason: "reserved exceeds on hand".to_string(),
        };
        assert!(err.is_data_integrity());
        assert!(!ReplenishError::EmptyData.is_data_integrity());
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ReplenishError::EmptyData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
