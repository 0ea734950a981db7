//! Feature derivation for anomaly-model inference.
//!
//! Turns a raw transaction plus side-table lookups into the fixed feature
//! vector the scaler was fitted on, in the exact training order, along with
//! the two account-count scalars the rule engine inspects.

use crate::lookup::LookupTables;
use crate::types::TransactionInput;
use std::sync::Arc;

/// The model's input features, in scaler training order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub amount: f64,
    pub login_attempts: f64,
    pub amount_to_balance_ratio: f64,
    pub balance_occupation_zscore: f64,
}

impl FeatureVector {
    pub const LEN: usize = 4;

    /// Ordered array form, as fed to the scaler.
    pub fn as_array(&self) -> [f64; Self::LEN] {
        [
            self.amount,
            self.login_attempts,
            self.amount_to_balance_ratio,
            self.balance_occupation_zscore,
        ]
    }

    /// Feature names, matching the array order.
    pub fn names() -> [&'static str; Self::LEN] {
        [
            "TransactionAmount",
            "LoginAttempts",
            "AmounttoBalanceRatio",
            "BalanceOccZScore",
        ]
    }
}

/// Output of the derivation stage: the model features plus the auxiliary
/// signals consumed by the rule engine.
#[derive(Debug, Clone)]
pub struct DerivedFeatures {
    pub vector: FeatureVector,
    pub device_accounts: u32,
    pub ip_accounts: u32,
}

/// Derives features from transactions against shared lookup tables.
///
/// This stage is total: lookup misses fall back to defaults and degenerate
/// statistics produce an explicit zero signal, never an error.
pub struct FeatureDeriver {
    lookups: Arc<LookupTables>,
}

impl FeatureDeriver {
    pub fn new(lookups: Arc<LookupTables>) -> Self {
        Self { lookups }
    }

    pub fn derive(&self, tx: &TransactionInput) -> DerivedFeatures {
        let device_accounts = self.lookups.device_account_count(&tx.device_id);
        let ip_accounts = self.lookups.ip_account_count(&tx.ip_address);
        let occ = self.lookups.occupation_stats(&tx.occupation);

        // A zero stddev carries no signal; 0 instead of a division error.
        let balance_occupation_zscore = if occ.std_dev > 0.0 {
            (tx.account_balance - occ.mean) / occ.std_dev
        } else {
            0.0
        };

        // Same fallback for an empty account.
        let amount_to_balance_ratio = if tx.account_balance > 0.0 {
            tx.amount / tx.account_balance
        } else {
            0.0
        };

        DerivedFeatures {
            vector: FeatureVector {
                amount: tx.amount,
                login_attempts: tx.login_attempts as f64,
                amount_to_balance_ratio,
                balance_occupation_zscore,
            },
            device_accounts,
            ip_accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::OccupationStats;
    use crate::types::Channel;
    use std::collections::HashMap;

    fn deriver_with_empty_tables() -> FeatureDeriver {
        FeatureDeriver::new(Arc::new(LookupTables::default()))
    }

    fn sample_tx() -> TransactionInput {
        TransactionInput {
            amount: 1500.50,
            login_attempts: 2,
            device_id: "D000123".to_string(),
            ip_address: "192.168.1.5".to_string(),
            account_balance: 4000.0,
            occupation: "Doctor".to_string(),
            channel: Channel::Online,
        }
    }

    #[test]
    fn test_derivation_from_default_stats() {
        let derived = deriver_with_empty_tables().derive(&sample_tx());

        // Defaults: mean 5000, stddev 2000, counts 1
        assert_eq!(derived.device_accounts, 1);
        assert_eq!(derived.ip_accounts, 1);
        assert_eq!(derived.vector.amount, 1500.50);
        assert_eq!(derived.vector.login_attempts, 2.0);
        assert!((derived.vector.amount_to_balance_ratio - 1500.50 / 4000.0).abs() < 1e-12);
        assert!((derived.vector.balance_occupation_zscore - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_balance_zeroes_ratio() {
        let mut tx = sample_tx();
        tx.account_balance = 0.0;

        let derived = deriver_with_empty_tables().derive(&tx);
        assert_eq!(derived.vector.amount_to_balance_ratio, 0.0);
        // z-score still computed from the default stats
        assert!((derived.vector.balance_occupation_zscore - (-2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_negative_balance_zeroes_ratio() {
        let mut tx = sample_tx();
        tx.account_balance = -50.0;

        let derived = deriver_with_empty_tables().derive(&tx);
        assert_eq!(derived.vector.amount_to_balance_ratio, 0.0);
    }

    #[test]
    fn test_zero_stddev_zeroes_zscore() {
        let mut occupations = HashMap::new();
        occupations.insert(
            "Retired".to_string(),
            OccupationStats {
                mean: 3000.0,
                std_dev: 0.0,
            },
        );
        let deriver = FeatureDeriver::new(Arc::new(LookupTables::from_maps(
            HashMap::new(),
            HashMap::new(),
            occupations,
        )));

        let mut tx = sample_tx();
        tx.occupation = "Retired".to_string();
        tx.account_balance = 999_999.0;

        let derived = deriver.derive(&tx);
        assert_eq!(derived.vector.balance_occupation_zscore, 0.0);
    }

    #[test]
    fn test_account_counts_from_tables() {
        let mut devices = HashMap::new();
        devices.insert("D000123".to_string(), 5);
        let mut ips = HashMap::new();
        ips.insert("192.168.1.5".to_string(), 4);
        let deriver = FeatureDeriver::new(Arc::new(LookupTables::from_maps(
            devices,
            ips,
            HashMap::new(),
        )));

        let derived = deriver.derive(&sample_tx());
        assert_eq!(derived.device_accounts, 5);
        assert_eq!(derived.ip_accounts, 4);
    }

    #[test]
    fn test_vector_array_order() {
        let derived = deriver_with_empty_tables().derive(&sample_tx());
        let arr = derived.vector.as_array();

        assert_eq!(arr[0], derived.vector.amount);
        assert_eq!(arr[1], derived.vector.login_attempts);
        assert_eq!(arr[2], derived.vector.amount_to_balance_ratio);
        assert_eq!(arr[3], derived.vector.balance_occupation_zscore);
        assert_eq!(FeatureVector::names().len(), FeatureVector::LEN);
    }
}
