//! Read-only side tables consulted during feature derivation.
//!
//! Misses are never errors: unseen devices, IPs and occupations resolve to
//! the documented defaults so every transaction can be scored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Linked-account count assumed for a device or IP never seen in training.
pub const DEFAULT_ACCOUNT_COUNT: u32 = 1;

/// Balance statistics assumed for an occupation absent from the table.
pub const DEFAULT_OCCUPATION_STATS: OccupationStats = OccupationStats {
    mean: 5000.0,
    std_dev: 2000.0,
};

/// Per-occupation account-balance statistics from the training data.
///
/// Aliases accept the artifact-file field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupationStats {
    #[serde(alias = "OccMean")]
    pub mean: f64,
    #[serde(alias = "OccStd")]
    pub std_dev: f64,
}

/// Process-wide lookup tables, loaded once at startup and shared read-only
/// across all scoring requests.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    device_accounts: HashMap<String, u32>,
    ip_accounts: HashMap<String, u32>,
    occupation_stats: HashMap<String, OccupationStats>,
}

impl LookupTables {
    /// Build tables from in-memory maps. Used by tests and custom loaders.
    pub fn from_maps(
        device_accounts: HashMap<String, u32>,
        ip_accounts: HashMap<String, u32>,
        occupation_stats: HashMap<String, OccupationStats>,
    ) -> Self {
        Self {
            device_accounts,
            ip_accounts,
            occupation_stats,
        }
    }

    /// Load the three tables from JSON artifact files.
    pub fn load<P: AsRef<Path>>(device_path: P, ip_path: P, occupation_path: P) -> Result<Self> {
        let device_accounts = read_json(device_path.as_ref(), "device lookup")?;
        let ip_accounts = read_json(ip_path.as_ref(), "ip lookup")?;
        let occupation_stats = read_json(occupation_path.as_ref(), "occupation lookup")?;

        let tables = Self {
            device_accounts,
            ip_accounts,
            occupation_stats,
        };

        info!(
            devices = tables.device_accounts.len(),
            ips = tables.ip_accounts.len(),
            occupations = tables.occupation_stats.len(),
            "Lookup tables loaded"
        );

        Ok(tables)
    }

    /// Accounts linked to a device, defaulting for unseen devices.
    pub fn device_account_count(&self, device_id: &str) -> u32 {
        self.device_accounts
            .get(device_id)
            .copied()
            .unwrap_or(DEFAULT_ACCOUNT_COUNT)
    }

    /// Accounts linked to an IP, defaulting for unseen addresses.
    pub fn ip_account_count(&self, ip_address: &str) -> u32 {
        self.ip_accounts
            .get(ip_address)
            .copied()
            .unwrap_or(DEFAULT_ACCOUNT_COUNT)
    }

    /// Balance statistics for an occupation, defaulting for unseen ones.
    pub fn occupation_stats(&self, occupation: &str) -> OccupationStats {
        self.occupation_stats
            .get(occupation)
            .copied()
            .unwrap_or(DEFAULT_OCCUPATION_STATS)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse {} from {}", what, path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misses_resolve_to_defaults() {
        let tables = LookupTables::default();

        assert_eq!(tables.device_account_count("D999"), DEFAULT_ACCOUNT_COUNT);
        assert_eq!(tables.ip_account_count("10.0.0.1"), DEFAULT_ACCOUNT_COUNT);
        assert_eq!(tables.occupation_stats("Astronaut"), DEFAULT_OCCUPATION_STATS);
    }

    #[test]
    fn test_hits_return_table_values() {
        let mut devices = HashMap::new();
        devices.insert("D5".to_string(), 5);
        let mut ips = HashMap::new();
        ips.insert("1.2.3.4".to_string(), 7);
        let mut occupations = HashMap::new();
        occupations.insert(
            "Doctor".to_string(),
            OccupationStats {
                mean: 12000.0,
                std_dev: 3000.0,
            },
        );

        let tables = LookupTables::from_maps(devices, ips, occupations);

        assert_eq!(tables.device_account_count("D5"), 5);
        assert_eq!(tables.ip_account_count("1.2.3.4"), 7);
        assert_eq!(tables.occupation_stats("Doctor").mean, 12000.0);
    }

    #[test]
    fn test_occupation_stats_artifact_field_names() {
        let parsed: OccupationStats =
            serde_json::from_str(r#"{"OccMean": 8000.0, "OccStd": 1500.0}"#).unwrap();

        assert_eq!(parsed.mean, 8000.0);
        assert_eq!(parsed.std_dev, 1500.0);
    }
}
