//! Transaction data structures for fraud scoring

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Transaction channel. Unknown channel strings map to [`Channel::Other`]
/// so unseen channels still score through the model path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Online,
    Atm,
    Branch,
    Other,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Online => "Online",
            Channel::Atm => "ATM",
            Channel::Branch => "Branch",
            Channel::Other => "Other",
        }
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "Online" => Channel::Online,
            "ATM" => Channel::Atm,
            "Branch" => Channel::Branch,
            _ => Channel::Other,
        })
    }
}

/// A validated transaction record to be scored.
///
/// Field aliases accept the upstream request-layer JSON names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Transaction value in USD
    #[serde(alias = "TransactionAmount")]
    pub amount: f64,

    /// Failed login count before the purchase
    #[serde(alias = "LoginAttempts")]
    pub login_attempts: u32,

    /// Unique device identifier
    #[serde(alias = "DeviceID")]
    pub device_id: String,

    /// IPv4 address
    #[serde(alias = "IP_Address")]
    pub ip_address: String,

    /// Account balance at transaction time
    #[serde(alias = "AccountBalance")]
    pub account_balance: f64,

    /// Customer occupation (e.g. Doctor, Student, Retired, Engineer)
    #[serde(alias = "CustomerOccupation")]
    pub occupation: String,

    /// Transaction channel
    #[serde(alias = "Channel")]
    pub channel: Channel,
}

impl TransactionInput {
    /// Create a transaction with the given amount and balance; remaining
    /// fields take benign values. Used by tests and the traffic generator.
    pub fn new(amount: f64, account_balance: f64, channel: Channel) -> Self {
        Self {
            amount,
            login_attempts: 0,
            device_id: String::new(),
            ip_address: String::new(),
            account_balance,
            occupation: String::new(),
            channel,
        }
    }
}

/// Transport envelope around a transaction: an optional correlation id plus
/// the transaction fields, flattened so upstream JSON stays a single object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(flatten)]
    pub transaction: TransactionInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_upstream_field_names() {
        let json = r#"{
            "TransactionAmount": 1500.50,
            "LoginAttempts": 2,
            "DeviceID": "D000123",
            "IP_Address": "192.168.1.5",
            "AccountBalance": 4000.0,
            "CustomerOccupation": "Doctor",
            "Channel": "Online"
        }"#;

        let tx: TransactionInput = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, 1500.50);
        assert_eq!(tx.login_attempts, 2);
        assert_eq!(tx.device_id, "D000123");
        assert_eq!(tx.channel, Channel::Online);
    }

    #[test]
    fn test_channel_values() {
        let atm: Channel = serde_json::from_str("\"ATM\"").unwrap();
        assert_eq!(atm, Channel::Atm);

        let branch: Channel = serde_json::from_str("\"Branch\"").unwrap();
        assert_eq!(branch, Channel::Branch);

        let unknown: Channel = serde_json::from_str("\"Mobile\"").unwrap();
        assert_eq!(unknown, Channel::Other);

        assert_eq!(serde_json::to_string(&Channel::Atm).unwrap(), "\"ATM\"");
    }

    #[test]
    fn test_score_request_flatten() {
        let json = r#"{
            "request_id": "req-42",
            "TransactionAmount": 25.0,
            "LoginAttempts": 0,
            "DeviceID": "D1",
            "IP_Address": "10.0.0.1",
            "AccountBalance": 900.0,
            "CustomerOccupation": "Student",
            "Channel": "Branch"
        }"#;

        let req: ScoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.request_id.as_deref(), Some("req-42"));
        assert_eq!(req.transaction.amount, 25.0);
        assert_eq!(req.transaction.channel, Channel::Branch);
    }

    #[test]
    fn test_request_id_optional() {
        let json = r#"{
            "TransactionAmount": 25.0,
            "LoginAttempts": 0,
            "DeviceID": "D1",
            "IP_Address": "10.0.0.1",
            "AccountBalance": 900.0,
            "CustomerOccupation": "Student",
            "Channel": "ATM"
        }"#;

        let req: ScoreRequest = serde_json::from_str(json).unwrap();
        assert!(req.request_id.is_none());
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = TransactionInput::new(100.0, 2500.0, Channel::Online);
        let json = serde_json::to_string(&tx).unwrap();
        let back: TransactionInput = serde_json::from_str(&json).unwrap();

        assert_eq!(tx.amount, back.amount);
        assert_eq!(tx.account_balance, back.account_balance);
        assert_eq!(tx.channel, back.channel);
    }
}
