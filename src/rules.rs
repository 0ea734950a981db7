//! Deterministic short-circuit rules evaluated before the anomaly model.
//!
//! Rules are an ordered list with first-match-wins semantics: the device
//! check runs before the IP check and a firing rule ends the evaluation.
//! Device/IP fan-out across many accounts is treated as categorically
//! stronger evidence than a statistical anomaly score, so a hit bypasses
//! the model entirely. Only the Online channel carries this signal.

use crate::types::{Channel, Verdict};

/// A device or IP may legitimately serve this many accounts; above it, the
/// Online fan-out rules fire.
pub const LINKED_ACCOUNT_LIMIT: u32 = 3;

/// Fixed probability reported by any short-circuit verdict.
pub const RULE_FRAUD_PROBABILITY: f64 = 0.99;

/// Signals a rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub channel: Channel,
    pub device_accounts: u32,
    pub ip_accounts: u32,
}

/// A rule that can short-circuit scoring with an immediate verdict.
pub trait ShortCircuitRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn fire(&self, ctx: &RuleContext) -> Option<Verdict>;
}

/// Return the rules in evaluation order.
pub fn default_rules() -> Vec<Box<dyn ShortCircuitRule>> {
    vec![Box::new(DeviceFarmRule), Box::new(BotnetIpRule)]
}

/// Evaluates the ordered rule list, stopping at the first hit.
pub struct RuleEngine {
    rules: Vec<Box<dyn ShortCircuitRule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    pub fn evaluate(&self, ctx: &RuleContext) -> Option<Verdict> {
        self.rules.iter().find_map(|rule| rule.fire(ctx))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

// --- Individual rules ---

/// One Online device fronting many accounts: device-farm pattern.
struct DeviceFarmRule;
impl ShortCircuitRule for DeviceFarmRule {
    fn name(&self) -> &'static str {
        "device_farm"
    }

    fn fire(&self, ctx: &RuleContext) -> Option<Verdict> {
        if ctx.channel == Channel::Online && ctx.device_accounts > LINKED_ACCOUNT_LIMIT {
            Some(Verdict::fraud(
                vec![format!(
                    "Device Farm Detected (Online Device linked to {} accounts)",
                    ctx.device_accounts
                )],
                RULE_FRAUD_PROBABILITY,
            ))
        } else {
            None
        }
    }
}

/// One Online IP fronting many accounts: botnet pattern.
struct BotnetIpRule;
impl ShortCircuitRule for BotnetIpRule {
    fn name(&self) -> &'static str {
        "botnet_ip"
    }

    fn fire(&self, ctx: &RuleContext) -> Option<Verdict> {
        if ctx.channel == Channel::Online && ctx.ip_accounts > LINKED_ACCOUNT_LIMIT {
            Some(Verdict::fraud(
                vec![format!(
                    "Botnet IP Detected (Online IP linked to {} accounts)",
                    ctx.ip_accounts
                )],
                RULE_FRAUD_PROBABILITY,
            ))
        } else {
            None
        }
    }
}
