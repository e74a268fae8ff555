//! Per-request outcomes

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Marker key carried by synthesized payloads
pub const SIMULATED_KEY: &str = "simulated";

/// Outcome of dispatching one case to the inference endpoint
///
/// Exactly one of these exists per dispatched case; a failed request is
/// represented by a simulated payload, never by a missing outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOutcome {
    /// Echo of the dispatched prompt
    pub input: String,

    /// Response payload, genuine or simulated
    pub output: JsonValue,

    /// Wall-clock seconds from dispatch to completion
    pub latency: f64,
}

impl RequestOutcome {
    /// Whether the payload was synthesized after retry exhaustion
    pub fn is_simulated(&self) -> bool {
        self.output
            .get(SIMULATED_KEY)
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simulated_marker() {
        let genuine = RequestOutcome {
            input: "hello".into(),
            output: json!({"generated_text": "hi there"}),
            latency: 0.1,
        };
        assert!(!genuine.is_simulated());

        let simulated = RequestOutcome {
            input: "hello".into(),
            output: json!({"generated_text": "Simulated response", "simulated": true}),
            latency: 1.2,
        };
        assert!(simulated.is_simulated());
    }
}
