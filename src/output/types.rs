use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "problemx.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    /// Input file or root directory the op ran against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl Meta {
    pub fn since(t0: Instant, input: impl Into<String>) -> Self {
        Meta { duration_ms: Some(t0.elapsed().as_millis()), input: Some(input.into()) }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    fn base(op: &'static str, apply: bool, meta: Option<Meta>) -> Self {
        Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            apply,
            plan: None,
            result: None,
            meta,
        }
    }

    /// Dry-run report: what the op would do, nothing written.
    pub fn plan<T: Serialize>(op: &'static str, plan: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        let mut env = Envelope::base(op, false, meta);
        env.plan = Some(serde_json::to_value(plan)?);
        Ok(env)
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        let mut env = Envelope::base(op, true, meta);
        env.result = Some(serde_json::to_value(result)?);
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_plan_envelope() {
        let plan = json!({"would_change": ["a.json"]});
        let env = Envelope::plan("bank_images", &plan, None).expect("to serialize plan");
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"schema_version\":\"problemx.v1\""));
        assert!(s.contains("\"plan\""));
        assert!(s.contains("\"bank_images\""));
        assert!(s.contains("\"apply\":false"));
        assert!(!s.contains("\"result\""));
    }

    #[test]
    fn serialize_result_envelope() {
        let result = json!({"extracted": 3});
        let meta = Meta { duration_ms: Some(12), input: None };
        let env = Envelope::result("pta", &result, Some(meta)).expect("to serialize result");
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"result\""));
        assert!(s.contains("\"apply\":true"));
        assert!(s.contains("\"duration_ms\":12"));
        assert!(!s.contains("\"input\""));
    }
}
