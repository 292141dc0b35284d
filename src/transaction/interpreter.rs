use crate::core::{SdkError, SdkResult};
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Typed cause of a failed execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    SlippageExceeded,
    InsufficientGas,
    VersionConflict,
    MoveAbort { code: u64 },
    SubmissionFailed,
    Unknown,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCode::SlippageExceeded => write!(f, "slippage exceeded"),
            FailureCode::InsufficientGas => write!(f, "insufficient gas"),
            FailureCode::VersionConflict => write!(f, "object version conflict"),
            FailureCode::MoveAbort { code } => write!(f, "move abort {}", code),
            FailureCode::SubmissionFailed => write!(f, "submission failed"),
            FailureCode::Unknown => write!(f, "unknown failure"),
        }
    }
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    Success {
        digest: String,
        gas_used: Option<u64>,
        timestamp: Option<DateTime<Utc>>,
    },
    Failure {
        digest: Option<String>,
        code: FailureCode,
        detail: String,
    },
}

impl ExecutionResult {
    pub fn submission_failed(error: &SdkError) -> Self {
        ExecutionResult::Failure {
            digest: None,
            code: FailureCode::SubmissionFailed,
            detail: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    pub fn digest(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { digest, .. } => Some(digest),
            ExecutionResult::Failure { digest, .. } => digest.as_deref(),
        }
    }

    pub fn failure_code(&self) -> Option<FailureCode> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { code, .. } => Some(*code),
        }
    }

    /// Digest on success, otherwise the matching error.
    pub fn into_result(self) -> SdkResult<String> {
        match self {
            ExecutionResult::Success { digest, .. } => Ok(digest),
            ExecutionResult::Failure {
                code: FailureCode::SlippageExceeded,
                detail,
                ..
            } => Err(SdkError::SlippageExceeded(detail)),
            ExecutionResult::Failure { code, detail, .. } => {
                Err(SdkError::SubmissionFailed(format!("{}: {}", code, detail)))
            }
        }
    }
}

/// Turns raw execution effects into an [`ExecutionResult`].
///
/// Anything that is not a well-formed success is a failure.
pub struct ResultInterpreter {
    slippage_abort_codes: Vec<u64>,
}

impl ResultInterpreter {
    pub fn new(slippage_abort_codes: Vec<u64>) -> Self {
        Self {
            slippage_abort_codes,
        }
    }

    pub fn interpret(&self, raw: &Value) -> ExecutionResult {
        let digest = raw.get("digest").and_then(Value::as_str).map(str::to_string);

        if let Some(errors) = raw.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let detail = errors
                    .iter()
                    .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                    .collect::<Vec<_>>()
                    .join("; ");
                return self.failure(digest, &detail);
            }
        }

        let status = raw.pointer("/effects/status/status").and_then(Value::as_str);
        match (status, digest) {
            (Some("success"), Some(digest)) => {
                debug!("Transaction {} succeeded", digest);
                ExecutionResult::Success {
                    digest,
                    gas_used: gas_used(raw),
                    timestamp: timestamp(raw),
                }
            }
            (Some("failure"), digest) => {
                let detail = raw
                    .pointer("/effects/status/error")
                    .and_then(Value::as_str)
                    .unwrap_or("failure without error detail");
                self.failure(digest, detail)
            }
            (_, digest) => {
                warn!("Unrecognised execution effects: {}", raw);
                ExecutionResult::Failure {
                    digest,
                    code: FailureCode::Unknown,
                    detail: format!("Unrecognised execution effects: {}", raw),
                }
            }
        }
    }

    fn failure(&self, digest: Option<String>, detail: &str) -> ExecutionResult {
        let code = self.classify(detail);
        warn!(
            "Transaction {} failed ({}): {}",
            digest.as_deref().unwrap_or("<no digest>"),
            code,
            detail
        );
        ExecutionResult::Failure {
            digest,
            code,
            detail: detail.to_string(),
        }
    }

    pub fn classify(&self, detail: &str) -> FailureCode {
        if detail.contains("InsufficientGas") {
            return FailureCode::InsufficientGas;
        }
        if detail.contains("ObjectVersionUnavailableForConsumption")
            || detail.contains("not available for consumption")
        {
            return FailureCode::VersionConflict;
        }
        match move_abort_code(detail) {
            Some(code) if self.slippage_abort_codes.contains(&code) => FailureCode::SlippageExceeded,
            Some(code) => FailureCode::MoveAbort { code },
            None => FailureCode::Unknown,
        }
    }
}

/// Abort code of `MoveAbort(<location>, <code>)`, the last top-level field.
fn move_abort_code(detail: &str) -> Option<u64> {
    let start = detail.find("MoveAbort(")? + "MoveAbort(".len();
    let body = &detail[start..];

    let mut depth = 1usize;
    let mut last_comma = None;
    for (i, c) in body.char_indices() {
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => {
                depth -= 1;
                if depth == 0 {
                    let from = last_comma? + 1;
                    return body[from..i].trim().parse().ok();
                }
            }
            ',' if depth == 1 => last_comma = Some(i),
            _ => {}
        }
    }
    None
}

fn gas_used(raw: &Value) -> Option<u64> {
    let gas = raw.pointer("/effects/gasUsed")?;
    let field = |name: &str| -> Option<u64> { gas.get(name)?.as_str()?.parse().ok() };

    let spent = field("computationCost")?.saturating_add(field("storageCost")?);
    Some(spent.saturating_sub(field("storageRebate").unwrap_or(0)))
}

fn timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.get("timestampMs")?.as_str()?.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    const ABORT_4: &str = "MoveAbort(MoveLocation { module: ModuleId { address: a21247f7, name: Identifier(\"router\") }, function: 3, instruction: 12, function_name: Some(\"swap_exact_x_to_y\") }, 4) in command 2";
    const ABORT_9: &str = "MoveAbort(MoveLocation { module: ModuleId { address: a21247f7, name: Identifier(\"manage\") }, function: 1, instruction: 7, function_name: Some(\"add_liquidity\") }, 9) in command 3";

    fn interpreter() -> ResultInterpreter {
        ResultInterpreter::new(vec![4, 5])
    }

    fn failed(error: &str) -> Value {
        json!({
            "digest": "Hx1",
            "effects": { "status": { "status": "failure", "error": error } }
        })
    }

    #[test]
    fn test_success() {
        let raw = json!({
            "digest": "9mGkqR2NDsXKk4x1k5PvhJWMn7sVqkDrLfnJnYy2C7ff",
            "timestampMs": "1700000000000",
            "effects": {
                "status": { "status": "success" },
                "gasUsed": {
                    "computationCost": "1000000",
                    "storageCost": "2000000",
                    "storageRebate": "500000"
                }
            }
        });

        let result = interpreter().interpret(&raw);
        assert!(result.is_success());
        assert_eq!(result.digest(), Some("9mGkqR2NDsXKk4x1k5PvhJWMn7sVqkDrLfnJnYy2C7ff"));
        match result {
            ExecutionResult::Success { gas_used, timestamp, .. } => {
                assert_eq!(gas_used, Some(2_500_000));
                assert_eq!(timestamp.map(|t| t.timestamp()), Some(1_700_000_000));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test_case(ABORT_4, FailureCode::SlippageExceeded ; "configured abort code")]
    #[test_case(ABORT_9, FailureCode::MoveAbort { code: 9 } ; "other abort code")]
    #[test_case("InsufficientGas", FailureCode::InsufficientGas ; "gas")]
    #[test_case("Transaction needs to be rebuilt because object 0x5 version 0x7 is unavailable: ObjectVersionUnavailableForConsumption", FailureCode::VersionConflict ; "version conflict")]
    #[test_case("Object 0x5 is not available for consumption, current version: 12", FailureCode::VersionConflict ; "consumption wording")]
    #[test_case("InvariantViolation", FailureCode::Unknown ; "unclassified")]
    fn test_failure_classification(error: &str, expected: FailureCode) {
        let result = interpreter().interpret(&failed(error));
        assert_eq!(result.failure_code(), Some(expected));
        assert_eq!(result.digest(), Some("Hx1"));
    }

    #[test_case(json!(null) ; "null")]
    #[test_case(json!("ok") ; "string")]
    #[test_case(json!({ "effects": { "status": { "status": "success" } } }) ; "success without digest")]
    #[test_case(json!({ "digest": "Hx1", "effects": { "status": { "status": "pending" } } }) ; "unknown status")]
    #[test_case(json!({ "digest": "Hx1" }) ; "no effects")]
    fn test_unparseable_is_failure(raw: Value) {
        let result = interpreter().interpret(&raw);
        assert!(!result.is_success());
        assert_eq!(result.failure_code(), Some(FailureCode::Unknown));
    }

    #[test]
    fn test_top_level_errors_are_failures() {
        let raw = json!({
            "digest": "Hx1",
            "errors": ["InsufficientGas"],
            "effects": { "status": { "status": "success" } }
        });
        assert_eq!(
            interpreter().interpret(&raw).failure_code(),
            Some(FailureCode::InsufficientGas)
        );
    }

    #[test]
    fn test_into_result() {
        let slippage = interpreter().interpret(&failed(ABORT_4)).into_result();
        assert!(matches!(slippage, Err(SdkError::SlippageExceeded(_))));

        let other = interpreter().interpret(&failed("InsufficientGas")).into_result();
        assert!(matches!(other, Err(SdkError::SubmissionFailed(_))));
    }

    #[test]
    fn test_abort_code_parsing() {
        assert_eq!(move_abort_code(ABORT_4), Some(4));
        assert_eq!(move_abort_code("MoveAbort(loc, 42)"), Some(42));
        assert_eq!(move_abort_code("MoveAbort(loc"), None);
        assert_eq!(move_abort_code("MoveAbort(no_code)"), None);
    }
}
