use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Review status of a submission. The set is closed: any other key coming
/// from the API is a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Parse an API status key. Returns `None` for keys outside the closed set.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    /// The status key as the API spells it.
    pub fn key(self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sentence sent to the chat.
    pub fn sentence(self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One homework item returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub status: Verdict,
}

impl Submission {
    /// Chat message announcing this submission's current status.
    pub fn status_message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.sentence()
        )
    }
}

/// A payload that passed top-level validation.
///
/// `homeworks` stays raw: only the newest item is ever inspected, and it is
/// validated separately.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Submissions, newest first.
    pub homeworks: Vec<Value>,
    /// Server timestamp to use as `from_date` on the next request.
    pub cursor: i64,
}

/// Short name of a JSON value's kind, used in diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
