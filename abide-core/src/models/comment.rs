use serde::{Deserialize, Serialize};

/// A comment attached to a journal entry or prayer item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub created_at: String,
}
