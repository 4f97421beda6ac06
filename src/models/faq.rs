use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Display position, ascending.
    #[serde(default)]
    pub order: i32,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

fn active_by_default() -> bool {
    true
}
