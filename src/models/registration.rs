use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Course, wire_enum};

wire_enum! {
    RegistrationStatus {
        Pending => "待確認",
        Confirmed => "已確認",
        Cancelled => "已取消",
        Waitlist => "候補中",
    }
}

/// Body for `POST /registrations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub course_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub participants: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub participants: u8,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: RegistrationStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Shape returned by the by-email lookup: the registration plus its course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationWithCourse {
    #[serde(flatten)]
    pub registration: Registration,
    pub course: Course,
}
