use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{InstructorSummary, lenient_time, wire_enum};

/// Shown in place of a time range when either end is unknown.
pub const TIME_TBD: &str = "時間未定";

wire_enum! {
    CourseCategory {
        NatureExplore => "自然探索",
        Workshop => "體驗活動",
        Lecture => "主題講座",
        Misc => "其他",
    }
}

impl Default for CourseCategory {
    fn default() -> Self {
        CourseCategory::Misc
    }
}

wire_enum! {
    CourseStatus {
        Upcoming => "即將開始",
        Open => "報名中",
        Full => "已額滿",
        Completed => "已結束",
        Cancelled => "已取消",
    }
}

impl Default for CourseStatus {
    fn default() -> Self {
        CourseStatus::Upcoming
    }
}

fn default_max_spots() -> i32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: CourseCategory,
    #[serde(default)]
    pub status: CourseStatus,
    pub date: NaiveDate,
    #[serde(default, with = "lenient_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "lenient_time")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_max_spots")]
    pub max_spots: i32,
    #[serde(default)]
    pub current_registrations: i32,
    /// Computed by the server. Displayed as-is.
    #[serde(default)]
    pub available_spots: i32,
    #[serde(default)]
    pub instructor_id: Option<i64>,
    #[serde(default)]
    pub instructor: Option<InstructorSummary>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Course {
    /// `HH:MM-HH:MM` when both ends are known, [`TIME_TBD`] otherwise.
    pub fn formatted_time(&self) -> String {
        format_time_range(self.start_time, self.end_time)
    }

    /// Capacity left according to our own arithmetic, floored at zero.
    pub fn remaining_spots(&self) -> u32 {
        self.max_spots
            .saturating_sub(self.current_registrations)
            .max(0) as u32
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

pub fn format_time_range(start: Option<NaiveTime>, end: Option<NaiveTime>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
        _ => TIME_TBD.to_string(),
    }
}

/// Body for `POST /courses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: CourseCategory,
    pub date: NaiveDate,
    #[serde(
        default,
        with = "lenient_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        default,
        with = "lenient_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub max_spots: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `PUT /courses/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CourseCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        with = "lenient_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        default,
        with = "lenient_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_spots: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
