use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A past event shown in the activity gallery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub participants_count: Option<i32>,
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_or_missing_photos_decode_as_empty() {
        let with_null: Activity = serde_json::from_value(json!({
            "id": 4,
            "title": "淨灘活動",
            "photos": null
        }))
        .unwrap();
        assert!(with_null.photos.is_empty());

        let missing: Activity =
            serde_json::from_value(json!({"id": 5, "title": "夜觀"})).unwrap();
        assert!(missing.photos.is_empty());
    }
}
