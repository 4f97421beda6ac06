use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use eco_hub::client::CourseCatalog;
use eco_hub::error::ApiError;
use eco_hub::models::Course;
use eco_hub::notify::{ChannelNotifier, Variant};
use eco_hub::services::{CourseListLoader, LoadState};

/// Hands out scripted responses in order and records requested limits.
struct ScriptedCatalog {
    responses: Mutex<Vec<Result<Vec<Course>, ApiError>>>,
    limits: Mutex<Vec<Option<u32>>>,
}

impl ScriptedCatalog {
    fn new(responses: Vec<Result<Vec<Course>, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            limits: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CourseCatalog for ScriptedCatalog {
    async fn upcoming_courses(&self, limit: Option<u32>) -> Result<Vec<Course>, ApiError> {
        self.limits.lock().unwrap().push(limit);
        self.responses.lock().unwrap().remove(0)
    }
}

fn course(id: i64, start: Option<&str>, end: Option<&str>) -> Course {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("課程 {id}"),
        "description": "戶外觀察",
        "image_url": format!("https://img.example.com/{id}.jpg"),
        "category": "體驗活動",
        "status": "報名中",
        "date": "2025-06-01",
        "start_time": start,
        "end_time": end,
        "location": "植物園",
        "max_spots": 15,
        "current_registrations": 15,
        "available_spots": 3
    }))
    .expect("course fixture should decode")
}

#[tokio::test]
async fn test_empty_catalog_yields_empty_state() {
    let catalog = ScriptedCatalog::new(vec![Ok(vec![])]);
    let (notifier, mut rx) = ChannelNotifier::new();
    let mut loader = CourseListLoader::new(catalog.clone(), Arc::new(notifier));

    assert_eq!(loader.state(), &LoadState::Loading);
    assert_eq!(loader.activate().await, &LoadState::Empty);
    assert!(loader.cards().is_empty());
    assert_eq!(*catalog.limits.lock().unwrap(), vec![Some(10)]);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_courses_are_mapped_to_cards() {
    let catalog = ScriptedCatalog::new(vec![Ok(vec![
        course(1, Some("09:00:00"), Some("11:00:00")),
        course(2, Some("13:00:00"), None),
    ])]);
    let (notifier, _rx) = ChannelNotifier::new();
    let mut loader = CourseListLoader::new(catalog, Arc::new(notifier));

    loader.activate().await;
    let cards = loader.cards();
    assert_eq!(cards.len(), 2);

    assert_eq!(cards[0].time, "09:00-11:00");
    assert_eq!(cards[1].time, "時間未定");
    assert_eq!(cards[0].category, "體驗活動");
    assert_eq!(cards[0].image_url.as_deref(), Some("https://img.example.com/1.jpg"));
    // taken from available_spots, not recomputed
    assert_eq!(cards[0].spots, 3);

    let summary = loader.course_summary(2).expect("course 2 is loaded");
    assert_eq!(summary.title, "課程 2");
    assert_eq!(summary.date, "2025-06-01");
    assert!(loader.course_summary(3).is_none());
}

#[tokio::test]
async fn test_failure_sets_failed_and_notifies() {
    let catalog = ScriptedCatalog::new(vec![Err(ApiError::network("connection refused"))]);
    let (notifier, mut rx) = ChannelNotifier::new();
    let mut loader = CourseListLoader::new(catalog, Arc::new(notifier));

    let state = loader.activate().await.clone();
    assert!(matches!(state, LoadState::Failed(ApiError::Network { .. })));
    assert!(loader.cards().is_empty());

    let note = rx.try_recv().expect("a notification should be sent");
    assert_eq!(note.variant, Variant::Destructive);
    assert_eq!(note.title, "載入失敗");
    assert_eq!(note.description, "無法載入課程資料，請稍後再試");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_reactivation_refetches() {
    let catalog = ScriptedCatalog::new(vec![
        Err(ApiError::Http {
            status: 500,
            message: "boom".to_string(),
        }),
        Ok(vec![course(4, None, None)]),
    ]);
    let (notifier, _rx) = ChannelNotifier::new();
    let mut loader = CourseListLoader::new(catalog.clone(), Arc::new(notifier));

    assert!(matches!(loader.activate().await, LoadState::Failed(_)));
    assert!(matches!(loader.activate().await, LoadState::Populated(cards) if cards.len() == 1));
    assert_eq!(catalog.limits.lock().unwrap().len(), 2);
}
