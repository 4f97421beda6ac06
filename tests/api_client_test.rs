use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, RawQuery},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};

use eco_hub::client::{
    CourseCatalog, CourseListParams, EcoApiClient, FaqListParams, RegistrationDesk,
};
use eco_hub::config::ApiConfig;
use eco_hub::error::ApiError;
use eco_hub::models::{CourseStatus, RegistrationRequest, RegistrationStatus};

async fn spawn_backend(app: Router) -> ApiConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server crashed");
    });
    ApiConfig::new(format!("http://{}", addr))
}

fn course(id: i64) -> Value {
    json!({
        "id": id,
        "title": "溪流生態探索",
        "description": "沿著溪流認識水生昆蟲",
        "category": "自然探索",
        "status": "報名中",
        "date": "2025-05-10",
        "start_time": "09:00:00",
        "end_time": "12:00:00",
        "location": "大坑溪",
        "max_spots": 20,
        "current_registrations": 8,
        "available_spots": 12
    })
}

#[tokio::test]
async fn test_not_found_detail_becomes_http_error() {
    let app = Router::new().route(
        "/api/v1/courses/{id}",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "not found"}))) }),
    );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let err = client.get_course(99).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 404,
            message: "not found".to_string()
        }
    );
    assert_eq!(err.user_message(), "not found");
}

#[tokio::test]
async fn test_non_json_error_body_is_unknown_error() {
    let app = Router::new().route(
        "/api/v1/courses/upcoming",
        get(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
    );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let err = client.upcoming_courses(Some(10)).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.user_message(), "未知錯誤");
}

#[tokio::test]
async fn test_validation_detail_array_is_kept_as_json_text() {
    let app = Router::new().route(
        "/api/v1/registrations",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": [{"loc": ["body", "email"], "msg": "invalid"}]})),
            )
        }),
    );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let request = RegistrationRequest {
        course_id: 1,
        name: "a".to_string(),
        email: "b".to_string(),
        phone: "c".to_string(),
        participants: 1,
        notes: None,
    };
    let err = client.create_registration(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.user_message().contains("\"msg\":\"invalid\""));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // grab a free port, then close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EcoApiClient::new(&ApiConfig::new(format!("http://{}", addr))).unwrap();
    let err = client.upcoming_courses(None).await.unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.status(), None);
    assert_eq!(err.user_message(), "網路錯誤，請檢查連線");
}

#[tokio::test]
async fn test_omitted_params_never_reach_the_query_string() {
    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
    let recorder = seen.clone();
    let app = Router::new()
        .route(
            "/api/v1/courses",
            get(move |RawQuery(query): RawQuery| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(query);
                    Json(json!([]))
                }
            }),
        )
        .route(
            "/api/v1/faqs",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(query.as_deref(), Some("is_active=false"));
                Json(json!([]))
            }),
        );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    client
        .list_courses(&CourseListParams::default())
        .await
        .unwrap();
    client
        .list_courses(&CourseListParams {
            skip: Some(0),
            status: Some(CourseStatus::Open),
            ..CourseListParams::default()
        })
        .await
        .unwrap();
    client
        .list_faqs(&FaqListParams {
            is_active: Some(false),
            ..FaqListParams::default()
        })
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], None);
    let second = seen[1].as_deref().unwrap();
    assert!(second.starts_with("skip=0&status="));
    assert!(!second.contains("limit"));
    assert!(!second.contains("category"));
}

#[tokio::test]
async fn test_upcoming_courses_decodes_records() {
    let app = Router::new().route(
        "/api/v1/courses/upcoming",
        get(|RawQuery(query): RawQuery| async move {
            assert_eq!(query.as_deref(), Some("limit=10"));
            Json(json!([course(1), course(2)]))
        }),
    );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let courses = client.upcoming_courses(Some(10)).await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].formatted_time(), "09:00-12:00");
    assert_eq!(courses[1].available_spots, 12);
}

#[tokio::test]
async fn test_create_registration_sends_json_body() {
    async fn create(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(body["course_id"], 5);
        assert_eq!(body["participants"], 3);
        assert!(body.get("notes").is_none());

        let mut created = body.clone();
        created["id"] = json!(101);
        created["status"] = json!("待確認");
        (StatusCode::CREATED, Json(created))
    }

    let app = Router::new().route("/api/v1/registrations", post(create));
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let request = RegistrationRequest {
        course_id: 5,
        name: "陳大明".to_string(),
        email: "ming@example.com".to_string(),
        phone: "0911-222-333".to_string(),
        participants: 3,
        notes: None,
    };
    let registration = client.create_registration(&request).await.unwrap();
    assert_eq!(registration.id, 101);
    assert_eq!(registration.status, RegistrationStatus::Pending);
    assert_eq!(registration.participants, 3);
}

#[tokio::test]
async fn test_by_email_path_is_percent_encoded() {
    let app = Router::new().route(
        "/api/v1/registrations/by-email/{email}",
        get(|Path(email): Path<String>| async move {
            assert_eq!(email, "a b@example.com");
            Json(json!([]))
        }),
    );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let found = client
        .registrations_by_email("a b@example.com")
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_delete_and_cancel_use_expected_methods() {
    let app = Router::new()
        .route(
            "/api/v1/courses/{id}",
            axum::routing::delete(|| async { Json(json!({"message": "Course deleted"})) }),
        )
        .route(
            "/api/v1/registrations/{id}/cancel",
            post(|Path(id): Path<i64>| async move {
                Json(json!({
                    "id": id,
                    "course_id": 1,
                    "name": "x",
                    "email": "x@example.com",
                    "phone": "0900",
                    "participants": 1,
                    "status": "已取消"
                }))
            }),
        );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let ack = client.delete_course(3).await.unwrap();
    assert_eq!(ack.message, "Course deleted");

    let cancelled = client.cancel_registration(8).await.unwrap();
    assert_eq!(cancelled.id, 8);
    assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
}

#[tokio::test]
async fn test_undecodable_success_body_is_network_error() {
    let app = Router::new().route(
        "/api/v1/courses/upcoming",
        get(|| async { Json(json!({"unexpected": true})) }),
    );
    let client = EcoApiClient::new(&spawn_backend(app).await).unwrap();

    let err = client.upcoming_courses(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
}
