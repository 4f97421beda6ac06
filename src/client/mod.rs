pub mod endpoints;
pub mod params;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ConfigError, REQUEST_FAILED, UNKNOWN_ERROR};
use crate::models::{
    Activity, Course, CourseDraft, CourseUpdate, Faq, Instructor, Message, Registration,
    RegistrationRequest, RegistrationWithCourse,
};

pub use endpoints::{Endpoints, Query};
pub use params::{
    ActivityListParams, CourseListParams, FaqListParams, InstructorListParams,
    RegistrationListParams,
};

/// Read side used by the course list loader.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn upcoming_courses(&self, limit: Option<u32>) -> Result<Vec<Course>, ApiError>;
}

/// Write side used by the registration modal.
#[async_trait]
pub trait RegistrationDesk: Send + Sync {
    async fn create_registration(
        &self,
        request: &RegistrationRequest,
    ) -> Result<Registration, ApiError>;
}

/// Per-call options for [`EcoApiClient::request`].
///
/// Caller headers are layered on top of `Content-Type: application/json`,
/// so a caller can override it.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json<B: Serialize + ?Sized>(method: Method, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_vec(body)
            .map_err(|e| ApiError::network(format!("failed to encode request body: {e}")))?;
        Ok(Self {
            method,
            headers: HeaderMap::new(),
            body: Some(body),
        })
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP client for the eco-adventures REST API.
#[derive(Clone, Debug)]
pub struct EcoApiClient {
    client: Client,
    endpoints: Endpoints,
}

impl EcoApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoints = Endpoints::new(config)?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Single choke point for every call: sends, then normalizes the outcome
    /// into a decoded `T` or an [`ApiError`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let RequestOptions {
            method,
            headers,
            body,
        } = options;

        let mut merged = HeaderMap::new();
        merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers.iter() {
            merged.insert(name.clone(), value.clone());
        }

        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), url.clone()).headers(merged);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed before a response arrived: {}", method, url, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.ok();
            let message = error_message(body.as_deref());
            warn!("{} {} returned {}: {}", method, url, status.as_u16(), message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            warn!("{} {} returned an undecodable body: {}", method, url, e);
            ApiError::from(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.request(url, RequestOptions::method(Method::GET)).await
    }

    async fn send_json<T, B>(&self, method: Method, url: Url, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(url, RequestOptions::json(method, body)?).await
    }

    // courses

    pub async fn list_courses(&self, params: &CourseListParams) -> Result<Vec<Course>, ApiError> {
        self.get(params.to_query().apply(self.endpoints.courses()))
            .await
    }

    pub async fn get_course(&self, id: i64) -> Result<Course, ApiError> {
        self.get(self.endpoints.course(id)).await
    }

    pub async fn create_course(&self, draft: &CourseDraft) -> Result<Course, ApiError> {
        self.send_json(Method::POST, self.endpoints.courses(), draft)
            .await
    }

    pub async fn update_course(&self, id: i64, update: &CourseUpdate) -> Result<Course, ApiError> {
        self.send_json(Method::PUT, self.endpoints.course(id), update)
            .await
    }

    pub async fn delete_course(&self, id: i64) -> Result<Message, ApiError> {
        self.request(self.endpoints.course(id), RequestOptions::method(Method::DELETE))
            .await
    }

    // registrations

    pub async fn registrations_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<RegistrationWithCourse>, ApiError> {
        self.get(self.endpoints.registrations_by_email(email)).await
    }

    pub async fn get_registration(&self, id: i64) -> Result<Registration, ApiError> {
        self.get(self.endpoints.registration(id)).await
    }

    pub async fn cancel_registration(&self, id: i64) -> Result<Registration, ApiError> {
        self.request(
            self.endpoints.registration_cancel(id),
            RequestOptions::method(Method::POST),
        )
        .await
    }

    pub async fn list_registrations(
        &self,
        params: &RegistrationListParams,
    ) -> Result<Vec<Registration>, ApiError> {
        self.get(params.to_query().apply(self.endpoints.registrations()))
            .await
    }

    // site content

    pub async fn list_instructors(
        &self,
        params: &InstructorListParams,
    ) -> Result<Vec<Instructor>, ApiError> {
        self.get(params.to_query().apply(self.endpoints.instructors()))
            .await
    }

    pub async fn get_instructor(&self, id: i64) -> Result<Instructor, ApiError> {
        self.get(self.endpoints.instructor(id)).await
    }

    pub async fn list_activities(
        &self,
        params: &ActivityListParams,
    ) -> Result<Vec<Activity>, ApiError> {
        self.get(params.to_query().apply(self.endpoints.activities()))
            .await
    }

    pub async fn get_activity(&self, id: i64) -> Result<Activity, ApiError> {
        self.get(self.endpoints.activity(id)).await
    }

    pub async fn list_faqs(&self, params: &FaqListParams) -> Result<Vec<Faq>, ApiError> {
        self.get(params.to_query().apply(self.endpoints.faqs()))
            .await
    }

    pub async fn get_faq(&self, id: i64) -> Result<Faq, ApiError> {
        self.get(self.endpoints.faq(id)).await
    }
}

#[async_trait]
impl CourseCatalog for EcoApiClient {
    async fn upcoming_courses(&self, limit: Option<u32>) -> Result<Vec<Course>, ApiError> {
        let url = Query::new()
            .opt("limit", limit)
            .apply(self.endpoints.courses_upcoming());
        self.get(url).await
    }
}

#[async_trait]
impl RegistrationDesk for EcoApiClient {
    async fn create_registration(
        &self,
        request: &RegistrationRequest,
    ) -> Result<Registration, ApiError> {
        self.send_json(Method::POST, self.endpoints.registrations(), request)
            .await
    }
}

/// Extracts a user-facing message from a non-2xx body.
///
/// Not JSON → [`UNKNOWN_ERROR`]; JSON without a truthy `detail` (zero
/// included) →
/// [`REQUEST_FAILED`]; non-string `detail` → its JSON text.
pub(crate) fn error_message(body: Option<&[u8]>) -> String {
    let Some(parsed) = body.and_then(|b| serde_json::from_slice::<Value>(b).ok()) else {
        return UNKNOWN_ERROR.to_string();
    };

    match parsed.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Bool(false)) => {
            REQUEST_FAILED.to_string()
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => REQUEST_FAILED.to_string(),
        Some(other) => other.to_string(),
    }
}
