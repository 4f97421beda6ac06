use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::CourseCatalog;
use crate::error::ApiError;
use crate::models::Course;
use crate::notify::{Notification, Notifier};
use crate::services::registration_modal::CourseSummary;

pub const PAGE_SIZE: u32 = 10;
pub const LOAD_FAILED_TITLE: &str = "載入失敗";
pub const LOAD_FAILED_DESCRIPTION: &str = "無法載入課程資料，請稍後再試";
pub const NO_COURSES_NOTICE: &str = "目前沒有可報名的課程";

/// View-ready fields for one course card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCard {
    pub id: i64,
    pub image_url: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: String,
    pub time: String,
    pub location: String,
    /// Server-computed `available_spots`, shown as-is.
    pub spots: i32,
}

impl CourseCard {
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id,
            image_url: course.image_url.clone(),
            title: course.title.clone(),
            description: course.description.clone().unwrap_or_default(),
            category: course.category.to_string(),
            date: course.formatted_date(),
            time: course.formatted_time(),
            location: course.location.clone().unwrap_or_default(),
            spots: course.available_spots,
        }
    }

    pub fn spots_label(&self) -> String {
        format!("剩餘 {} 名", self.spots)
    }

    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            id: self.id,
            title: self.title.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Populated(Vec<CourseCard>),
    Empty,
    Failed(ApiError),
}

/// Fetches the upcoming-courses page each time it is activated.
pub struct CourseListLoader {
    catalog: Arc<dyn CourseCatalog>,
    notifier: Arc<dyn Notifier>,
    state: LoadState,
}

impl CourseListLoader {
    pub fn new(catalog: Arc<dyn CourseCatalog>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            catalog,
            notifier,
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub async fn activate(&mut self) -> &LoadState {
        self.state = LoadState::Loading;
        debug!("loading upcoming courses (limit {})", PAGE_SIZE);

        self.state = match self.catalog.upcoming_courses(Some(PAGE_SIZE)).await {
            Ok(courses) if courses.is_empty() => {
                info!("{}", NO_COURSES_NOTICE);
                LoadState::Empty
            }
            Ok(courses) => {
                info!("loaded {} upcoming courses", courses.len());
                LoadState::Populated(courses.iter().map(CourseCard::from_course).collect())
            }
            Err(err) => {
                error!("failed to load upcoming courses: {:?}", err);
                self.notifier.notify(Notification::destructive(
                    LOAD_FAILED_TITLE,
                    LOAD_FAILED_DESCRIPTION,
                ));
                LoadState::Failed(err)
            }
        };

        &self.state
    }

    pub fn cards(&self) -> &[CourseCard] {
        match &self.state {
            LoadState::Populated(cards) => cards,
            _ => &[],
        }
    }

    pub fn course_summary(&self, id: i64) -> Option<CourseSummary> {
        self.cards()
            .iter()
            .find(|card| card.id == id)
            .map(CourseCard::summary)
    }
}
