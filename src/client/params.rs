use super::endpoints::Query;
use crate::models::{CourseCategory, CourseStatus, RegistrationStatus};

#[derive(Debug, Clone, Default)]
pub struct CourseListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<CourseStatus>,
    pub category: Option<CourseCategory>,
}

impl CourseListParams {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("skip", self.skip)
            .opt("limit", self.limit)
            .opt("status", self.status.as_ref())
            .opt("category", self.category.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub course_id: Option<i64>,
    pub status: Option<RegistrationStatus>,
}

impl RegistrationListParams {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("skip", self.skip)
            .opt("limit", self.limit)
            .opt("course_id", self.course_id)
            .opt("status", self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstructorListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub is_active: Option<bool>,
}

impl InstructorListParams {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("skip", self.skip)
            .opt("limit", self.limit)
            .opt("is_active", self.is_active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
}

impl ActivityListParams {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("skip", self.skip)
            .opt("limit", self.limit)
            .opt("category", self.category.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FaqListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub is_active: Option<bool>,
    pub category: Option<String>,
}

impl FaqListParams {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("skip", self.skip)
            .opt("limit", self.limit)
            .opt("is_active", self.is_active)
            .opt("category", self.category.as_deref())
    }
}
