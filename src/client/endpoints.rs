use std::fmt::Display;

use reqwest::Url;

use crate::config::ApiConfig;
use crate::error::ConfigError;

/// Resolves REST paths under `<base>/api/v1`.
#[derive(Clone, Debug)]
pub struct Endpoints {
    root: Url,
}

impl Endpoints {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let api_root = config.api_root();
        let root = Url::parse(&api_root)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or(ConfigError::InvalidValue {
                key: "ECO_API_URL",
                value: api_root.clone(),
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    fn path(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn courses(&self) -> Url {
        self.path(&["courses"])
    }

    pub fn courses_upcoming(&self) -> Url {
        self.path(&["courses", "upcoming"])
    }

    pub fn course(&self, id: i64) -> Url {
        self.path(&["courses", &id.to_string()])
    }

    pub fn registrations(&self) -> Url {
        self.path(&["registrations"])
    }

    pub fn registration(&self, id: i64) -> Url {
        self.path(&["registrations", &id.to_string()])
    }

    pub fn registrations_by_email(&self, email: &str) -> Url {
        self.path(&["registrations", "by-email", email])
    }

    pub fn registration_cancel(&self, id: i64) -> Url {
        self.path(&["registrations", &id.to_string(), "cancel"])
    }

    pub fn instructors(&self) -> Url {
        self.path(&["instructors"])
    }

    pub fn instructor(&self, id: i64) -> Url {
        self.path(&["instructors", &id.to_string()])
    }

    pub fn activities(&self) -> Url {
        self.path(&["activities"])
    }

    pub fn activity(&self, id: i64) -> Url {
        self.path(&["activities", &id.to_string()])
    }

    pub fn faqs(&self) -> Url {
        self.path(&["faqs"])
    }

    pub fn faq(&self, id: i64) -> Url {
        self.path(&["faqs", &id.to_string()])
    }
}

/// Ordered query parameters. Only values that are present get a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opt<V: Display>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Appends the pairs to `url`. An empty query leaves the url without `?`.
    pub fn apply(&self, mut url: Url) -> Url {
        if !self.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }
}
