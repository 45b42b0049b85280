use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::process::ProcessedSession;

/// Which linked resources a session must (or must not) have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFilter {
    Presentation,
    Video,
    Both,
    Any,
    None,
}

impl ResourceFilter {
    pub fn matches(self, session: &ProcessedSession) -> bool {
        let presentation = session.has_presentation();
        let video = session.has_video();

        match self {
            ResourceFilter::Presentation => presentation,
            ResourceFilter::Video => video,
            ResourceFilter::Both => presentation && video,
            ResourceFilter::Any => presentation || video,
            ResourceFilter::None => !presentation && !video,
        }
    }
}

impl FromStr for ResourceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "presentation" => Ok(ResourceFilter::Presentation),
            "video" => Ok(ResourceFilter::Video),
            "both" => Ok(ResourceFilter::Both),
            "any" => Ok(ResourceFilter::Any),
            "none" => Ok(ResourceFilter::None),
            other => Err(format!(
                "unknown resource filter '{other}' (expected presentation, video, both, any or none)"
            )),
        }
    }
}

impl fmt::Display for ResourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceFilter::Presentation => "presentation",
            ResourceFilter::Video => "video",
            ResourceFilter::Both => "both",
            ResourceFilter::Any => "any",
            ResourceFilter::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Row predicates of the session table. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filters {
    /// Case-insensitive substring of the topic or description.
    pub search: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub resources: Option<ResourceFilter>,
    /// Inclusive bounds on the UTC date of the start time.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        *self == Filters::default()
    }

    /// Clear everything except search and location.
    pub fn reset_advanced(&mut self) {
        self.year = None;
        self.resources = None;
        self.date_from = None;
        self.date_to = None;
    }

    pub fn matches(&self, session: &ProcessedSession) -> bool {
        if let Some(term) = self.search_term() {
            let topic = session.session_topic.to_lowercase();
            let description = session.description.to_lowercase();
            if !topic.contains(&term) && !description.contains(&term) {
                return false;
            }
        }

        if self
            .location
            .as_deref()
            .is_some_and(|l| !l.is_empty() && session.location != l)
        {
            return false;
        }

        if self.year.is_some_and(|year| session.year() != Some(year)) {
            return false;
        }

        if self.resources.is_some_and(|r| !r.matches(session)) {
            return false;
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = session.utc_date() else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}
