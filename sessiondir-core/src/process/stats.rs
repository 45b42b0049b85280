use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::process::ProcessedSession;

/// Session counts by location and by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStats {
    pub by_location: BTreeMap<String, usize>,
    pub by_year: BTreeMap<i32, usize>,
}

impl ProcessStats {
    pub fn from_sessions(sessions: &[ProcessedSession]) -> Self {
        let mut stats = ProcessStats::default();

        for session in sessions {
            *stats.by_location.entry(session.location.clone()).or_default() += 1;
            if let Some(year) = session.year() {
                *stats.by_year.entry(year).or_default() += 1;
            }
        }

        stats
    }

    pub fn log(&self) {
        info!("Sessions by location: {:?}", self.by_location);
        info!("Sessions by year: {:?}", self.by_year);
    }
}
