pub mod config;
pub mod export;
pub mod process;
pub mod sessions;
pub mod status;
pub mod update;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use sessiondir_core::SessionDir;
use sessiondir_core::table::{Filters, ResourceFilter, SessionTable, Sort, SortDirection, SortField};

/// Filter and sort options shared by `sessions` and `export`.
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Search session topics and descriptions
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only sessions held at this location (chapter)
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(short, long)]
    pub year: Option<i32>,

    /// presentation, video, both, any or none
    #[arg(short, long)]
    pub resources: Option<ResourceFilter>,

    /// Sessions starting on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Sessions starting on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Sort by date, topic or location
    #[arg(long, default_value = "date")]
    pub sort: SortField,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,
}

impl TableArgs {
    pub fn filters(&self) -> Filters {
        Filters {
            search: self.search.clone(),
            location: self.location.clone(),
            year: self.year,
            resources: self.resources,
            date_from: self.from,
            date_to: self.to,
        }
    }

    pub fn sort(&self) -> Sort {
        let direction = if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Sort::new(self.sort, direction)
    }

    /// Load the browsing dataset with these filters and sort applied.
    pub fn load_table(&self, sessiondir: &SessionDir) -> Result<SessionTable> {
        let path = sessiondir.sessions_data_path();
        let mut table = SessionTable::load(&path)
            .with_context(|| format!("Could not load {}", path.display()))?
            .with_page_size(sessiondir.config().page_size);

        table.set_filters(self.filters());
        table.set_sort(self.sort());
        Ok(table)
    }
}
