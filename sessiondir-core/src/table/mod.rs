//! In-memory session table: the filter, sort and pagination model behind
//! the browsing UI, plus CSV export of the visible rows.

mod csv;
mod filter;
mod sort;

pub use csv::{CSV_HEADERS, export_file_name, to_csv};
pub use filter::{Filters, ResourceFilter};
pub use sort::{Sort, SortDirection, SortField};

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_VISIBLE_PAGES};
use crate::error::SessionDirResult;
use crate::process::ProcessedSession;
use crate::store::read_json;

/// One page of the table, ready to serialize for a client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    pub items: Vec<&'a ProcessedSession>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub page_size: usize,
    pub label: String,
    pub page_window: Vec<usize>,
    pub filters: &'a Filters,
    pub sort: Sort,
}

#[derive(Debug, Clone)]
pub struct SessionTable {
    sessions: Vec<ProcessedSession>,
    /// Indices into `sessions` that pass the filters, in display order.
    visible: Vec<usize>,
    filters: Filters,
    sort: Sort,
    page: usize,
    page_size: usize,
}

impl SessionTable {
    pub fn new(sessions: Vec<ProcessedSession>) -> Self {
        let mut table = SessionTable {
            visible: (0..sessions.len()).collect(),
            sessions,
            filters: Filters::default(),
            sort: Sort::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        };
        table.apply_sort();
        table
    }

    /// Load the flattened dataset. A missing file yields an empty table.
    pub fn load(path: &Path) -> SessionDirResult<Self> {
        if !path.exists() {
            return Ok(Self::new(Vec::new()));
        }
        Ok(Self::new(read_json(path)?))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.page = 1;
        self
    }

    pub fn sessions(&self) -> &[ProcessedSession] {
        &self.sessions
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the filters. Resets to the first page.
    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(Filters::default());
    }

    /// Clear year, resources and date range but keep search and location.
    pub fn reset_advanced_filters(&mut self) {
        let mut filters = self.filters.clone();
        filters.reset_advanced();
        self.set_filters(filters);
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = sort;
        self.apply_sort();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.apply_sort();
    }

    fn apply_filters(&mut self) {
        self.visible = self
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| self.filters.matches(s))
            .map(|(i, _)| i)
            .collect();
        self.page = 1;
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let sessions = &self.sessions;
        let sort = self.sort;
        self.visible
            .sort_by(|&a, &b| sort.compare(&sessions[a], &sessions[b]));
    }

    /// Number of rows passing the filters.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// All rows passing the filters, in sort order.
    pub fn rows(&self) -> impl Iterator<Item = &ProcessedSession> {
        self.visible.iter().map(|&i| &self.sessions[i])
    }

    pub fn total_pages(&self) -> usize {
        self.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Move to `page` if it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    pub fn page_rows(&self) -> Vec<&ProcessedSession> {
        let start = (self.page - 1) * self.page_size;
        self.rows().skip(start).take(self.page_size).collect()
    }

    /// Page numbers for the pagination bar: at most five, centred on the
    /// current page where possible.
    pub fn page_window(&self) -> Vec<usize> {
        let total = self.total_pages();
        let mut start = self.page.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
        let end = total.min(start + MAX_VISIBLE_PAGES - 1);

        if end + 1 < start + MAX_VISIBLE_PAGES {
            start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
        }

        (start..=end).collect()
    }

    /// "Showing 51-100 of 230 sessions"
    pub fn results_label(&self) -> String {
        let total = self.len();
        if total == 0 {
            return "No sessions found".to_string();
        }

        let start = (self.page - 1) * self.page_size + 1;
        let end = (self.page * self.page_size).min(total);
        format!("Showing {start}-{end} of {total} sessions")
    }

    /// Distinct locations, alphabetical.
    pub fn locations(&self) -> Vec<&str> {
        self.sessions
            .iter()
            .map(|s| s.location.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct start years, newest first.
    pub fn years(&self) -> Vec<i32> {
        self.sessions
            .iter()
            .filter_map(|s| s.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    pub fn page(&self) -> Page<'_> {
        Page {
            items: self.page_rows(),
            page: self.page,
            total_pages: self.total_pages(),
            total: self.len(),
            page_size: self.page_size,
            label: self.results_label(),
            page_window: self.page_window(),
            filters: &self.filters,
            sort: self.sort,
        }
    }

    /// CSV of every row passing the filters, in sort order.
    pub fn to_csv(&self) -> String {
        to_csv(self.rows())
    }
}
