//! Session table endpoints (filtered pages and CSV export)

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use sessiondir_core::table::{
    Filters, ResourceFilter, SessionTable, Sort, SortDirection, SortField, export_file_name,
};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", get(list))
        .route("/api/sessions.csv", get(export))
}

/// Query string of the table endpoints, e.g.
/// `?search=xss&resources=video&sort=location&direction=asc&page=2`
///
/// Every field is taken as text so that the empty strings browser forms
/// send for unset fields mean "not set" rather than a rejected request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub year: Option<String>,
    pub resources: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
}

impl TableQuery {
    fn filters(&self) -> Result<Filters, AppError> {
        Ok(Filters {
            search: non_empty(&self.search).map(str::to_string),
            location: non_empty(&self.location).map(str::to_string),
            year: parse_param("year", &self.year)?,
            resources: parse_param::<ResourceFilter>("resources", &self.resources)?,
            date_from: parse_param::<NaiveDate>("dateFrom", &self.date_from)?,
            date_to: parse_param::<NaiveDate>("dateTo", &self.date_to)?,
        })
    }

    fn sort(&self) -> Result<Sort, AppError> {
        let field = parse_param::<SortField>("sort", &self.sort)?.unwrap_or_default();
        let direction = parse_param::<SortDirection>("direction", &self.direction)?.unwrap_or_default();
        Ok(Sort::new(field, direction))
    }

    fn page(&self) -> Result<Option<usize>, AppError> {
        parse_param("page", &self.page)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_param<T>(name: &str, value: &Option<String>) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    non_empty(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid {name} '{raw}': {e}")))
        })
        .transpose()
}

async fn load_table(state: &AppState, query: &TableQuery) -> Result<SessionTable, AppError> {
    let filters = query.filters()?;
    let sort = query.sort()?;

    let sessiondir = state.sessiondir();
    let path = sessiondir.sessions_data_path();
    let mut table = tokio::task::spawn_blocking(move || SessionTable::load(&path))
        .await??
        .with_page_size(sessiondir.config().page_size);

    table.set_filters(filters);
    table.set_sort(sort);
    Ok(table)
}

/// GET /api/sessions - One page of the filtered, sorted table
async fn list(State(state): State<AppState>, Query(query): Query<TableQuery>) -> Result<Response, AppError> {
    let page = query.page()?;
    let mut table = load_table(&state, &query).await?;

    match page {
        Some(page) if !table.is_empty() && !table.go_to_page(page) => {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Page {} does not exist ({} pages)",
                page,
                table.total_pages()
            )));
        }
        _ => {}
    }

    Ok(Json(table.page()).into_response())
}

/// GET /api/sessions.csv - Every row passing the filters, as CSV
async fn export(State(state): State<AppState>, Query(query): Query<TableQuery>) -> Result<Response, AppError> {
    let table = load_table(&state, &query).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        table.to_csv(),
    )
        .into_response())
}
