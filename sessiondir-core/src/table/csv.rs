//! CSV export in the format the web UI downloads.

use chrono::NaiveDate;

use crate::process::ProcessedSession;

pub const CSV_HEADERS: [&str; 6] = [
    "Date",
    "Session Topic",
    "Location",
    "Description",
    "Presentation URL",
    "Video URL",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Header plus one line per row. The date column is left unquoted.
pub fn to_csv<'a>(rows: impl IntoIterator<Item = &'a ProcessedSession>) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];

    lines.extend(rows.into_iter().map(|s| {
        [
            s.date.clone(),
            quote(&s.session_topic),
            quote(&s.location),
            quote(&s.description),
            quote(&s.presentation_url),
            quote(&s.video_url),
        ]
        .join(",")
    }));

    lines.join("\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("null-sessions-{}.csv", date.format("%Y-%m-%d"))
}
