//! TUI rendering traits for sessiondir types.
//!
//! Extension traits that add colored terminal rendering to sessiondir-core
//! types using owo_colors.

use owo_colors::OwoColorize;
use sessiondir_core::Event;
use sessiondir_core::diff::IngestPlan;
use sessiondir_core::process::{ProcessOutput, ProcessedSession};
use sessiondir_core::summary::{UpdateSummary, pluralize};
use sessiondir_core::table::SessionTable;
use sessiondir_core::update::UpdateReport;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Threshold for compact view (show counts instead of individual events)
const COMPACT_THRESHOLD: usize = 10;

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            "+".green(),
            self.display_name().green(),
            format!("#{} {}", self.id, self.location()).dimmed()
        )
    }
}

fn render_event_list(title: &str, events: &[Event], lines: &mut Vec<String>) {
    if events.is_empty() {
        return;
    }

    lines.push(format!("   {}", title.dimmed()));
    if events.len() <= COMPACT_THRESHOLD {
        lines.extend(events.iter().map(|e| format!("   {}", e.render())));
    } else {
        let label = format!("({} {})", events.len(), pluralize("event", events.len()));
        lines.push(format!("   {} {}", "+".green(), label.green()));
    }
}

impl Render for IngestPlan {
    fn render(&self) -> String {
        if self.is_empty() {
            return "   Everything is up to date".dimmed().to_string();
        }

        let mut lines = Vec::new();
        render_event_list("New events (to fetch):", &self.new_events, &mut lines);

        if !self.new_events.is_empty() && !self.missing_sessions.is_empty() {
            lines.push(String::new());
        }
        render_event_list(
            "Events without sessions (to backfill):",
            &self.missing_sessions,
            &mut lines,
        );

        lines.join("\n")
    }
}

impl Render for UpdateSummary {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            "Last update:".bold(),
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )];

        lines.push(format!(
            "   {} new {}, {} new {}",
            self.new_events,
            pluralize("event", self.new_events),
            self.new_sessions,
            pluralize("session", self.new_sessions)
        ));

        for event in self.events.iter().take(COMPACT_THRESHOLD) {
            lines.push(format!(
                "   {} {} {}",
                "+".green(),
                event.name.as_deref().unwrap_or("(untitled)").green(),
                format!("#{} {}", event.id, event.chapter).dimmed()
            ));
        }

        if let Some(banner) = self.banner_message() {
            lines.push(String::new());
            lines.push(format!("   {}", banner.cyan()));
        }

        lines.join("\n")
    }
}

impl Render for UpdateReport {
    fn render(&self) -> String {
        let mut lines = vec![self.summary.render()];

        if !self.appended.created.is_empty() {
            let names: Vec<String> = self
                .appended
                .created
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            lines.push(format!("   {} {}", "New shards:".dimmed(), names.join(", ")));
        }

        if self.reconciled.processed > 0 {
            lines.push(format!(
                "   {}",
                format!(
                    "Backfilled {} {} without sessions ({} sessions added)",
                    self.reconciled.processed,
                    pluralize("event", self.reconciled.processed),
                    self.reconciled.sessions_added
                )
                .dimmed()
            ));
        }

        lines.join("\n")
    }
}

impl Render for ProcessOutput {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} sessions to {}",
            "Wrote".bold(),
            self.sessions.len(),
            self.output_path.display()
        )];

        if !self.stats.by_year.is_empty() {
            let years: Vec<String> = self
                .stats
                .by_year
                .iter()
                .rev()
                .map(|(year, count)| format!("{year}: {count}"))
                .collect();
            lines.push(format!("   {} {}", "By year:".dimmed(), years.join(", ")));
        }

        if !self.stats.by_location.is_empty() {
            let mut locations: Vec<(&String, &usize)> = self.stats.by_location.iter().collect();
            locations.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let top: Vec<String> = locations
                .into_iter()
                .take(COMPACT_THRESHOLD)
                .map(|(location, count)| format!("{location}: {count}"))
                .collect();
            lines.push(format!("   {} {}", "By location:".dimmed(), top.join(", ")));
        }

        lines.join("\n")
    }
}

fn resource_icons(session: &ProcessedSession) -> String {
    let slides = if session.has_presentation() {
        "slides".green().to_string()
    } else {
        "slides".dimmed().to_string()
    };
    let video = if session.has_video() {
        "video".green().to_string()
    } else {
        "video".dimmed().to_string()
    };
    format!("{slides} {video}")
}

impl Render for ProcessedSession {
    fn render(&self) -> String {
        let mut line = format!(
            "{}  {}  {}  {}",
            self.date.dimmed(),
            self.session_topic.bold(),
            self.location.cyan(),
            resource_icons(self)
        );

        if let Some(description) = self.short_description() {
            line.push_str(&format!("\n            {}", description.dimmed()));
        }

        line
    }
}

impl Render for SessionTable {
    fn render(&self) -> String {
        if self.is_empty() {
            return "No sessions found".dimmed().to_string();
        }

        let mut lines: Vec<String> = self.page_rows().iter().map(|s| s.render()).collect();

        let window: Vec<String> = self
            .page_window()
            .into_iter()
            .map(|p| {
                if p == self.current_page() {
                    format!("[{p}]").bold().to_string()
                } else {
                    p.to_string()
                }
            })
            .collect();

        lines.push(String::new());
        lines.push(format!(
            "{}   {} {}",
            self.results_label().dimmed(),
            "Pages:".dimmed(),
            window.join(" ")
        ));

        lines.join("\n")
    }
}
