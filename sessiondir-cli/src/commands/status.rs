use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sessiondir_core::SessionDir;
use sessiondir_core::summary::UpdateSummary;
use sessiondir_core::update::Updater;

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(sessiondir: &SessionDir, check: bool) -> Result<()> {
    let path = sessiondir.update_summary_path();
    let summary = UpdateSummary::load(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    match summary {
        Some(summary) => println!("{}", summary.render()),
        None => println!(
            "{}",
            "No update summary available. Run `sessiondir update` first.".dimmed()
        ),
    }

    if check {
        let updater = Updater::new(sessiondir, sessiondir.api_client()?);

        let spinner = create_spinner("Checking remote events".to_string());
        let plan = updater.plan().await;
        spinner.finish_and_clear();

        println!();
        println!("{}", "Pending".bold());
        println!("{}", plan.context("Could not fetch upcoming events")?.render());
    }

    Ok(())
}
