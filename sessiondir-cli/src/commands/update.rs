use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sessiondir_core::SessionDir;
use sessiondir_core::process;
use sessiondir_core::update::Updater;

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(sessiondir: &SessionDir, dry_run: bool) -> Result<()> {
    let updater = Updater::new(sessiondir, sessiondir.api_client()?);

    if dry_run {
        let spinner = create_spinner("Checking for new events".to_string());
        let plan = updater.plan().await;
        spinner.finish_and_clear();

        println!("{}", plan.context("Could not fetch upcoming events")?.render());
        return Ok(());
    }

    let spinner = create_spinner("Fetching events and sessions".to_string());
    let report = updater.run().await;
    spinner.finish_and_clear();

    let report = report.context("Update failed")?;
    println!("{}", report.render());

    // Always rebuild so the browsing dataset matches the local files
    println!();
    let output = process::process(sessiondir).context("Data processing failed")?;
    println!("{}", output.render());

    if !report.summary.has_updates() {
        println!("{}", "Dataset is up to date".dimmed());
    }

    Ok(())
}
