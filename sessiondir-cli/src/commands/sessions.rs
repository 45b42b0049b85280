use anyhow::Result;
use owo_colors::OwoColorize;
use sessiondir_core::SessionDir;

use super::TableArgs;
use crate::render::Render;

pub fn run(sessiondir: &SessionDir, args: &TableArgs, page: usize) -> Result<()> {
    let mut table = args.load_table(sessiondir)?;

    if !table.is_empty() && !table.go_to_page(page) {
        anyhow::bail!(
            "Page {} does not exist ({} {} available)",
            page,
            table.total_pages(),
            if table.total_pages() == 1 { "page" } else { "pages" }
        );
    }

    println!("{}", table.render());

    if table.filters().is_empty() && page == 1 {
        let locations = table.locations();
        if !locations.is_empty() {
            println!("{} {}", "Locations:".dimmed(), locations.join(", ").dimmed());
        }
    }

    Ok(())
}
