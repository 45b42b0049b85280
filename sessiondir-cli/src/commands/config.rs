use anyhow::Result;
use owo_colors::OwoColorize;
use sessiondir_core::SessionDir;
use sessiondir_core::sessiondir_config::SessionDirConfig;

pub fn run(sessiondir: &SessionDir) -> Result<()> {
    let config_path = SessionDirConfig::config_path()?;
    let config = sessiondir.config();

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!("  Data:      {}", sessiondir.data_path().display());
    println!("  Events:    {}", sessiondir.events_path().display());
    println!("  Sessions:  {}", sessiondir.sessions_path().display());
    println!("  Dataset:   {}", sessiondir.sessions_data_path().display());
    println!("  Summary:   {}", sessiondir.update_summary_path().display());

    println!();
    println!("{}", "Remote".bold());
    println!("  API:       {}", config.api_base_url);
    println!(
        "  Timeouts:  events {}s, sessions {}s, {}ms between requests",
        config.events_timeout_secs, config.sessions_timeout_secs, config.request_delay_ms
    );
    println!("  Shard size: {} events", config.max_events_per_shard);

    Ok(())
}
