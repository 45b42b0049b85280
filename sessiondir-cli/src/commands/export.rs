use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use owo_colors::OwoColorize;
use sessiondir_core::SessionDir;
use sessiondir_core::table::export_file_name;

use super::TableArgs;

pub fn run(sessiondir: &SessionDir, args: &TableArgs, output: Option<PathBuf>) -> Result<()> {
    let table = args.load_table(sessiondir)?;

    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
    std::fs::write(&path, table.to_csv())
        .with_context(|| format!("Could not write {}", path.display()))?;

    println!(
        "{} {} sessions to {}",
        "Exported".green(),
        table.len(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessiondir_core::Event;
    use sessiondir_core::process;
    use sessiondir_core::record::Session;
    use sessiondir_core::sessiondir_config::SessionDirConfig;

    fn args() -> TableArgs {
        TableArgs {
            search: Some("fuzz".into()),
            location: None,
            year: None,
            resources: None,
            from: None,
            to: None,
            sort: Default::default(),
            asc: false,
        }
    }

    #[test]
    fn test_export_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sessiondir = SessionDir::from_config(SessionDirConfig {
            data_dir: dir.path().to_path_buf(),
            ..SessionDirConfig::default()
        });
        sessiondir.event_store().append(&[Event::new(1, "Meetup", "Pune")]).unwrap();
        sessiondir
            .session_store()
            .save(
                1,
                &[
                    Session::new(1, 1, "Fuzzing Parsers", "2024-03-16T10:00:00Z"),
                    Session::new(2, 1, "Cloud IAM", "2024-03-16T11:00:00Z"),
                ],
            )
            .unwrap();
        process::process(&sessiondir).unwrap();

        let output = dir.path().join("out.csv");
        run(&sessiondir, &args(), Some(output.clone())).unwrap();

        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"Fuzzing Parsers\""));
        assert!(!csv.contains("Cloud IAM"));
    }
}
