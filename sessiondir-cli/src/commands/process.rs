use anyhow::{Context, Result};
use sessiondir_core::SessionDir;
use sessiondir_core::process;

use crate::render::Render;

pub fn run(sessiondir: &SessionDir) -> Result<()> {
    let output = process::process(sessiondir).context("Data processing failed")?;
    println!("{}", output.render());
    Ok(())
}
