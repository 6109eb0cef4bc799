//! `jmdl init` – write the default option file.

use anyhow::{bail, Result};
use jmdl_core::option::{JmOption, OptionContext};
use std::path::Path;
use std::sync::Arc;

pub fn run_init(path: &Path, force: bool, ctx: &Arc<OptionContext>) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let option = JmOption::default_option(ctx)?;
    option.to_file(Some(path))?;
    println!("wrote default option to {}", path.display());
    Ok(())
}
