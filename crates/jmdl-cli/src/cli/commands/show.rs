//! `jmdl show` – print the effective option tree.

use anyhow::Result;
use jmdl_core::option::JmOption;

pub fn run_show(option: &JmOption) -> Result<()> {
    if let Some(path) = option.filepath() {
        println!("# {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&option.deconstruct())?);
    Ok(())
}
