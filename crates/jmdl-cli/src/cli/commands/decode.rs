//! `jmdl decode` – decrypt an API envelope payload.

use anyhow::Result;
use jmdl_core::envelope;

pub fn run_decode(ts: &str, data: &str) -> Result<()> {
    let plain = envelope::decode(data.trim(), ts)?;
    match serde_json::from_str::<serde_json::Value>(&plain) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", plain),
    }
    Ok(())
}
