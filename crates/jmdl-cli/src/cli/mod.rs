//! CLI for the JMDL catalog client.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jmdl_core::option::{self, JmOption, OptionContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use commands::{parse_assignment, run_decode, run_dir, run_init, run_show};

/// Top-level CLI for JMDL.
#[derive(Debug, Parser)]
#[command(name = "jmdl")]
#[command(about = "JMDL: option files, directory rules and API envelopes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Write the default option file.
    Init {
        /// Target file (.toml, .json, .yml); defaults to the user config file.
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective option, merged over defaults.
    Show {
        /// Option file to load instead of the user config file.
        #[arg(long)]
        option: Option<PathBuf>,
    },

    /// Preview the save directory the dir rule picks for an album/photo.
    Dir {
        #[arg(long)]
        option: Option<PathBuf>,
        /// Album field, e.g. `--album id=350234 --album author=someone`.
        #[arg(long = "album", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        album: Vec<(String, String)>,
        /// Photo field, e.g. `--photo index=2`.
        #[arg(long = "photo", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        photo: Vec<(String, String)>,
    },

    /// Decode an API envelope `data` payload.
    Decode {
        /// Request timestamp the envelope was sealed with.
        #[arg(long)]
        ts: String,
        /// Base64 ciphertext.
        data: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let ctx = Arc::new(OptionContext::from_current_dir());

        match cli.command {
            CliCommand::Init { path, force } => {
                let path = match path {
                    Some(p) => p,
                    None => option::config_path()?,
                };
                run_init(&path, force, &ctx)?;
            }
            CliCommand::Show { option } => {
                let option = load_option(option.as_deref(), &ctx)?;
                run_show(&option)?;
            }
            CliCommand::Dir {
                option,
                album,
                photo,
            } => {
                let option = load_option(option.as_deref(), &ctx)?;
                run_dir(&option, &album, &photo)?;
            }
            CliCommand::Decode { ts, data } => run_decode(&ts, &data)?,
        }

        Ok(())
    }
}

/// Loads `path`, or the user config file (created with defaults when absent).
fn load_option(path: Option<&Path>, ctx: &Arc<OptionContext>) -> Result<JmOption> {
    match path {
        Some(p) => JmOption::from_file(p, ctx),
        None => option::load_or_init(ctx).context("load user option file"),
    }
}

#[cfg(test)]
mod tests;
