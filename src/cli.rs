//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - SCRIPT is read from stdin when it is `-` or omitted.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::naming::NamePolicy;

/// Run move/copy/rename/paste scripts against an in-memory namespace.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Move, copy and rename items in a container namespace")]
pub struct Args {
    /// Command script to run (`-` for stdin).
    #[arg(value_name = "SCRIPT", value_hint = ValueHint::FilePath)]
    pub script: Option<PathBuf>,

    /// XML layout describing the initial tree (empty root if omitted).
    #[arg(long, short = 't', value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub tree: Option<PathBuf>,

    /// Principal whose clipboard the script uses.
    #[arg(long, short = 'p', value_name = "ID")]
    pub principal: Option<String>,

    /// Collision policy for chosen names: numbered or underscore.
    #[arg(long, value_name = "POLICY")]
    pub name_policy: Option<String>,

    /// Do not stamp creation times on copied items.
    #[arg(long)]
    pub no_annotate: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Print where cpmove looks for its config file (or CPMOVE_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by cpmove and exit")]
    pub print_config: bool,

    /// Write a template config to the config location, then exit.
    #[arg(long, help = "Write a template config file and exit")]
    pub init_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Skip printing the final tree after the script.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Script path, or None for stdin.
    pub fn script_path(&self) -> Option<&std::path::Path> {
        self.script.as_deref().filter(|p| p.as_os_str() != "-")
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<(), String> {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.principal {
            cfg.principal = p.trim().to_string();
        }
        if let Some(policy) = &self.name_policy {
            cfg.name_policy = policy.parse::<NamePolicy>()?;
        }
        if self.no_annotate {
            cfg.annotate_created = false;
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
