//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template for `--init-config`.
//!
//! Notes:
//! - Unknown XML fields are a hard error so misspelled settings surface early.
//! - Blank values fall back to defaults.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::naming::NamePolicy;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    name_policy: Option<String>,
    principal: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    annotate_created: Option<bool>,
}

// Tolerates surrounding whitespace and yes/no spellings.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => match s.as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
        },
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config on top of the defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(s) = non_blank(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_blank(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_blank(parsed.name_policy.as_deref()) {
        cfg.name_policy = s.parse::<NamePolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_blank(parsed.principal.as_deref()) {
        cfg.principal = s.to_string();
    }
    if let Some(b) = parsed.annotate_created {
        cfg.annotate_created = b;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let cfg = xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))?;
    debug!(path = %path.display(), ?cfg, "config loaded");
    Ok(cfg)
}

/// Load the config file if one exists, else defaults.
/// Returns the path that was read, if any.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let Some(path) = default_config_path() else {
        debug!("no config path could be determined; using defaults");
        return Ok((Config::default(), None));
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok((Config::default(), None));
    }
    let cfg = load_config_from_xml_path(&path)?;
    Ok((cfg, Some(path)))
}

/// Write a commented template config. Refuses to overwrite an existing file
/// or to write below a symlinked directory.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create config dir '{}'", parent.display()))?;
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/cpmove.log".into());

    let content = format!(
        "<!--\n  cpmove configuration (XML)\n\n    log_level         -> quiet | normal | info | debug\n    log_file          -> optional log file, e.g. {suggested_log}\n    name_policy       -> numbered (file-2.txt) | underscore (file.txt_)\n    principal         -> whose clipboard scripts use\n    annotate_created  -> stamp creation times on copied items (true/false)\n\n  CLI flags override these values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <name_policy>numbered</name_policy>\n  <principal>cli</principal>\n  <annotate_created>true</annotate_created>\n</config>\n"
    );

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("create config '{}'", path.display()))?;
    file.write_all(content.as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }

    info!(path = %path.display(), "created template config");
    Ok(())
}
