//! Config validation.

use anyhow::{bail, Result};
use tracing::debug;

use super::paths::path_has_symlink_ancestor;
use super::types::Config;

impl Config {
    /// Reject settings the runner cannot honour.
    pub fn validate(&self) -> Result<()> {
        let principal = self.principal.trim();
        if principal.is_empty() {
            bail!("principal must not be empty");
        }
        if principal.chars().any(char::is_whitespace) {
            bail!("principal '{principal}' must not contain whitespace");
        }
        if let Some(log_file) = &self.log_file {
            if log_file.is_dir() {
                bail!("log_file '{}' is a directory", log_file.display());
            }
            if path_has_symlink_ancestor(log_file)? {
                bail!("log_file '{}' has a symlinked ancestor", log_file.display());
            }
        }
        debug!(
            principal,
            name_policy = %self.name_policy,
            annotate_created = self.annotate_created,
            log_file = %self
                .log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into()),
            "config validated"
        );
        Ok(())
    }
}
