//! Apply a principal's clipboard to a target container.

use tracing::{info, warn};

use crate::clipboard::{ClipboardAction, PrincipalClipboard};
use crate::errors::{NamespaceError, NsResult};
use crate::namespace::ItemId;
use crate::site::Site;

use super::{ObjectCopier, ObjectMover};

/// Outcome of a paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteReport {
    /// Applied entries with the name each item landed under.
    pub pasted: Vec<(ClipboardAction, String)>,
    /// Clipboard targets that no longer exist.
    pub skipped: Vec<ItemId>,
    /// Whether the clipboard was emptied afterwards.
    pub cleared: bool,
}

/// Paste every clipboard entry into `target`.
///
/// All entries are probed before anything changes, so a rejected entry
/// aborts the whole paste. A paste that moved anything clears the clipboard,
/// even when a later entry fails; pure copies leave it in place for repeated
/// pasting.
pub fn paste(site: &mut Site, clipboard: &mut PrincipalClipboard<'_>, target: ItemId) -> NsResult<PasteReport> {
    let mut report = PasteReport::default();
    let mut live = Vec::new();
    for entry in clipboard.contents() {
        if site.tree.exists(entry.target) {
            live.push(*entry);
        } else {
            warn!(target = %entry.target, action = %entry.action, "clipboard item no longer exists; skipping");
            report.skipped.push(entry.target);
        }
    }

    for entry in &live {
        if entry.action == ClipboardAction::Move && site.tree.parent(entry.target)?.is_none() {
            return Err(NamespaceError::NotContained(entry.target));
        }
        let allowed = match entry.action {
            ClipboardAction::Copy => ObjectCopier::new(entry.target).copyable_to(site, target, None)?,
            ClipboardAction::Move => ObjectMover::new(entry.target).moveable_to(site, target, None)?,
        };
        if !allowed {
            let name = site.tree.name(entry.target)?.unwrap_or_default().to_string();
            return Err(NamespaceError::ValidationFailed(format!(
                "{name} cannot be pasted into {}",
                site.tree.path_of(target)?
            )));
        }
    }

    let mut moved_any = false;
    for entry in live {
        let applied = match entry.action {
            ClipboardAction::Copy => ObjectCopier::new(entry.target).copy_to(site, target, None),
            ClipboardAction::Move => ObjectMover::new(entry.target).move_to(site, target, None),
        };
        let name = match applied {
            Ok(name) => name,
            Err(e) => {
                if moved_any {
                    warn!(%target, pasted = report.pasted.len(), error = %e, "paste failed after moving items; clearing clipboard");
                    clipboard.clear_contents();
                }
                return Err(e);
            }
        };
        moved_any |= entry.action == ClipboardAction::Move;
        report.pasted.push((entry.action, name));
    }

    if moved_any {
        clipboard.clear_contents();
        report.cleared = true;
    }
    info!(%target, pasted = report.pasted.len(), skipped = report.skipped.len(), cleared = report.cleared, "paste complete");
    Ok(report)
}
