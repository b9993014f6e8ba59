//! Core library for `cpmove`.
//!
//! A namespace of named containers and the engines that mutate it: move,
//! copy and rename with collision-free naming, copy notifications fanned out
//! over sublocations, and per-principal clipboards with paste.
//!
//! Module map:
//! - namespace: arena tree, entries, XML layouts
//! - naming / constraints: name choosers and containment checks
//! - events: notification bus, sublocation dispatch, annotators
//! - ops: the engines
//! - clipboard / script: staging area and the command-script runner
//! - config / cli / output / shutdown: binary plumbing

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod constraints;
pub mod errors;
pub mod events;
pub mod namespace;
pub mod naming;
pub mod ops;
pub mod output;
pub mod script;
pub mod shutdown;
pub mod site;

pub use clipboard::{ClipboardAction, ClipboardEntry, ClipboardStore, PrincipalClipboard};
pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor, Config, LogLevel};
pub use constraints::{Constraint, Constraints, RejectNamePrefix};
pub use errors::{NamespaceError, NsResult};
pub use events::{EventBus, EventFilter, ObjectEvent, Sublocations};
pub use namespace::{ContainerKind, ItemId, Tree};
pub use naming::{NameChooser, NameChoosers, NamePolicy};
pub use ops::{paste, renamer_for, ItemRenamer, ObjectCopier, ObjectMover, PasteReport};
pub use script::{parse_script, Command, Session};
pub use site::Site;
