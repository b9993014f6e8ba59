//! Namespace mutation engines: move, copy, rename and clipboard paste.

mod copier;
mod mover;
mod paste;
mod renamer;

pub use copier::ObjectCopier;
pub use mover::ObjectMover;
pub use paste::{paste, PasteReport};
pub use renamer::{renamer_for, ContainerItemRenamer, ItemRenamer, OrderedContainerItemRenamer};
