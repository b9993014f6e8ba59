//! Container storage: the arena tree, its entry maps and the XML layout loader.

mod entries;
pub mod layout;
mod tree;

pub use entries::Entries;
pub use layout::{load_layout_from_xml_path, parse_layout};
pub use tree::{ContainerKind, ItemId, Metadata, Tree};
