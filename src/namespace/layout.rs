//! XML layout files describing an initial tree (quick_xml + serde).
//!
//! ```xml
//! <tree ordered="false">
//!   <container name="folder1" ordered="true">
//!     <item name="file1" data="hello"/>
//!   </container>
//! </tree>
//! ```

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{ContainerKind, ItemId, Tree};

#[derive(Debug, Deserialize)]
#[serde(rename = "tree")]
struct XmlTree {
    #[serde(rename = "@ordered", default)]
    ordered: bool,
    #[serde(rename = "$value", default)]
    children: Vec<XmlEntry>,
}

#[derive(Debug, Deserialize)]
enum XmlEntry {
    #[serde(rename = "container")]
    Container(XmlContainer),
    #[serde(rename = "item")]
    Item(XmlItem),
}

#[derive(Debug, Deserialize)]
struct XmlContainer {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@ordered", default)]
    ordered: bool,
    #[serde(rename = "$value", default)]
    children: Vec<XmlEntry>,
}

#[derive(Debug, Deserialize)]
struct XmlItem {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@data", default)]
    data: String,
}

fn kind_for(ordered: bool) -> ContainerKind {
    if ordered {
        ContainerKind::Ordered
    } else {
        ContainerKind::Plain
    }
}

/// Build a tree from layout XML.
pub fn parse_layout(xml: &str) -> Result<Tree> {
    let parsed: XmlTree = from_xml_str(xml).context("parse layout xml")?;
    let mut tree = Tree::with_root(kind_for(parsed.ordered));
    let root = tree.root();
    populate(&mut tree, root, &parsed.children)?;
    debug!(nodes = tree.live_count(), "layout loaded");
    Ok(tree)
}

/// Read and build a tree from a layout file.
pub fn load_layout_from_xml_path(path: &Path) -> Result<Tree> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read layout xml '{}'", path.display()))?;
    parse_layout(&contents).with_context(|| format!("load layout '{}'", path.display()))
}

fn populate(tree: &mut Tree, container: ItemId, children: &[XmlEntry]) -> Result<()> {
    for child in children {
        match child {
            XmlEntry::Container(c) => {
                let id = tree.create_container(kind_for(c.ordered));
                tree.set(container, c.name.trim(), id)
                    .with_context(|| format!("add container '{}'", c.name))?;
                populate(tree, id, &c.children)?;
            }
            XmlEntry::Item(i) => {
                let id = tree.create_leaf(i.data.clone());
                tree.set(container, i.name.trim(), id)
                    .with_context(|| format!("add item '{}'", i.name))?;
            }
        }
    }
    Ok(())
}
