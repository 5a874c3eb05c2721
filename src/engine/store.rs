//! Recipe store persistence
//!
//! ## Reading
//!
//! The store is read as a stream of YAML documents. Each document maps item
//! names to `null` (basic ingredient) or to a mapping of ingredient -> count.
//! Documents are merged left to right at the top level: when two documents
//! define the same item, the later one wins outright (recipes are not merged
//! key by key).
//!
//! ```yaml
//! iron: ~
//! wood: ~
//! blade: {iron: 2}
//! ---
//! sword:
//!   blade: 1
//!   handle: 1
//! ```
//!
//! JSON is valid YAML, so a store written by [`save`] reads back unchanged.
//!
//! ## Writing
//!
//! [`save`] writes a single pretty-printed JSON object with 4-space
//! indentation, through a temp file in the same directory that is then
//! renamed over the target.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::error::Result;
use super::graph::{Entry, Recipe, RecipeGraph};
use super::name::normalize;

/// On-disk shape of one document
type RawDocument = BTreeMap<String, Option<Recipe>>;

/// Load a store from `path`. A missing file is an empty graph.
pub fn load(path: &Path) -> Result<RecipeGraph> {
    if !path.exists() {
        return Ok(RecipeGraph::new());
    }

    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Parse store text: every YAML document in order, last definition wins.
pub fn parse(content: &str) -> Result<RecipeGraph> {
    let mut merged: BTreeMap<String, Entry> = BTreeMap::new();

    for document in serde_yaml::Deserializer::from_str(content) {
        let Some(document) = Option::<RawDocument>::deserialize(document)? else {
            continue;
        };

        for (name, recipe) in document {
            let entry = match recipe {
                None => Entry::Basic,
                Some(recipe) => Entry::Composite(recipe),
            };
            merged.insert(normalize(&name)?, entry);
        }
    }

    RecipeGraph::from_entries(merged)
}

/// Render the graph as pretty-printed JSON
pub fn to_json(graph: &RecipeGraph) -> Result<String> {
    let document: BTreeMap<&str, Option<&Recipe>> =
        graph.iter().map(|(name, entry)| (name, entry.recipe())).collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(&document, &mut serializer)?;
    buf.push(b'\n');

    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the graph to `path` atomically.
pub fn save(path: &Path, graph: &RecipeGraph) -> Result<()> {
    let content = to_json(graph)?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
