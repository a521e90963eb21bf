//! Graph export — serialize an overlap graph as GML, Graphviz DOT or
//! node-link JSON.
//!
//! ```text
//! OverlapGraph → write_gml()  → graph [ multigraph 1 node [...] edge [...] ]
//!              → write_dot()  → graph { "A" -- "A%B%_Z%0" [key=0]; }
//!              → write_json() → {"directed": false, "multigraph": true, "nodes": [...], "links": [...]}
//! ```
//!
//! All three formats address nodes by the string produced by [`node_label`].
//! Event keys are flattened by joining their components with
//! [`KEY_DELIMITER`]. Two distinct nodes that flatten to the same string
//! (an entity and a location both named `"X"`, say) make the export fail
//! with [`Error::DuplicateLabel`] instead of silently merging them.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashSet;
use serde::Serialize;
use tracing::debug;

use crate::graph::OverlapGraph;
use crate::model::*;
use crate::{Error, Result};

/// Separator between the components of a flattened event key.
pub const KEY_DELIMITER: char = '%';

/// Attribute names every exporter writes itself. Node properties with these
/// names are left out of the output.
pub const RESERVED_ATTRIBUTES: [&str; 3] = ["id", "label", "class"];

/// Node properties safe to emit next to the exporter's own attributes.
fn exported_properties(props: &PropertyMap) -> impl Iterator<Item = (&String, &Value)> {
    props.iter().filter(|(key, _)| !RESERVED_ATTRIBUTES.contains(&key.as_str()))
}

/// Stable string form of a node key.
///
/// Entities and locations print as themselves; an event prints as
/// `first%second%location%index`.
pub fn node_label<E: Display, L: Display>(key: &NodeKey<E, L>) -> String {
    match key {
        NodeKey::Entity(e) => e.to_string(),
        NodeKey::Location(l) => l.to_string(),
        NodeKey::Event(ev) => format!(
            "{}{d}{}{d}{}{d}{}",
            ev.pair.0,
            ev.pair.1,
            ev.location,
            ev.index,
            d = KEY_DELIMITER,
        ),
    }
}

/// Labels for every node, indexed by `NodeId`. Fails on the first collision.
fn unique_labels<E, L>(graph: &OverlapGraph<E, L>) -> Result<Vec<String>>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    let mut seen = HashSet::with_capacity(graph.node_count());
    let mut labels = Vec::with_capacity(graph.node_count());
    for node in graph.nodes() {
        let label = node_label(&node.key);
        if !seen.insert(label.clone()) {
            return Err(Error::DuplicateLabel(label));
        }
        labels.push(label);
    }
    Ok(labels)
}

// ============================================================================
// GML
// ============================================================================

/// Write the graph as GML.
pub fn write_gml<E, L>(graph: &OverlapGraph<E, L>, writer: &mut dyn Write) -> Result<()>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    let labels = unique_labels(graph)?;

    writeln!(writer, "graph [")?;
    writeln!(writer, "  multigraph 1")?;

    for node in graph.nodes() {
        writeln!(writer, "  node [")?;
        writeln!(writer, "    id {}", node.id)?;
        writeln!(writer, "    label {}", gml_string(&labels[node.id.0]))?;
        writeln!(writer, "    class {}", gml_string(node.class.as_str()))?;
        write_gml_properties(writer, &node.properties)?;
        writeln!(writer, "  ]")?;
    }

    for rel in graph.relationships() {
        writeln!(writer, "  edge [")?;
        writeln!(writer, "    source {}", rel.src)?;
        writeln!(writer, "    target {}", rel.dst)?;
        writeln!(writer, "    key {}", rel.key)?;
        writeln!(writer, "  ]")?;
    }

    writeln!(writer, "]")?;
    Ok(())
}

fn write_gml_properties(writer: &mut dyn Write, props: &PropertyMap) -> Result<()> {
    for (key, value) in exported_properties(props) {
        if let Some(literal) = gml_value(value) {
            writeln!(writer, "    {key} {literal}")?;
        }
    }
    Ok(())
}

/// GML literal for a value. GML has no null and no booleans.
fn gml_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(u8::from(*b).to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(format!("{f:?}")),
        Value::String(s) => Some(gml_string(s)),
    }
}

fn gml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('&', "&amp;").replace('"', "&quot;"))
}

// ============================================================================
// DOT
// ============================================================================

/// Write the graph as an undirected Graphviz DOT document.
pub fn write_dot<E, L>(graph: &OverlapGraph<E, L>, writer: &mut dyn Write) -> Result<()>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    let labels = unique_labels(graph)?;

    writeln!(writer, "graph {{")?;
    for node in graph.nodes() {
        let mut attrs = vec![format!("class={}", node.class)];
        attrs.extend(exported_properties(&node.properties).map(|(k, v)| format!("{k}={}", dot_value(v))));
        writeln!(writer, "{} [{}];", dot_id(&labels[node.id.0]), attrs.join(", "))?;
    }
    for rel in graph.relationships() {
        writeln!(
            writer,
            "{} -- {} [key={}];",
            dot_id(&labels[rel.src.0]),
            dot_id(&labels[rel.dst.0]),
            rel.key,
        )?;
    }
    writeln!(writer, "}}")?;
    Ok(())
}

fn dot_id(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn dot_value(value: &Value) -> String {
    match value {
        Value::Float(f) => format!("{f:?}"),
        Value::String(s) => dot_id(s),
        other => other.to_string(),
    }
}

// ============================================================================
// JSON (node-link)
// ============================================================================

#[derive(Serialize)]
struct NodeLinkData<'a> {
    directed: bool,
    multigraph: bool,
    nodes: Vec<NodeLinkNode<'a>>,
    links: Vec<NodeLinkEdge<'a>>,
}

#[derive(Serialize)]
struct NodeLinkNode<'a> {
    id: &'a str,
    class: NodeClass,
    #[serde(flatten)]
    properties: BTreeMap<&'a str, &'a Value>,
}

#[derive(Serialize)]
struct NodeLinkEdge<'a> {
    source: &'a str,
    target: &'a str,
    key: usize,
}

/// Write the graph as node-link JSON.
pub fn write_json<E, L>(graph: &OverlapGraph<E, L>, writer: &mut dyn Write) -> Result<()>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    let labels = unique_labels(graph)?;
    let data = NodeLinkData {
        directed: false,
        multigraph: true,
        nodes: graph
            .nodes()
            .map(|node| NodeLinkNode {
                id: &labels[node.id.0],
                class: node.class,
                properties: exported_properties(&node.properties)
                    .map(|(key, value)| (key.as_str(), value))
                    .collect(),
            })
            .collect(),
        links: graph
            .relationships()
            .map(|rel| NodeLinkEdge {
                source: &labels[rel.src.0],
                target: &labels[rel.dst.0],
                key: rel.key,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &data)?;
    writeln!(writer)?;
    Ok(())
}

// ============================================================================
// File wrappers
// ============================================================================

fn export_to_path<E, L>(
    graph: &OverlapGraph<E, L>,
    path: &Path,
    format: &str,
    write: fn(&OverlapGraph<E, L>, &mut dyn Write) -> Result<()>,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(graph, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), format, "overlap graph exported");
    Ok(())
}

/// Write the graph as GML to `path`, replacing any existing file.
pub fn export_gml<E, L>(graph: &OverlapGraph<E, L>, path: impl AsRef<Path>) -> Result<()>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    export_to_path(graph, path.as_ref(), "gml", write_gml)
}

/// Write the graph as Graphviz DOT to `path`.
pub fn export_graphviz<E, L>(graph: &OverlapGraph<E, L>, path: impl AsRef<Path>) -> Result<()>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    export_to_path(graph, path.as_ref(), "dot", write_dot)
}

/// Write the graph as node-link JSON to `path`.
pub fn export_json<E, L>(graph: &OverlapGraph<E, L>, path: impl AsRef<Path>) -> Result<()>
where
    E: Clone + Eq + Hash + Display,
    L: Clone + Eq + Hash + Display,
{
    export_to_path(graph, path.as_ref(), "json", write_json)
}
