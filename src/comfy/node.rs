//! Graph node and link model
//!
//! Normalizes both export shapes into one internal node list at the
//! boundary; everything downstream operates only on the normalized form.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::value::{as_float, as_int, as_text, number_or_text};

/// One vertex of an exported generation graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Node id: the object key in `prompt` form, the `id` field in
    /// `workflow` form.
    pub id: String,
    /// Type/class name, e.g. `KSampler`, `CheckpointLoaderSimple`.
    pub node_type: String,
    /// Display label, when the author renamed the node.
    pub label: Option<String>,
    /// Named inputs. In `workflow` form these describe link sockets; in
    /// `prompt` form they carry the actual widget values.
    pub inputs: Map<String, Value>,
    /// Positional widget values (`workflow` form).
    pub widgets_values: Vec<Value>,
    /// Free-form node properties.
    pub properties: Map<String, Value>,
}

/// A directed edge `(source node, output port) → (target node, input port)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphLink {
    pub source: String,
    pub source_output: i64,
    pub target: String,
    pub target_input: i64,
}

/// Flat per-node summary emitted for every node regardless of
/// classification, so unknown/custom types never block extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub inputs: Map<String, Value>,
}

impl From<&GraphNode> for NodeSummary {
    fn from(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            label: node.label.clone(),
            inputs: node.inputs.clone(),
        }
    }
}

impl GraphNode {
    /// Build a node from a JSON object, with the id supplied by the
    /// surrounding shape. Returns None when no type name is present.
    fn from_value(id: String, value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let node_type = obj
            .get("type")
            .or_else(|| obj.get("class_type"))
            .and_then(Value::as_str)?
            .to_string();

        let label = obj
            .get("title")
            .or_else(|| obj.get("label"))
            .and_then(|v| as_text(v));

        Some(Self {
            id,
            node_type,
            label,
            inputs: normalize_inputs(obj.get("inputs")),
            widgets_values: obj
                .get("widgets_values")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            properties: obj
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Duck-typing for the keyed-object shape: a value counts as a node if
    /// it names a type and carries any node-shaped body.
    fn looks_like_node(value: &Value) -> bool {
        let Some(obj) = value.as_object() else {
            return false;
        };
        let has_type = obj.get("type").is_some_and(Value::is_string)
            || obj.get("class_type").is_some_and(Value::is_string);
        let has_body = obj.contains_key("inputs")
            || obj.contains_key("widgets_values")
            || obj.contains_key("properties");
        has_type && has_body
    }

    /// Structured string lookup: `inputs` first, then `properties`.
    pub(crate) fn input_text(&self, key: &str) -> Option<String> {
        self.inputs.get(key).and_then(|v| as_text(v))
    }

    pub(crate) fn property_text(&self, key: &str) -> Option<String> {
        self.properties.get(key).and_then(|v| as_text(v))
    }

    pub(crate) fn input_int(&self, key: &str) -> Option<i64> {
        self.inputs.get(key).and_then(|v| as_int(v))
    }

    pub(crate) fn property_int(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(|v| as_int(v))
    }

    pub(crate) fn input_float(&self, key: &str) -> Option<f64> {
        self.inputs.get(key).and_then(|v| as_float(v))
    }

    pub(crate) fn property_float(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(|v| as_float(v))
    }

    /// Seed-style lookup that keeps integer precision.
    pub(crate) fn input_seed(&self, key: &str) -> Option<String> {
        self.inputs.get(key).and_then(|v| number_or_text(v))
    }

    pub(crate) fn property_seed(&self, key: &str) -> Option<String> {
        self.properties.get(key).and_then(|v| number_or_text(v))
    }

    /// Positional widget value.
    pub(crate) fn widget(&self, index: usize) -> Option<&Value> {
        self.widgets_values.get(index)
    }

    /// All numeric widget values, in order.
    pub(crate) fn numeric_widgets(&self) -> Vec<&Value> {
        self.widgets_values
            .iter()
            .filter(|v| v.is_number())
            .collect()
    }

    /// All string widget values, in order.
    pub(crate) fn string_widgets(&self) -> impl Iterator<Item = &str> {
        self.widgets_values.iter().filter_map(Value::as_str)
    }
}

/// Normalize the two `inputs` encodings into one named map.
///
/// `prompt` form: already a map of name → value (or `[node_id, port]` link
/// pairs). `workflow` form: an array of socket descriptors with a `name`
/// field — keyed here by that name so lookups fall through to
/// `widgets_values` exactly as they do for real exports (socket objects
/// never coerce to scalars).
fn normalize_inputs(raw: Option<&Value>) -> Map<String, Value> {
    match raw {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Array(entries)) => {
            let mut map = Map::new();
            for entry in entries {
                if let Some(name) = entry.get("name").and_then(Value::as_str) {
                    map.insert(name.to_string(), entry.clone());
                }
            }
            map
        }
        _ => Map::new(),
    }
}

/// Normalize a graph export into a node list and a link list.
///
/// Nodes may arrive as an array under `.nodes` or as a keyed object; the
/// keyed object counts as a node list only if every value duck-types as a
/// node. Anything else yields an empty graph.
pub fn normalize_graph(root: &Value) -> (Vec<GraphNode>, Vec<GraphLink>) {
    if let Some(node_array) = root.get("nodes").and_then(Value::as_array) {
        let nodes = node_array
            .iter()
            .filter_map(|value| {
                let id = value
                    .get("id")
                    .and_then(|v| number_or_text(v))
                    .unwrap_or_default();
                GraphNode::from_value(id, value)
            })
            .collect();
        let links = root
            .get("links")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(parse_link).collect())
            .unwrap_or_default();
        return (nodes, links);
    }

    if let Some(obj) = root.as_object() {
        if !obj.is_empty() && obj.values().all(GraphNode::looks_like_node) {
            let nodes = obj
                .iter()
                .filter_map(|(id, value)| GraphNode::from_value(id.clone(), value))
                .collect();
            return (nodes, Vec::new());
        }
    }

    (Vec::new(), Vec::new())
}

/// A `links` entry is `[link_id, source, source_port, target, target_port,
/// type]`; ids arrive as numbers or strings depending on the exporter.
fn parse_link(entry: &Value) -> Option<GraphLink> {
    let parts = entry.as_array()?;
    Some(GraphLink {
        source: number_or_text(parts.get(1)?)?,
        source_output: as_int(parts.get(2)?)?,
        target: number_or_text(parts.get(3)?)?,
        target_input: as_int(parts.get(4)?)?,
    })
}
