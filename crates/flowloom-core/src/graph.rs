use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Name of the single output branch every repaired source node uses.
pub const DEFAULT_BRANCH: &str = "main";

/// Name of the default input slot on a connection target.
pub const DEFAULT_INPUT: &str = "main";

/// Placeholder some models emit instead of a target id, meaning
/// "the next node in the nodes array".
pub const NEXT_NODE_PLACEHOLDER: &str = "to";

/// A workflow graph in the editor's wire format.
///
/// Node order is significant: it defines the default linear connectivity
/// (what the `"to"` placeholder resolves against) and the default layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, deserialize_with = "lenient_nodes")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "lenient_connections")]
    pub connections: IndexMap<String, Value>,
    /// Top-level fields the model emitted that this crate does not
    /// interpret (workflow name, settings, ...). Preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One automation step. `type` and `name` are opaque here; only `id` and
/// `position` are touched by repair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub node_type: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Position>,
    /// Anything else on the node (parameters, credentials, ...) passes
    /// through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canvas coordinates, serialized as a two-element `[x, y]` array.
///
/// Components stay `serde_json::Number` so integer coordinates from the
/// model are not rewritten as floats on the way back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Number, pub Number);

impl Position {
    pub fn xy(x: i64, y: i64) -> Self {
        Self(Number::from(x), Number::from(y))
    }
}

/// One directed edge in canonical form. A `None` target is the dangling
/// sentinel: the source had no successor to resolve `"to"` against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub node: Option<String>,
    pub input: String,
}

/// The canonical nested connection value:
/// `{"main": [[{node, input}, ...]]}`: one output branch whose value is
/// a single-element list holding the edge list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPorts {
    pub main: Vec<Vec<ConnectionEntry>>,
}

/// A loosely-specified edge as models actually emit them: either a bare
/// target reference or a `{node, input}` mapping. Extra fields on the
/// mapping form are ignored; any other JSON shape fails to parse and is
/// skipped by the repair pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEdge {
    Target(String),
    Entry {
        #[serde(default)]
        node: Option<String>,
        #[serde(default)]
        input: Option<String>,
    },
}

// ── Lenient field deserializers ─────────────────────────────────
//
// Model output is not trusted to follow the schema. Each field decodes
// from a raw `Value` and degrades to a repairable default instead of
// failing the whole node, so the repair pass stays total.

fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_position<'de, D>(de: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_nodes<'de, D>(de: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    let Value::Array(items) = value else {
        if !value.is_null() {
            warn!("ignoring non-array `nodes` value");
        }
        return Ok(Vec::new());
    };
    let mut nodes = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Node>(item) {
            Ok(node) => nodes.push(node),
            Err(e) => warn!("skipping malformed node #{idx}: {e}"),
        }
    }
    Ok(nodes)
}

fn lenient_connections<'de, D>(de: D) -> Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(IndexMap::new()),
        _ => {
            warn!("ignoring non-object `connections` value");
            Ok(IndexMap::new())
        }
    }
}
