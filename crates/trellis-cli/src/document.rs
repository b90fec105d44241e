//! Graph documents read by the CLI and the reports it writes.
//!
//! A graph document is a TOML file:
//!
//! ```toml
//! [[nodes]]
//! id = "client"
//! width = 120.0
//! height = 40.0
//!
//! [[nodes]]
//! id = "server"
//! x = 300.0
//! y = 0.0
//!
//! [[connections]]
//! source = "client"
//! target = "server"
//! ```
//!
//! A position is used only when both `x` and `y` are given. A size is used
//! when either dimension is given; the missing one falls back to the default
//! node size.

use log::warn;
use serde::{Deserialize, Serialize, Serializer};

use trellis::{
    Algorithm, LayoutResult,
    geometry::{Point, Size},
    model::{Connection, DEFAULT_NODE_SIZE, Node},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct NodeRecord {
    id: String,
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
}

impl NodeRecord {
    fn to_node(&self) -> Node {
        let mut node = Node::new(self.id.as_str());

        match (self.x, self.y) {
            (Some(x), Some(y)) => node = node.with_position(Point::new(x, y)),
            (None, None) => {}
            _ => warn!(id = self.id; "Ignoring position with a single coordinate"),
        }

        if self.width.is_some() || self.height.is_some() {
            let size = Size::new(
                self.width.unwrap_or(DEFAULT_NODE_SIZE.width()),
                self.height.unwrap_or(DEFAULT_NODE_SIZE.height()),
            );
            node = node.with_size(size);
        }

        node
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ConnectionRecord {
    id: Option<String>,
    source: String,
    target: String,
}

/// A graph read from a TOML document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphDocument {
    nodes: Vec<NodeRecord>,
    connections: Vec<ConnectionRecord>,
}

impl GraphDocument {
    /// Parse a document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error, with its span, for malformed input.
    pub fn parse(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.iter().map(NodeRecord::to_node).collect()
    }

    /// Connections in document order; unnamed ones are numbered by position.
    pub fn connections(&self) -> Vec<Connection> {
        self.connections
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let id = record
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("connection_{index}"));
                Connection::new(id, record.source.as_str(), record.target.as_str())
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct MetricsRecord {
    execution_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    edge_crossings: Option<usize>,
    width: f32,
    height: f32,
}

#[derive(Debug, Serialize)]
struct PositionRecord {
    x: f32,
    y: f32,
}

/// Node centers in input order.
struct Positions<'a>(&'a LayoutResult);

impl Serialize for Positions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.positions().iter().map(|(id, position)| {
            let record = PositionRecord {
                x: position.x(),
                y: position.y(),
            };
            (id.as_str(), record)
        }))
    }
}

/// The TOML report written for a layout.
#[derive(Serialize)]
pub struct LayoutReport<'a> {
    algorithm: Algorithm,
    iterations: usize,
    metrics: MetricsRecord,
    positions: Positions<'a>,
}

impl<'a> LayoutReport<'a> {
    pub fn new(result: &'a LayoutResult) -> Self {
        let metrics = result.metrics();
        Self {
            algorithm: result.algorithm(),
            iterations: result.iterations(),
            metrics: MetricsRecord {
                execution_time_ms: metrics.execution_time().as_secs_f64() * 1000.0,
                edge_crossings: metrics.edge_crossings(),
                width: metrics.bounding_box().width(),
                height: metrics.bounding_box().height(),
            },
            positions: Positions(result),
        }
    }

    /// Render the report as TOML.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the report cannot be expressed in TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use trellis::{LayoutOptions, compute_layout, identifier::NodeId};

    use super::*;

    const DOCUMENT: &str = r#"
        [[nodes]]
        id = "a"
        x = 10.0
        y = 20.0

        [[nodes]]
        id = "b"
        width = 30.0

        [[nodes]]
        id = "c"
        x = 5.0

        [[connections]]
        source = "a"
        target = "b"

        [[connections]]
        id = "named"
        source = "b"
        target = "c"
    "#;

    #[test]
    fn test_parse_nodes() {
        let document = GraphDocument::parse(DOCUMENT).expect("valid document");
        let nodes = document.nodes();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].position(), Some(Point::new(10.0, 20.0)));
        assert_eq!(nodes[0].size(), None);
        assert_eq!(nodes[1].size(), Some(Size::new(30.0, DEFAULT_NODE_SIZE.height())));
        // A lone coordinate is not a position
        assert_eq!(nodes[2].position(), None);
    }

    #[test]
    fn test_parse_connections() {
        let document = GraphDocument::parse(DOCUMENT).expect("valid document");
        let connections = document.connections();

        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].id().as_str(), "connection_0");
        assert_eq!(connections[1].id().as_str(), "named");
        assert_eq!(connections[1].source(), &NodeId::new("b"));
    }

    #[test]
    fn test_empty_document() {
        let document = GraphDocument::parse("").expect("empty document is valid");
        assert!(document.nodes().is_empty());
        assert!(document.connections().is_empty());
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let err = GraphDocument::parse("[[connections]]\nsource = \"a\"\n")
            .expect_err("target is required");
        assert!(err.message().contains("target"));
    }

    #[test]
    fn test_report_lists_positions_in_input_order() {
        let nodes = [Node::new("zeta"), Node::new("alpha")];
        let result = compute_layout(&nodes, &[], &LayoutOptions::default()).expect("valid");

        let report = LayoutReport::new(&result).to_toml().expect("serializable");
        let parsed: toml::Table = toml::from_str(&report).expect("report is valid TOML");

        assert_eq!(parsed["algorithm"].as_str(), Some("grid"));
        assert_eq!(parsed["iterations"].as_integer(), Some(0));
        assert!(parsed["positions"].get("alpha").is_some());
        assert!(parsed["metrics"].get("edge_crossings").is_none());

        let zeta = report.find("zeta").expect("zeta is reported");
        let alpha = report.find("alpha").expect("alpha is reported");
        assert!(zeta < alpha);
    }
}
