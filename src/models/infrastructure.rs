use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub location: Point,
}

/// Track segment kinds that get their own index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    SingleTrack,
    DoubleTrack,
    Station,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::SingleTrack,
        ResourceKind::DoubleTrack,
        ResourceKind::Station,
    ];

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::SingleTrack => "SingleTrack",
            ResourceKind::DoubleTrack => "DoubleTrack",
            ResourceKind::Station => "Station",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| format!("Unknown resource type: {s}"))
    }
}

/// Raw `restype` object. The tag stays a string so that unknown kinds
/// surface as a geometry error instead of a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceType {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl ResourceType {
    #[must_use]
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            tag: kind.tag().to_string(),
            capacity: None,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the tag is not one of the known resource kinds.
    pub fn kind(&self) -> Result<ResourceKind, String> {
        self.tag.parse()
    }
}

/// A track segment between two nodes.
///
/// `node_a`/`node_b` are the canonical names; the older `node_lo`/`node_hi`
/// schema is accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(alias = "node_lo")]
    pub node_a: usize,
    #[serde(alias = "node_hi")]
    pub node_b: usize,
    #[serde(default)]
    pub line_segments: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restype: Option<ResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl Resource {
    #[must_use]
    pub fn new(node_a: usize, node_b: usize, kind: ResourceKind) -> Self {
        Self {
            node_a,
            node_b,
            line_segments: Vec::new(),
            restype: Some(ResourceType::new(kind)),
            length: None,
        }
    }

    #[must_use]
    pub fn with_segments(mut self, line_segments: Vec<Point>) -> Self {
        self.line_segments = line_segments;
        self
    }

    /// Node the train enters from when traversing in the given direction
    #[must_use]
    pub fn entry_node(&self, forward: bool) -> usize {
        if forward { self.node_a } else { self.node_b }
    }

    /// Node the train leaves through when traversing in the given direction
    #[must_use]
    pub fn exit_node(&self, forward: bool) -> usize {
        self.entry_node(!forward)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Infrastructure {
    pub nodes: Vec<Node>,
    pub resources: Vec<Resource>,
}

impl Infrastructure {
    /// Parse an infrastructure document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the infrastructure schema.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse infrastructure: {e}"))
    }

    #[must_use]
    pub fn node_location(&self, node: usize) -> Option<Point> {
        self.nodes.get(node).map(|n| n.location)
    }

    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.resources.iter().map(|r| r.line_segments.len()).sum()
    }

    /// Sum of resource lengths, skipping resources without one
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.resources.iter().filter_map(|r| r.length).sum()
    }
}
