//! Read-only outline topology of the active layer.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the layer an outline snapshot was taken from.
pub type LayerId = Uuid;

/// Kind of a node within a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// On-curve node ending a straight segment.
    Line,
    /// On-curve node ending a curved segment.
    Curve,
    /// Off-curve control point (handle).
    OffCurve,
}

/// A single point in a contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Position in glyph units.
    pub position: Point,
    /// Node type.
    pub kind: NodeKind,
    /// Whether the node has a smooth (tangent-continuous) connection.
    #[serde(default)]
    pub smooth: bool,
}

impl Node {
    /// Create a sharp line node.
    pub fn line(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            kind: NodeKind::Line,
            smooth: false,
        }
    }

    /// Create a curve node.
    pub fn curve(x: f64, y: f64, smooth: bool) -> Self {
        Self {
            position: Point::new(x, y),
            kind: NodeKind::Curve,
            smooth,
        }
    }

    /// Create an off-curve handle.
    pub fn off_curve(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            kind: NodeKind::OffCurve,
            smooth: false,
        }
    }

    /// Mark the node as smooth.
    pub fn smooth(mut self) -> Self {
        self.smooth = true;
        self
    }

    pub fn is_on_curve(&self) -> bool {
        self.kind != NodeKind::OffCurve
    }
}

/// A closed or open sub-path of the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub nodes: Vec<Node>,
    #[serde(default = "default_closed")]
    pub closed: bool,
}

fn default_closed() -> bool {
    true
}

impl Contour {
    /// Create a closed contour.
    pub fn closed(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            closed: true,
        }
    }

    /// Create an open contour.
    pub fn open(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            closed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node following `index`.
    ///
    /// Closed contours wrap around; open contours return `None` past the last node.
    pub fn next(&self, index: usize) -> Option<usize> {
        if index >= self.nodes.len() {
            return None;
        }
        if index + 1 < self.nodes.len() {
            Some(index + 1)
        } else if self.closed {
            Some(0)
        } else {
            None
        }
    }

    /// Index of the node preceding `index`.
    ///
    /// Closed contours wrap around; open contours return `None` before the first node.
    pub fn prev(&self, index: usize) -> Option<usize> {
        if index >= self.nodes.len() {
            return None;
        }
        if index > 0 {
            Some(index - 1)
        } else if self.closed {
            Some(self.nodes.len() - 1)
        } else {
            None
        }
    }

    /// Walk `steps` nodes forward (or backward when negative) from `index`.
    pub fn step(&self, index: usize, steps: isize) -> Option<usize> {
        let len = self.nodes.len() as isize;
        if len == 0 || index as isize >= len {
            return None;
        }
        let target = index as isize + steps;
        if self.closed {
            Some(target.rem_euclid(len) as usize)
        } else if (0..len).contains(&target) {
            Some(target as usize)
        } else {
            None
        }
    }
}

/// A named attachment point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub position: Point,
}

/// A placed instance of another glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub base_glyph: String,
    #[serde(default = "identity")]
    pub transform: Affine,
}

fn identity() -> Affine {
    Affine::IDENTITY
}

/// An infinite guide line through `position` at `angle` degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub position: Point,
    #[serde(default)]
    pub angle: f64,
}

/// Snapshot of everything selectable on one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Layer this snapshot belongs to.
    #[serde(default = "Uuid::new_v4")]
    pub layer_id: LayerId,
    #[serde(default)]
    pub contours: Vec<Contour>,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub components: Vec<Component>,
    /// Guides local to the layer.
    #[serde(default)]
    pub guides: Vec<Guide>,
    /// Guides shared by every layer of the selected master.
    #[serde(default)]
    pub master_guides: Vec<Guide>,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    /// Create an empty outline for a fresh layer.
    pub fn new() -> Self {
        Self {
            layer_id: Uuid::new_v4(),
            contours: Vec::new(),
            anchors: Vec::new(),
            components: Vec::new(),
            guides: Vec::new(),
            master_guides: Vec::new(),
        }
    }

    /// Create an outline from a list of contours.
    pub fn with_contours(contours: Vec<Contour>) -> Self {
        Self {
            contours,
            ..Self::new()
        }
    }

    /// Look up a node by contour and node index.
    pub fn node(&self, contour: usize, index: usize) -> Option<&Node> {
        self.contours.get(contour).and_then(|c| c.nodes.get(index))
    }

    /// True when the layer has no contours.
    pub fn has_no_contours(&self) -> bool {
        self.contours.is_empty()
    }

    /// Total number of nodes across all contours.
    pub fn node_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    /// Iterate `(contour, index, node)` over every node in outline order.
    pub fn nodes(&self) -> impl Iterator<Item = (usize, usize, &Node)> {
        self.contours.iter().enumerate().flat_map(|(ci, contour)| {
            contour
                .nodes
                .iter()
                .enumerate()
                .map(move |(ni, node)| (ci, ni, node))
        })
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
