//! Element-type filters backing the palette's segmented controls.

use crate::error::SelectionError;
use crate::outline::{NodeKind, Outline};
use crate::selection::{SelectableElement, SelectionSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A class of elements the palette can select in one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementFilter {
    SmoothCurves,
    SharpCurves,
    Lines,
    Handles,
    Corners,
    Components,
    Guides,
    Anchors,
}

impl ElementFilter {
    /// All filters in palette row order.
    pub const ALL: [ElementFilter; 8] = [
        Self::SmoothCurves,
        Self::SharpCurves,
        Self::Lines,
        Self::Handles,
        Self::Corners,
        Self::Components,
        Self::Guides,
        Self::Anchors,
    ];

    /// Identifier used in control names and icon resources.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SmoothCurves => "smooth_curves",
            Self::SharpCurves => "sharp_curves",
            Self::Lines => "lines",
            Self::Handles => "handles",
            Self::Corners => "corners",
            Self::Components => "components",
            Self::Guides => "guides",
            Self::Anchors => "anchors",
        }
    }

    /// Short label shown next to the row icon.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SmoothCurves => "Smooth",
            Self::SharpCurves => "Sharp",
            Self::Lines => "Lines",
            Self::Handles => "Handles",
            Self::Corners => "Corners",
            Self::Components => "Components",
            Self::Guides => "Guides",
            Self::Anchors => "Anchors",
        }
    }

    /// Icon resource for the row.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::SmoothCurves => "SmoothCurves",
            Self::SharpCurves => "SharpCurves",
            Self::Lines => "Lines",
            Self::Handles => "Handles",
            Self::Corners => "Corners",
            Self::Components => "Components",
            Self::Guides => "Guides",
            Self::Anchors => "Anchors",
        }
    }

    /// Every element of `outline` that this filter selects.
    pub fn candidates(&self, outline: &Outline) -> SelectionSet {
        match self {
            Self::SmoothCurves => select_nodes(outline, |kind, smooth| {
                kind != NodeKind::OffCurve && smooth
            }),
            Self::SharpCurves => sharp_curves(outline),
            Self::Lines => lines(outline),
            Self::Handles => select_nodes(outline, |kind, _| kind == NodeKind::OffCurve),
            Self::Corners => select_nodes(outline, |kind, smooth| {
                kind != NodeKind::OffCurve && !smooth
            }),
            Self::Components => (0..outline.components.len())
                .map(|index| SelectableElement::Component { index })
                .collect(),
            Self::Anchors => (0..outline.anchors.len())
                .map(|index| SelectableElement::Anchor { index })
                .collect(),
            Self::Guides => (0..outline.master_guides.len())
                .map(|index| SelectableElement::MasterGuide { index })
                .chain((0..outline.guides.len()).map(|index| SelectableElement::Guide { index }))
                .collect(),
        }
    }
}

impl fmt::Display for ElementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementFilter {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.name() == normalized || f.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| SelectionError::UnknownControl(s.to_string()))
    }
}

fn select_nodes(outline: &Outline, keep: impl Fn(NodeKind, bool) -> bool) -> SelectionSet {
    outline
        .nodes()
        .filter(|(_, _, node)| keep(node.kind, node.smooth))
        .map(|(ci, ni, _)| SelectableElement::node(ci, ni))
        .collect()
}

/// Sharp curve nodes, plus sharp line nodes that lead into a handle.
fn sharp_curves(outline: &Outline) -> SelectionSet {
    outline
        .nodes()
        .filter(|&(ci, ni, node)| match node.kind {
            NodeKind::Curve => !node.smooth,
            NodeKind::Line => {
                let contour = &outline.contours[ci];
                !node.smooth
                    && contour
                        .next(ni)
                        .is_some_and(|next| contour.nodes[next].kind == NodeKind::OffCurve)
            }
            NodeKind::OffCurve => false,
        })
        .map(|(ci, ni, _)| SelectableElement::node(ci, ni))
        .collect()
}

/// Straight segments: every line node together with its on-curve neighbours.
fn lines(outline: &Outline) -> SelectionSet {
    let mut set = SelectionSet::new();
    for (ci, contour) in outline.contours.iter().enumerate() {
        for (ni, node) in contour.nodes.iter().enumerate() {
            if node.kind != NodeKind::Line {
                continue;
            }
            set.insert(SelectableElement::node(ci, ni));
            for neighbour in [contour.prev(ni), contour.next(ni)].into_iter().flatten() {
                if contour.nodes[neighbour].is_on_curve() {
                    set.insert(SelectableElement::node(ci, neighbour));
                }
            }
        }
    }
    set
}
