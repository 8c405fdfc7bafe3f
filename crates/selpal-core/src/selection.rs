//! Selection sets and the ADD / SUBTRACT / INTERSECT combinator.

use crate::error::{SelectionError, SelectionResult};
use crate::outline::Outline;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// One selectable unit of a layer, referenced by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectableElement {
    /// A node (on-curve point or handle) of a contour.
    Node { contour: usize, index: usize },
    Anchor { index: usize },
    Component { index: usize },
    /// A guide local to the layer.
    Guide { index: usize },
    /// A guide of the selected master.
    MasterGuide { index: usize },
}

impl SelectableElement {
    pub const fn node(contour: usize, index: usize) -> Self {
        Self::Node { contour, index }
    }

    /// Node coordinates, if this is a node.
    pub fn as_node(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Node { contour, index } => Some((contour, index)),
            _ => None,
        }
    }

    /// Check that the element exists in `outline`.
    pub fn resolves_in(&self, outline: &Outline) -> bool {
        match *self {
            Self::Node { contour, index } => outline.node(contour, index).is_some(),
            Self::Anchor { index } => index < outline.anchors.len(),
            Self::Component { index } => index < outline.components.len(),
            Self::Guide { index } => index < outline.guides.len(),
            Self::MasterGuide { index } => index < outline.master_guides.len(),
        }
    }
}

impl fmt::Display for SelectableElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { contour, index } => write!(f, "node {}:{}", contour, index),
            Self::Anchor { index } => write!(f, "anchor {}", index),
            Self::Component { index } => write!(f, "component {}", index),
            Self::Guide { index } => write!(f, "guide {}", index),
            Self::MasterGuide { index } => write!(f, "master guide {}", index),
        }
    }
}

/// How a candidate selection is merged into the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOperation {
    #[default]
    Add,
    Subtract,
    Intersect,
}

impl SelectionOperation {
    pub const ALL: [SelectionOperation; 3] = [Self::Add, Self::Subtract, Self::Intersect];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Intersect => "intersect",
        }
    }

    /// Icon resource shown on the operation button.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Add => "union",
            Self::Subtract => "subtract",
            Self::Intersect => "intersect",
        }
    }
}

impl fmt::Display for SelectionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectionOperation {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" | "union" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "intersect" => Ok(Self::Intersect),
            _ => Err(SelectionError::UnknownControl(s.to_string())),
        }
    }
}

/// A set of selected elements.
///
/// Membership is unique and equality ignores order, but the order in which
/// elements were selected is kept: continue, undo and select-between act on
/// the most recently selected elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SelectableElement>", into = "Vec<SelectableElement>")]
pub struct SelectionSet {
    /// Elements in selection order.
    order: Vec<SelectableElement>,
    members: HashSet<SelectableElement>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, element: &SelectableElement) -> bool {
        self.members.contains(element)
    }

    /// Select an element. Returns false if it was already selected.
    pub fn insert(&mut self, element: SelectableElement) -> bool {
        if self.members.insert(element) {
            self.order.push(element);
            true
        } else {
            false
        }
    }

    /// Deselect an element. Returns false if it was not selected.
    pub fn remove(&mut self, element: &SelectableElement) -> bool {
        if self.members.remove(element) {
            self.order.retain(|e| e != element);
            true
        } else {
            false
        }
    }

    /// Select an element and make it the most recently selected one.
    pub fn touch(&mut self, element: SelectableElement) {
        if !self.insert(element) {
            self.order.retain(|e| *e != element);
            self.order.push(element);
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Elements in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectableElement> {
        self.order.iter()
    }

    /// The most recently selected element.
    pub fn last(&self) -> Option<&SelectableElement> {
        self.order.last()
    }

    /// The two most recently selected elements, oldest first.
    pub fn last_two(&self) -> Option<(SelectableElement, SelectableElement)> {
        match self.order.as_slice() {
            [.., origin, last] => Some((*origin, *last)),
            _ => None,
        }
    }

    /// Remove every element that does not satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&SelectableElement) -> bool) {
        let members = &mut self.members;
        self.order.retain(|e| {
            let kept = keep(e);
            if !kept {
                members.remove(e);
            }
            kept
        });
    }

    /// Selected nodes as `(contour, index)` pairs, in selection order.
    pub fn nodes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order.iter().filter_map(SelectableElement::as_node)
    }

    pub fn is_subset(&self, other: &SelectionSet) -> bool {
        self.members.is_subset(&other.members)
    }

    pub fn is_disjoint(&self, other: &SelectionSet) -> bool {
        self.members.is_disjoint(&other.members)
    }

    /// Check that every entry resolves in `outline`.
    pub fn validate(&self, outline: &Outline) -> SelectionResult<()> {
        match self.order.iter().find(|e| !e.resolves_in(outline)) {
            Some(element) => Err(SelectionError::StaleReference { element: *element }),
            None => Ok(()),
        }
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for SelectionSet {}

impl FromIterator<SelectableElement> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = SelectableElement>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<SelectableElement> for SelectionSet {
    fn extend<I: IntoIterator<Item = SelectableElement>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl From<Vec<SelectableElement>> for SelectionSet {
    fn from(elements: Vec<SelectableElement>) -> Self {
        elements.into_iter().collect()
    }
}

impl From<SelectionSet> for Vec<SelectableElement> {
    fn from(set: SelectionSet) -> Self {
        set.order
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a SelectableElement;
    type IntoIter = std::slice::Iter<'a, SelectableElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Merge `candidate` into `current` with `op`.
///
/// Pure: the caller applies the result to the document.
pub fn combine(
    current: &SelectionSet,
    candidate: &SelectionSet,
    op: SelectionOperation,
) -> SelectionSet {
    match op {
        SelectionOperation::Add => {
            let mut result = current.clone();
            result.extend(candidate.iter().copied());
            result
        }
        SelectionOperation::Subtract => current
            .iter()
            .filter(|e| !candidate.contains(e))
            .copied()
            .collect(),
        SelectionOperation::Intersect => current
            .iter()
            .filter(|e| candidate.contains(e))
            .copied()
            .collect(),
    }
}

/// Like [`combine`], but first checks both sets against `outline`.
pub fn combine_checked(
    outline: &Outline,
    current: &SelectionSet,
    candidate: &SelectionSet,
    op: SelectionOperation,
) -> SelectionResult<SelectionSet> {
    current.validate(outline)?;
    candidate.validate(outline)?;
    Ok(combine(current, candidate, op))
}
