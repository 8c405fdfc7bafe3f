//! Capability interfaces between the palette and the editor hosting it.

use crate::outline::Outline;
use crate::selection::SelectionSet;
use crate::view::PaletteView;

/// The editor side: the active layer's outline and its selection.
pub trait EditView {
    /// Outline of the active layer.
    fn current_outline(&self) -> &Outline;

    /// Selection of the active layer, in selection order.
    fn current_selection(&self) -> SelectionSet;

    /// Replace the selection of the active layer.
    fn set_selection(&mut self, selection: SelectionSet);
}

/// The palette side: what the host docks and when it is shown.
pub trait Palette {
    /// The panel to dock.
    fn view(&self) -> &PaletteView;

    /// Called when the panel becomes visible for `host`.
    fn on_activate(&mut self, host: &mut dyn EditView);
}

/// An in-memory editor holding one layer.
///
/// Each host owns its selection; switching to an outline of a different layer
/// discards it.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    outline: Outline,
    selection: SelectionSet,
    writes: usize,
}

impl MemoryHost {
    pub fn new(outline: Outline) -> Self {
        Self {
            outline,
            selection: SelectionSet::new(),
            writes: 0,
        }
    }

    /// Create a host with an initial selection.
    pub fn with_selection(outline: Outline, selection: SelectionSet) -> Self {
        Self {
            outline,
            selection,
            writes: 0,
        }
    }

    /// Replace the outline. A different layer id drops the selection.
    pub fn set_outline(&mut self, outline: Outline) {
        if outline.layer_id != self.outline.layer_id {
            log::debug!("Layer {} replaced by {}", self.outline.layer_id, outline.layer_id);
            self.selection.clear();
        }
        self.outline = outline;
    }

    /// Number of times the selection was written through [`EditView::set_selection`].
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl EditView for MemoryHost {
    fn current_outline(&self) -> &Outline {
        &self.outline
    }

    fn current_selection(&self) -> SelectionSet {
        self.selection.clone()
    }

    fn set_selection(&mut self, selection: SelectionSet) {
        self.writes += 1;
        self.selection = selection;
    }
}
