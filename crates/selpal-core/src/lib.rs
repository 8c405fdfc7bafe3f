//! Selection Palette Core Library
//!
//! Selection editing for glyph outlines: combine a candidate selection with the
//! current one (add, subtract, intersect), grow and shrink along contours, and
//! select elements by type. The palette routes panel and menu clicks through a
//! dispatch table and talks to the hosting editor through [`EditView`].

pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod outline;
pub mod palette;
pub mod selection;
pub mod storage;
pub mod topology;
pub mod view;

pub use config::PaletteConfig;
pub use error::{SelectionError, SelectionResult};
pub use filter::ElementFilter;
pub use host::{EditView, MemoryHost, Palette};
pub use outline::{Anchor, Component, Contour, Guide, LayerId, Node, NodeKind, Outline};
pub use palette::{ControlId, DispatchTable, Handler, HandlerContext, Response, SelectionPalette};
pub use selection::{SelectableElement, SelectionOperation, SelectionSet, combine, combine_checked};
pub use storage::{
    FilePreferences, MemoryPreferences, PreferenceStorage, Preferences, StorageError,
    StorageResult,
};
pub use topology::{continue_selection, grow, select_between, shrink, undo_selection};
pub use view::{MenuItem, OperationButton, PaletteRow, PaletteView};
