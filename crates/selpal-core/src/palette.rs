//! The selection palette: control identifiers, dispatch table and event handling.
//!
//! Every control the panel or the edit menu exposes maps to one handler in a
//! [`DispatchTable`]. Handlers are pure: they receive the outline, the current
//! selection and the armed operation, and answer with a new selection or a new
//! armed operation. [`SelectionPalette`] reads from and writes back to the host.

use crate::config::PaletteConfig;
use crate::error::{SelectionError, SelectionResult};
use crate::filter::ElementFilter;
use crate::host::{EditView, Palette};
use crate::outline::{LayerId, Outline};
use crate::selection::{SelectionOperation, SelectionSet, combine_checked};
use crate::storage::{
    MemoryPreferences, PALETTE_PREFERENCES_KEY, PreferenceStorage, Preferences, StorageError,
};
use crate::topology;
use crate::view::PaletteView;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Identifies a button or menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Arm an operation for subsequent filter clicks.
    Mode(SelectionOperation),
    /// Select a filter's elements with the armed operation.
    Filter(ElementFilter),
    /// Select a filter's elements with an explicit operation (row buttons).
    FilterWith(ElementFilter, SelectionOperation),
    Grow,
    Shrink,
    Continue,
    Undo,
    SelectBetween,
}

impl ControlId {
    /// Every control the standard dispatch table handles.
    pub fn all() -> Vec<ControlId> {
        let mut controls: Vec<ControlId> =
            SelectionOperation::ALL.into_iter().map(Self::Mode).collect();
        for filter in ElementFilter::ALL {
            controls.push(Self::Filter(filter));
            controls.extend(
                SelectionOperation::ALL
                    .into_iter()
                    .map(|op| Self::FilterWith(filter, op)),
            );
        }
        controls.extend([
            Self::Grow,
            Self::Shrink,
            Self::Continue,
            Self::Undo,
            Self::SelectBetween,
        ]);
        controls
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode(op) => write!(f, "mode:{}", op),
            Self::Filter(filter) => write!(f, "{}", filter),
            Self::FilterWith(filter, op) => write!(f, "{}:{}", filter, op),
            Self::Grow => f.write_str("grow"),
            Self::Shrink => f.write_str("shrink"),
            Self::Continue => f.write_str("continue"),
            Self::Undo => f.write_str("undo"),
            Self::SelectBetween => f.write_str("select_between"),
        }
    }
}

impl FromStr for ControlId {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || SelectionError::UnknownControl(s.to_string());
        let lowered = s.trim().to_ascii_lowercase().replace('-', "_");
        match lowered.as_str() {
            "grow" => return Ok(Self::Grow),
            "shrink" => return Ok(Self::Shrink),
            "continue" => return Ok(Self::Continue),
            "undo" => return Ok(Self::Undo),
            "select_between" | "fill" => return Ok(Self::SelectBetween),
            _ => {}
        }
        match lowered.split_once(':') {
            Some(("mode", op)) => op.parse().map(Self::Mode).map_err(|_| unknown()),
            Some((filter, op)) => {
                let filter = filter.parse::<ElementFilter>().map_err(|_| unknown())?;
                let op = op.parse::<SelectionOperation>().map_err(|_| unknown())?;
                Ok(Self::FilterWith(filter, op))
            }
            None => lowered.parse().map(Self::Filter).map_err(|_| unknown()),
        }
    }
}

impl Serialize for ControlId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a handler sees.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub outline: &'a Outline,
    pub selection: &'a SelectionSet,
    pub armed: SelectionOperation,
}

/// What a handler asks the palette to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Replace the host selection.
    Select(SelectionSet),
    /// Arm a new operation mode.
    Arm(SelectionOperation),
}

pub type Handler = Box<dyn Fn(&HandlerContext<'_>) -> SelectionResult<Response>>;

/// Maps each control to its handler.
pub struct DispatchTable {
    handlers: HashMap<ControlId, Handler>,
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("controls", &self.handlers.len())
            .finish()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DispatchTable {
    /// A table with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A table handling every control in [`ControlId::all`].
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for control in ControlId::all() {
            let handler: Handler = match control {
                ControlId::Mode(op) => {
                    Box::new(move |_: &HandlerContext<'_>| Ok(Response::Arm(op)))
                }
                ControlId::Filter(filter) => Box::new(move |ctx: &HandlerContext<'_>| {
                    select_filtered(ctx, filter, ctx.armed).map(Response::Select)
                }),
                ControlId::FilterWith(filter, op) => Box::new(move |ctx: &HandlerContext<'_>| {
                    select_filtered(ctx, filter, op).map(Response::Select)
                }),
                ControlId::Grow => Box::new(|ctx: &HandlerContext<'_>| {
                    topology::grow(ctx.outline, ctx.selection).map(Response::Select)
                }),
                ControlId::Shrink => Box::new(|ctx: &HandlerContext<'_>| {
                    topology::shrink(ctx.outline, ctx.selection).map(Response::Select)
                }),
                ControlId::Continue => Box::new(|ctx: &HandlerContext<'_>| {
                    topology::continue_selection(ctx.outline, ctx.selection).map(Response::Select)
                }),
                ControlId::Undo => Box::new(|ctx: &HandlerContext<'_>| {
                    ctx.selection.validate(ctx.outline)?;
                    Ok(Response::Select(topology::undo_selection(ctx.selection)))
                }),
                ControlId::SelectBetween => Box::new(|ctx: &HandlerContext<'_>| {
                    topology::select_between(ctx.outline, ctx.selection).map(Response::Select)
                }),
            };
            table.register(control, handler);
        }
        table
    }

    /// Add or replace the handler for `control`.
    pub fn register(&mut self, control: ControlId, handler: Handler) -> Option<Handler> {
        self.handlers.insert(control, handler)
    }

    pub fn contains(&self, control: ControlId) -> bool {
        self.handlers.contains_key(&control)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler registered for `control`.
    pub fn dispatch(
        &self,
        control: ControlId,
        ctx: &HandlerContext<'_>,
    ) -> SelectionResult<Response> {
        let handler = self
            .handlers
            .get(&control)
            .ok_or_else(|| SelectionError::UnknownControl(control.to_string()))?;
        handler(ctx)
    }
}

fn select_filtered(
    ctx: &HandlerContext<'_>,
    filter: ElementFilter,
    op: SelectionOperation,
) -> SelectionResult<SelectionSet> {
    let candidate = filter.candidates(ctx.outline);
    combine_checked(ctx.outline, ctx.selection, &candidate, op)
}

/// The palette: dispatch table, armed operation and panel description.
pub struct SelectionPalette {
    table: DispatchTable,
    view: PaletteView,
    armed: SelectionOperation,
    default_operation: SelectionOperation,
    preferences: Box<dyn PreferenceStorage>,
    active_layer: Option<LayerId>,
}

impl fmt::Debug for SelectionPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionPalette")
            .field("table", &self.table)
            .field("armed", &self.armed)
            .field("active_layer", &self.active_layer)
            .finish()
    }
}

impl Default for SelectionPalette {
    fn default() -> Self {
        Self::new(&PaletteConfig::default(), Box::new(MemoryPreferences::new()))
    }
}

impl SelectionPalette {
    /// Create a palette, restoring the armed operation from `preferences`.
    pub fn new(config: &PaletteConfig, preferences: Box<dyn PreferenceStorage>) -> Self {
        let armed = match preferences.load(PALETTE_PREFERENCES_KEY) {
            Ok(prefs) => {
                log::info!("Restored armed operation: {}", prefs.armed_operation);
                prefs.armed_operation
            }
            Err(StorageError::NotFound(_)) => config.default_operation,
            Err(e) => {
                log::warn!("Failed to load palette preferences: {}", e);
                config.default_operation
            }
        };
        Self {
            table: DispatchTable::standard(),
            view: PaletteView::standard(config.install_menu_items),
            armed,
            default_operation: config.default_operation,
            preferences,
            active_layer: None,
        }
    }

    /// Create a palette from configuration alone.
    pub fn from_config(config: &PaletteConfig) -> Result<Self, StorageError> {
        let preferences = config.preference_storage()?;
        Ok(Self::new(config, preferences))
    }

    pub fn armed(&self) -> SelectionOperation {
        self.armed
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DispatchTable {
        &mut self.table
    }

    /// Arm `op` and persist it.
    pub fn arm(&mut self, op: SelectionOperation) {
        if self.armed != op {
            log::info!("Armed operation: {} -> {}", self.armed, op);
        }
        self.armed = op;
        let prefs = Preferences {
            armed_operation: op,
        };
        if let Err(e) = self.preferences.save(PALETTE_PREFERENCES_KEY, &prefs) {
            log::warn!("Failed to save palette preferences: {}", e);
        }
    }

    /// Forget the stored operation and re-arm the configured default.
    pub fn reset_armed(&mut self) -> Result<(), StorageError> {
        self.preferences.delete(PALETTE_PREFERENCES_KEY)?;
        log::info!("Armed operation reset to {}", self.default_operation);
        self.armed = self.default_operation;
        Ok(())
    }

    /// Handle a click on `control`.
    ///
    /// Returns the new selection after a selecting control, or the current
    /// one after a mode click. A stale selection is left untouched on the host
    /// and returned as-is. Grow or shrink on a layer without contours writes
    /// nothing to the host and returns an empty set, whatever the host holds.
    /// Only an unregistered control is reported as an error.
    pub fn handle(
        &mut self,
        control: ControlId,
        host: &mut dyn EditView,
    ) -> SelectionResult<SelectionSet> {
        self.track_layer(host.current_outline().layer_id);

        let current = host.current_selection();
        let ctx = HandlerContext {
            outline: host.current_outline(),
            selection: &current,
            armed: self.armed,
        };
        match self.table.dispatch(control, &ctx) {
            Ok(Response::Select(selection)) => {
                log::debug!(
                    "{}: {} -> {} selected",
                    control,
                    current.len(),
                    selection.len()
                );
                host.set_selection(selection.clone());
                Ok(selection)
            }
            Ok(Response::Arm(op)) => {
                self.arm(op);
                Ok(current)
            }
            Err(SelectionError::StaleReference { element }) => {
                log::warn!("{}: selection is stale ({}), re-sync needed", control, element);
                Ok(current)
            }
            Err(SelectionError::EmptyTopology) => {
                log::debug!("{}: layer has no contours, ignoring", control);
                Ok(SelectionSet::new())
            }
            Err(e) => Err(e),
        }
    }

    fn track_layer(&mut self, layer: LayerId) {
        if self.active_layer != Some(layer) {
            if self.active_layer.is_some() {
                log::info!("Active layer changed to {}", layer);
            }
            self.active_layer = Some(layer);
        }
    }
}

impl Palette for SelectionPalette {
    fn view(&self) -> &PaletteView {
        &self.view
    }

    fn on_activate(&mut self, host: &mut dyn EditView) {
        let layer = host.current_outline().layer_id;
        log::debug!("Palette activated on layer {}", layer);
        self.track_layer(layer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::outline::{Contour, Node};
    use crate::selection::SelectableElement;
    use crate::storage::StorageResult;
    use tempfile::tempdir;

    /// Preferences backend whose writes always fail.
    struct ReadOnlyPreferences;

    impl PreferenceStorage for ReadOnlyPreferences {
        fn save(&self, key: &str, _: &Preferences) -> StorageResult<()> {
            Err(StorageError::Io(format!("{} is read-only", key)))
        }

        fn load(&self, key: &str) -> StorageResult<Preferences> {
            Err(StorageError::NotFound(key.to_string()))
        }

        fn delete(&self, key: &str) -> StorageResult<()> {
            Err(StorageError::Io(format!("{} is read-only", key)))
        }
    }

    fn square_host() -> MemoryHost {
        MemoryHost::new(Outline::with_contours(vec![Contour::closed(vec![
            Node::line(0.0, 0.0),
            Node::line(100.0, 0.0),
            Node::curve(100.0, 100.0, true),
            Node::line(0.0, 100.0),
        ])]))
    }

    fn sel(indices: &[usize]) -> SelectionSet {
        indices.iter().map(|&i| SelectableElement::node(0, i)).collect()
    }

    #[test]
    fn test_control_id_roundtrip() {
        for control in ControlId::all() {
            let text = control.to_string();
            assert_eq!(text.parse::<ControlId>(), Ok(control), "{}", text);
        }
    }

    #[test]
    fn test_control_id_aliases() {
        assert_eq!("Select-Between".parse::<ControlId>(), Ok(ControlId::SelectBetween));
        assert_eq!("fill".parse::<ControlId>(), Ok(ControlId::SelectBetween));
        assert_eq!(
            "Lines:union".parse::<ControlId>(),
            Ok(ControlId::FilterWith(ElementFilter::Lines, SelectionOperation::Add))
        );
        assert!("mode:xor".parse::<ControlId>().is_err());
        assert!("explode".parse::<ControlId>().is_err());
    }

    #[test]
    fn test_standard_table_is_complete() {
        let table = DispatchTable::standard();
        assert_eq!(table.len(), ControlId::all().len());
        let view = PaletteView::standard(true);
        assert!(view.controls().into_iter().all(|c| table.contains(c)));
    }

    #[test]
    fn test_default_mode_is_add() {
        let palette = SelectionPalette::default();
        assert_eq!(palette.armed(), SelectionOperation::Add);
    }

    #[test]
    fn test_mode_click_arms_and_keeps_selection() {
        let mut palette = SelectionPalette::default();
        let mut host = square_host();
        host.set_selection(sel(&[1]));

        let result = palette
            .handle(ControlId::Mode(SelectionOperation::Subtract), &mut host)
            .unwrap();
        assert_eq!(result, sel(&[1]));
        assert_eq!(palette.armed(), SelectionOperation::Subtract);
    }

    #[test]
    fn test_filter_uses_armed_operation() {
        let mut palette = SelectionPalette::default();
        let mut host = square_host();
        host.set_selection(sel(&[0, 1, 2]));

        palette
            .handle(ControlId::Mode(SelectionOperation::Intersect), &mut host)
            .unwrap();
        let result = palette
            .handle(ControlId::Filter(ElementFilter::Corners), &mut host)
            .unwrap();
        assert_eq!(result, sel(&[0, 1]));
        assert_eq!(host.current_selection(), sel(&[0, 1]));
    }

    #[test]
    fn test_row_button_ignores_armed_operation() {
        let mut palette = SelectionPalette::default();
        let mut host = square_host();
        palette.arm(SelectionOperation::Intersect);

        let result = palette
            .handle(
                ControlId::FilterWith(ElementFilter::SmoothCurves, SelectionOperation::Add),
                &mut host,
            )
            .unwrap();
        assert_eq!(result, sel(&[2]));
    }

    #[test]
    fn test_stale_selection_is_returned_unchanged() {
        let mut palette = SelectionPalette::default();
        let mut host = square_host();
        host.set_selection(sel(&[1, 9]));
        let writes = host.writes();

        let result = palette.handle(ControlId::Grow, &mut host).unwrap();
        assert_eq!(result, sel(&[1, 9]));
        assert_eq!(host.writes(), writes);
    }

    #[test]
    fn test_empty_topology_is_silent() {
        let mut palette = SelectionPalette::default();
        let mut host = MemoryHost::new(Outline::new());

        let result = palette.handle(ControlId::Shrink, &mut host).unwrap();
        assert!(result.is_empty());
        assert_eq!(host.writes(), 0);
    }

    #[test]
    fn test_grow_shrink_through_palette() {
        let mut palette = SelectionPalette::default();
        let mut host = square_host();
        host.set_selection(sel(&[0]));

        assert_eq!(palette.handle(ControlId::Grow, &mut host).unwrap(), sel(&[3, 0, 1]));
        assert_eq!(palette.handle(ControlId::Shrink, &mut host).unwrap(), sel(&[0]));
        assert!(palette.handle(ControlId::Undo, &mut host).unwrap().is_empty());
    }

    #[test]
    fn test_unregistered_control() {
        let mut palette = SelectionPalette::default();
        palette.table_mut().handlers.remove(&ControlId::Grow);
        let mut host = square_host();
        assert!(matches!(
            palette.handle(ControlId::Grow, &mut host),
            Err(SelectionError::UnknownControl(_))
        ));
    }

    #[test]
    fn test_register_overrides_handler() {
        let mut palette = SelectionPalette::default();
        palette
            .table_mut()
            .register(ControlId::Grow, Box::new(|_| Ok(Response::Select(SelectionSet::new()))));
        let mut host = square_host();
        host.set_selection(sel(&[0]));
        assert!(palette.handle(ControlId::Grow, &mut host).unwrap().is_empty());
    }

    #[test]
    fn test_armed_operation_persists() {
        let config = PaletteConfig::default();
        let storage = MemoryPreferences::new();
        storage
            .save(
                PALETTE_PREFERENCES_KEY,
                &Preferences {
                    armed_operation: SelectionOperation::Subtract,
                },
            )
            .unwrap();
        let palette = SelectionPalette::new(&config, Box::new(storage));
        assert_eq!(palette.armed(), SelectionOperation::Subtract);
    }

    #[test]
    fn test_config_default_operation() {
        let config = PaletteConfig {
            default_operation: SelectionOperation::Intersect,
            ..PaletteConfig::default()
        };
        let palette = SelectionPalette::new(&config, Box::new(MemoryPreferences::new()));
        assert_eq!(palette.armed(), SelectionOperation::Intersect);
    }

    #[test]
    fn test_mode_click_is_restored_by_next_palette() {
        let dir = tempdir().unwrap();
        let config = PaletteConfig {
            preferences_path: Some(dir.path().to_path_buf()),
            ..PaletteConfig::default()
        };
        let mut host = square_host();

        let mut palette = SelectionPalette::from_config(&config).unwrap();
        palette
            .handle(ControlId::Mode(SelectionOperation::Intersect), &mut host)
            .unwrap();
        drop(palette);

        let restored = SelectionPalette::from_config(&config).unwrap();
        assert_eq!(restored.armed(), SelectionOperation::Intersect);
    }

    #[test]
    fn test_failed_save_still_arms() {
        let mut palette =
            SelectionPalette::new(&PaletteConfig::default(), Box::new(ReadOnlyPreferences));
        let mut host = square_host();
        host.set_selection(sel(&[1]));

        let result = palette
            .handle(ControlId::Mode(SelectionOperation::Subtract), &mut host)
            .unwrap();
        assert_eq!(result, sel(&[1]));
        assert_eq!(palette.armed(), SelectionOperation::Subtract);
    }

    #[test]
    fn test_reset_armed_restores_default() {
        let dir = tempdir().unwrap();
        let config = PaletteConfig {
            default_operation: SelectionOperation::Subtract,
            preferences_path: Some(dir.path().to_path_buf()),
            ..PaletteConfig::default()
        };

        let mut palette = SelectionPalette::from_config(&config).unwrap();
        palette.arm(SelectionOperation::Intersect);
        palette.reset_armed().unwrap();
        assert_eq!(palette.armed(), SelectionOperation::Subtract);

        let restored = SelectionPalette::from_config(&config).unwrap();
        assert_eq!(restored.armed(), SelectionOperation::Subtract);
    }

    #[test]
    fn test_reset_armed_reports_storage_failure() {
        let mut palette =
            SelectionPalette::new(&PaletteConfig::default(), Box::new(ReadOnlyPreferences));
        palette.arm(SelectionOperation::Intersect);
        assert!(matches!(palette.reset_armed(), Err(StorageError::Io(_))));
        assert_eq!(palette.armed(), SelectionOperation::Intersect);
    }

    #[test]
    fn test_empty_topology_leaves_host_selection() {
        let mut palette = SelectionPalette::default();
        let mut host = MemoryHost::new(Outline::new());
        host.set_selection([SelectableElement::Anchor { index: 0 }].into_iter().collect());

        let result = palette.handle(ControlId::Grow, &mut host).unwrap();
        assert!(result.is_empty());
        assert_eq!(host.current_selection().len(), 1);
        assert_eq!(host.writes(), 1);
    }
}
