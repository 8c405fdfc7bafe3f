//! Declarative description of the palette panel and its menu items.

use crate::filter::ElementFilter;
use crate::palette::ControlId;
use crate::selection::SelectionOperation;
use serde::Serialize;
use std::fmt::Write as _;

/// Panel width in points.
pub const PALETTE_WIDTH: f64 = 180.0;
/// Panel height in points.
pub const PALETTE_HEIGHT: f64 = 200.0;

/// One ADD / SUBTRACT / INTERSECT button of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationButton {
    pub icon: &'static str,
    pub control: ControlId,
}

/// A row of the panel: icon, label and three operation buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteRow {
    pub filter: ElementFilter,
    pub icon: &'static str,
    pub label: &'static str,
    pub buttons: Vec<OperationButton>,
}

impl PaletteRow {
    pub fn new(filter: ElementFilter) -> Self {
        Self {
            filter,
            icon: filter.icon(),
            label: filter.label(),
            buttons: SelectionOperation::ALL
                .into_iter()
                .map(|op| OperationButton {
                    icon: op.icon(),
                    control: ControlId::FilterWith(filter, op),
                })
                .collect(),
        }
    }
}

/// An item the palette adds to the host's edit menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: &'static str,
    pub control: ControlId,
}

impl MenuItem {
    pub const fn new(title: &'static str, control: ControlId) -> Self {
        Self { title, control }
    }
}

/// Everything the host needs to build and dock the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteView {
    pub title: &'static str,
    pub width: f64,
    pub height: f64,
    pub rows: Vec<PaletteRow>,
    /// Inserted after "Invert Selection" in the edit menu, in this order.
    pub menu_items: Vec<MenuItem>,
}

impl PaletteView {
    /// The standard panel: one row per filter, plus the edit-menu items.
    pub fn standard(install_menu_items: bool) -> Self {
        Self {
            title: "Selection",
            width: PALETTE_WIDTH,
            height: PALETTE_HEIGHT,
            rows: ElementFilter::ALL.into_iter().map(PaletteRow::new).collect(),
            menu_items: if install_menu_items {
                Self::edit_menu_items()
            } else {
                Vec::new()
            },
        }
    }

    fn edit_menu_items() -> Vec<MenuItem> {
        vec![
            MenuItem::new("Continue Selection", ControlId::Continue),
            MenuItem::new("Undo Selection", ControlId::Undo),
            MenuItem::new("Grow Selection", ControlId::Grow),
            MenuItem::new("Shrink Selection", ControlId::Shrink),
            MenuItem::new("Select Between", ControlId::SelectBetween),
        ]
    }

    /// Every control reachable from this view.
    pub fn controls(&self) -> Vec<ControlId> {
        self.rows
            .iter()
            .flat_map(|row| row.buttons.iter().map(|b| b.control))
            .chain(self.menu_items.iter().map(|item| item.control))
            .collect()
    }

    /// Plain-text listing of the panel, one line per row and menu item.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {} ===", self.title);
        for row in &self.rows {
            let controls: Vec<String> = row.buttons.iter().map(|b| b.control.to_string()).collect();
            let _ = writeln!(out, "  {:12} {}", row.label, controls.join("  "));
        }
        if !self.menu_items.is_empty() {
            let _ = writeln!(out, "--- Edit menu ---");
            for item in &self.menu_items {
                let _ = writeln!(out, "  {:20} {}", item.title, item.control);
            }
        }
        out
    }
}
