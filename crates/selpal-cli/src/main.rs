//! Headless selection palette host.
//!
//! Loads a layer outline (and optionally a selection) from JSON, replays palette
//! controls against it and prints the resulting selection as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use selpal_core::{
    ControlId, EditView, MemoryHost, Outline, Palette, PaletteConfig, SelectionOperation,
    SelectionPalette, SelectionSet,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "selpal", version, about = "Replay selection palette controls on a glyph outline")]
struct Cli {
    /// Outline JSON of the active layer.
    #[arg(long, required_unless_present_any = ["list_controls", "reset_mode"])]
    outline: Option<PathBuf>,

    /// Initial selection JSON (a list of elements, oldest first).
    #[arg(long)]
    selection: Option<PathBuf>,

    /// Palette configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arm this operation before replaying controls.
    #[arg(long)]
    mode: Option<SelectionOperation>,

    /// Forget the stored operation mode before anything else.
    #[arg(long)]
    reset_mode: bool,

    /// Print the palette rows and menu items, then exit.
    #[arg(long)]
    list_controls: bool,

    /// Print the selection on one line.
    #[arg(long)]
    compact: bool,

    /// Controls to replay, e.g. `grow`, `lines`, `handles:subtract`, `mode:intersect`.
    controls: Vec<ControlId>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = PaletteConfig::load_or_default(cli.config.as_deref())
        .context("failed to load palette configuration")?;
    let mut palette =
        SelectionPalette::from_config(&config).context("failed to open palette preferences")?;

    if cli.reset_mode {
        palette
            .reset_armed()
            .context("failed to reset the stored operation mode")?;
    }

    if cli.list_controls {
        print!("{}", palette.view().describe());
        return Ok(());
    }

    let Some(outline_path) = cli.outline else {
        return Ok(());
    };
    let outline = read_outline(&outline_path)?;
    let selection = match &cli.selection {
        Some(path) => read_selection(path)?,
        None => SelectionSet::new(),
    };

    if let Some(mode) = cli.mode {
        palette.arm(mode);
    }

    let mut host = MemoryHost::with_selection(outline, selection);
    palette.on_activate(&mut host);
    for control in cli.controls {
        let selection = palette.handle(control, &mut host)?;
        log::info!("{} -> {} selected", control, selection.len());
    }

    let selection = host.current_selection();
    let json = if cli.compact {
        serde_json::to_string(&selection)?
    } else {
        serde_json::to_string_pretty(&selection)?
    };
    println!("{}", json);
    Ok(())
}

fn read_outline(path: &Path) -> Result<Outline> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read outline {}", path.display()))?;
    Outline::from_json(&json).with_context(|| format!("failed to parse outline {}", path.display()))
}

fn read_selection(path: &Path) -> Result<SelectionSet> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read selection {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse selection {}", path.display()))
}
