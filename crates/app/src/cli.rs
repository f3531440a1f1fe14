//! Command-line arguments

use std::path::PathBuf;

use carving::SaveKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Carve rocks from recorded pointer strokes
#[derive(Debug, Parser)]
#[command(name = "chisel")]
#[command(about = "Replay pointer strokes onto a rock and save the carving")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a stroke script and save the result
    Carve(CarveArgs),
    /// Print the dimensions and remaining material of a project file
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct CarveArgs {
    /// JSON array of pointer events ({"event": "down"|"move"|"up", "x", "y", "t"})
    #[arg(long)]
    pub script: PathBuf,

    /// Rock image; opaque pixels become stone
    #[arg(long, conflicts_with = "size")]
    pub rock: Option<PathBuf>,

    /// Size of the procedural rock, e.g. 640x480
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Project to continue carving
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// JSON carve/export settings
    #[arg(long, env = "CHISEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backdrop image for background exports, sized like the rock
    #[arg(long)]
    pub background: Option<PathBuf>,

    /// Output directory (defaults to ./saves if present, else .)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Output file name
    #[arg(long)]
    pub name: String,

    /// What to write
    #[arg(long, value_enum, default_value_t = KindArg::All)]
    pub kind: KindArg,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Project file to inspect
    pub file: PathBuf,

    /// Rock image the project was carved from
    #[arg(long)]
    pub rock: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Background,
    Transparent,
    Project,
    All,
}

impl From<KindArg> for SaveKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Background => SaveKind::Background,
            KindArg::Transparent => SaveKind::Transparent,
            KindArg::Project => SaveKind::Project,
            KindArg::All => SaveKind::All,
        }
    }
}

/// Parse `WIDTHxHEIGHT`
fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|e| format!("bad width {width:?}: {e}"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|e| format!("bad height {height:?}: {e}"))?;
    if width == 0 || height == 0 {
        return Err("width and height must be positive".to_string());
    }
    Ok((width, height))
}
