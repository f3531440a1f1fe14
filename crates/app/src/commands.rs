//! Subcommand implementations

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carving::{ChiselSession, SaveTarget, Silhouette, codec, is_project_file, saves_dir};
use chisel_config::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH};
use tracing::{info, warn};

use crate::cli::{CarveArgs, InfoArgs};
use crate::config::{load_config, load_script};

/// Replay a stroke script and write the requested outputs. Returns the files written.
pub fn carve(args: CarveArgs) -> Result<Vec<PathBuf>> {
    let config = load_config(args.config.as_deref())?;
    let script = load_script(&args.script)?;
    let silhouette = rock(args.rock.as_deref(), args.size, args.load.as_deref())?;
    let mut session = ChiselSession::new(silhouette, config).context("starting session")?;

    if let Some(path) = &args.background {
        let background = image::open(path)
            .with_context(|| format!("reading background {}", path.display()))?
            .to_rgba8();
        session
            .set_background(Some(background))
            .with_context(|| format!("background {} does not fit the rock", path.display()))?;
    }

    if let Some(path) = &args.load {
        if !is_project_file(path) {
            warn!("{} does not have a project extension", path.display());
        }
        session.suspend_input();
        session
            .load_project(path)
            .with_context(|| format!("{} could not be loaded", path.display()))?;
        session.resume_input();
    }

    let mut removed = 0.0;
    for event in script {
        removed += session.handle_pointer(event);
    }
    if session.is_stroking() {
        warn!("Stroke script ended without releasing the pointer");
    }
    info!(
        "Carved {:.1} cells of material, {:.1}% remaining",
        removed,
        session.remaining_fraction() * 100.0
    );

    let dir = match args.out {
        Some(dir) => dir,
        None => saves_dir(&env::current_dir().context("reading current directory")?),
    };
    let target = SaveTarget::new(dir, &args.name, args.kind.into());

    session.suspend_input();
    session
        .save_as(&target)
        .with_context(|| format!("{} could not be saved", target.name()))
}

/// Describe a project file
pub fn info(args: InfoArgs) -> Result<String> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let (width, height) = codec::peek_dimensions(&bytes)
        .with_context(|| format!("{} could not be loaded", args.file.display()))?;

    let silhouette = match &args.rock {
        Some(path) => Silhouette::load(path)
            .with_context(|| format!("reading rock {}", path.display()))?,
        None => Silhouette::full(width, height)?,
    };
    let field = codec::decode(&bytes, &silhouette)
        .with_context(|| format!("{} could not be loaded", args.file.display()))?;

    let basis = if args.rock.is_some() { "rock" } else { "field" };
    Ok(format!(
        "{}: {}x{}, {:.1}% of the {} remaining",
        args.file.display(),
        width,
        height,
        field.remaining_fraction() * 100.0,
        basis
    ))
}

/// The rock to carve: an image, an explicit size, the size of the project
/// being continued, or the default size
fn rock(
    image: Option<&Path>,
    size: Option<(u32, u32)>,
    project: Option<&Path>,
) -> Result<Silhouette> {
    if let Some(path) = image {
        return Silhouette::load(path)
            .with_context(|| format!("reading rock {}", path.display()));
    }

    let (width, height) = match (size, project) {
        (Some(size), _) => size,
        (None, Some(path)) => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            codec::peek_dimensions(&bytes)
                .with_context(|| format!("{} could not be loaded", path.display()))?
        }
        (None, None) => (DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
    };
    Ok(Silhouette::ellipse(width, height)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::KindArg;

    const SCRIPT: &str = r#"[
        {"event": "down", "x": 8, "y": 16, "t": 0.0},
        {"event": "move", "x": 20, "y": 14, "t": 0.05},
        {"event": "move", "x": 40, "y": 18, "t": 0.1},
        {"event": "up", "x": 40, "y": 18, "t": 0.15}
    ]"#;

    fn carve_args(dir: &Path, kind: KindArg) -> CarveArgs {
        let script = dir.join("strokes.json");
        fs::write(&script, SCRIPT).unwrap();
        CarveArgs {
            script,
            rock: None,
            size: Some((48, 32)),
            load: None,
            config: None,
            background: None,
            out: Some(dir.to_path_buf()),
            name: "statue".to_string(),
            kind,
        }
    }

    #[test]
    fn test_carve_writes_all_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let written = carve(carve_args(dir.path(), KindArg::All)).unwrap();

        assert_eq!(written.len(), 3);
        for path in &written {
            assert!(path.is_file(), "{} missing", path.display());
        }
    }

    #[test]
    fn test_info_reports_carving() {
        let dir = tempfile::tempdir().expect("tempdir");
        let written = carve(carve_args(dir.path(), KindArg::Project)).unwrap();

        let summary = info(InfoArgs {
            file: written[0].clone(),
            rock: None,
        })
        .unwrap();
        assert!(summary.contains("48x32"));
        assert!(!summary.contains("100.0%"));
    }

    fn header_only_project(dir: &Path) -> PathBuf {
        let path = dir.join("truncated.chisel-project");
        let mut bytes = Vec::new();
        for value in [1u32, u32::MAX, u32::MAX] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_info_rejects_truncated_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = info(InfoArgs {
            file: header_only_project(dir.path()),
            rock: None,
        })
        .unwrap_err();
        assert!(format!("{err}").contains("could not be loaded"));
    }

    #[test]
    fn test_carve_rejects_truncated_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut args = carve_args(dir.path(), KindArg::Project);
        args.size = None;
        args.load = Some(header_only_project(dir.path()));
        let err = carve(args).unwrap_err();
        assert!(format!("{err}").contains("could not be loaded"));
    }

    #[test]
    fn test_continue_from_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = carve(carve_args(dir.path(), KindArg::Project)).unwrap();

        let mut args = carve_args(dir.path(), KindArg::Project);
        args.size = None;
        args.load = Some(first[0].clone());
        args.name = "second".to_string();
        let second = carve(args).unwrap();

        let first_field = codec::load(&first[0], &Silhouette::ellipse(48, 32).unwrap()).unwrap();
        let second_field = codec::load(&second[0], &Silhouette::ellipse(48, 32).unwrap()).unwrap();
        assert!(second_field.remaining_fraction() < first_field.remaining_fraction());
    }

    #[test]
    fn test_load_size_mismatch_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = carve(carve_args(dir.path(), KindArg::Project)).unwrap();

        let mut args = carve_args(dir.path(), KindArg::Project);
        args.size = Some((10, 10));
        args.load = Some(first[0].clone());
        let err = carve(args).unwrap_err();
        assert!(format!("{err}").contains("could not be loaded"));
    }
}
