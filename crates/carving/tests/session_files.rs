//! Session-level file workflows: save, load, export and "save as"

use std::fs;

use approx::assert_relative_eq;
use carving::{
    ChiselConfig, ChiselError, ChiselSession, PointerEvent, SaveKind, SaveTarget, Silhouette,
    Vec2, is_project_file,
};
use image::{Rgba, RgbaImage};

fn carved_session() -> ChiselSession {
    let mut session =
        ChiselSession::new(Silhouette::ellipse(80, 60).unwrap(), ChiselConfig::default()).unwrap();
    let script = [
        PointerEvent::Down { x: 10.0, y: 30.0, t: 0.0 },
        PointerEvent::Move { x: 30.0, y: 25.0, t: 0.05 },
        PointerEvent::Move { x: 60.0, y: 35.0, t: 0.08 },
        PointerEvent::Move { x: 70.0, y: 30.0, t: 0.30 },
        PointerEvent::Up { t: 0.35 },
    ];
    for event in script {
        session.handle_pointer(event);
    }
    session
}

#[test]
fn test_load_mismatched_dimensions_leaves_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("small.chisel-project");
    ChiselSession::new(Silhouette::full(4, 4).unwrap(), ChiselConfig::default())
        .unwrap()
        .save_project(&path)
        .unwrap();

    let mut session = carved_session();
    let before = session.field().coverage().to_vec();

    let err = session.load_project(&path).unwrap_err();
    assert!(matches!(
        err,
        ChiselError::DimensionMismatch {
            expected: (80, 60),
            found: (4, 4)
        }
    ));
    assert_eq!(session.field().coverage(), before.as_slice());
}

#[test]
fn test_reload_then_reset_is_fresh_rock() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rock.chisel-project");
    let session = carved_session();
    let remaining = session.remaining_fraction();
    session.save_project(&path).unwrap();

    let mut reopened =
        ChiselSession::new(Silhouette::ellipse(80, 60).unwrap(), ChiselConfig::default()).unwrap();
    reopened.load_project(&path).unwrap();
    assert_relative_eq!(reopened.remaining_fraction(), remaining, max_relative = 1e-2);

    reopened.reset_field();
    assert_eq!(reopened.remaining_fraction(), 1.0);
}

#[test]
fn test_failed_save_leaves_no_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("rock.chisel-project");

    let result = carved_session().save_project(&path);
    assert!(matches!(result, Err(ChiselError::Io(_))));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_transparent_export_matches_coverage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rock.png");
    let session = carved_session();
    session.export_image(&path, true).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    let quantized = session.field().quantized();
    for (pixel, &alpha) in image.pixels().zip(&quantized) {
        assert_eq!(pixel.0[3], alpha);
    }
}

#[test]
fn test_background_export_is_opaque_over_opaque_backdrop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rock.png");
    let mut session = carved_session();
    session
        .set_background(Some(RgbaImage::from_pixel(80, 60, Rgba([20, 40, 60, 255]))))
        .unwrap();
    session.export_image(&path, false).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    assert!(image.pixels().all(|p| p.0[3] == 255));
    assert_eq!(image.get_pixel(0, 0).0, [20, 40, 60, 255]);
}

#[test]
fn test_save_as_project_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = carved_session();

    let target = SaveTarget::new(dir.path(), "statue", SaveKind::Project);
    let written = session.save_as(&target).unwrap();
    assert_eq!(written, vec![dir.path().join("statue.chisel-project")]);
    assert!(is_project_file(&written[0]));

    let mut reopened =
        ChiselSession::new(Silhouette::ellipse(80, 60).unwrap(), ChiselConfig::default()).unwrap();
    reopened.load_project(&written[0]).unwrap();
    assert_eq!(reopened.field().quantized(), session.field().quantized());
}

#[test]
fn test_dirty_tiles_cover_carved_cells() {
    let mut session =
        ChiselSession::new(Silhouette::full(200, 130).unwrap(), ChiselConfig::default()).unwrap();
    session.take_dirty_tiles();

    session.begin_stroke(Vec2::new(10.0, 10.0), 0.0);
    session.continue_stroke(Vec2::new(12.0, 10.0), 1.0);
    session.end_stroke(1.1);

    let tiles = session.take_dirty_tiles();
    assert!(!tiles.is_empty());
    for tile in &tiles {
        let (x, y, w, h) = session.field().tile_bounds(*tile);
        assert!(x < 200 && y < 130 && w > 0 && h > 0);
    }
    for y in 0..130 {
        for x in 0..200 {
            if session.field().get(x, y).unwrap() < 1.0 {
                let size = session.field().tile_size();
                assert!(tiles.iter().any(|t| t.x == x / size && t.y == y / size));
            }
        }
    }
}
