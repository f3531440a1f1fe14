//! Output file naming for "save as"
//!
//! A [`SaveTarget`] turns a directory, a typed file name and a [`SaveKind`]
//! into the concrete files to write.

use std::path::{Path, PathBuf};

use chisel_config::{
    IMAGE_EXTENSION, MAX_FILENAME_LENGTH, PROJECT_EXTENSION, SAVES_DIR, TRANSPARENT_SUFFIX,
};

/// What a save produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveKind {
    /// Stone composited over the background
    Background,
    /// Stone only, coverage as alpha
    Transparent,
    /// Reloadable `.chisel-project` file
    Project,
    /// All three of the above
    All,
}

impl SaveKind {
    /// File extension appended to the name, None for [`SaveKind::All`]
    pub fn extension(self) -> Option<&'static str> {
        match self {
            SaveKind::Background | SaveKind::Transparent => Some(IMAGE_EXTENSION),
            SaveKind::Project => Some(PROJECT_EXTENSION),
            SaveKind::All => None,
        }
    }

    /// Kind implied by a typed extension. A bare `.png` means a background image.
    pub fn infer(name: &str) -> Option<SaveKind> {
        if name.ends_with(PROJECT_EXTENSION) {
            Some(SaveKind::Project)
        } else if name.ends_with(IMAGE_EXTENSION) {
            Some(SaveKind::Background)
        } else {
            None
        }
    }
}

/// A single file written by a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutput {
    Background(PathBuf),
    Transparent(PathBuf),
    Project(PathBuf),
}

impl SaveOutput {
    pub fn path(&self) -> &Path {
        match self {
            SaveOutput::Background(path)
            | SaveOutput::Transparent(path)
            | SaveOutput::Project(path) => path,
        }
    }
}

/// Resolved destination of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    dir: PathBuf,
    name: String,
    kind: SaveKind,
}

impl SaveTarget {
    /// Resolve a typed file name.
    ///
    /// The name is cut to [`MAX_FILENAME_LENGTH`] characters. A typed
    /// extension that contradicts `kind` wins over it (typing
    /// `rock.chisel-project` with an image kind selected saves a project).
    /// The kind's extension is then appended if missing.
    pub fn new(dir: impl Into<PathBuf>, name: &str, kind: SaveKind) -> Self {
        let mut name: String = name.chars().take(MAX_FILENAME_LENGTH).collect();

        let kind = match (kind.extension(), SaveKind::infer(&name)) {
            (Some(ext), Some(typed)) if typed.extension() != Some(ext) => typed,
            _ => kind,
        };

        if let Some(ext) = kind.extension() {
            if !name.ends_with(ext) {
                name.push_str(ext);
            }
        }

        Self {
            dir: dir.into(),
            name,
            kind,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name after truncation and extension handling
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SaveKind {
        self.kind
    }

    /// Files to write, in write order
    pub fn outputs(&self) -> Vec<SaveOutput> {
        match self.kind {
            SaveKind::Background => vec![SaveOutput::Background(self.dir.join(&self.name))],
            SaveKind::Transparent => vec![SaveOutput::Transparent(self.dir.join(&self.name))],
            SaveKind::Project => vec![SaveOutput::Project(self.dir.join(&self.name))],
            SaveKind::All => vec![
                SaveOutput::Background(self.sibling(IMAGE_EXTENSION)),
                SaveOutput::Transparent(
                    self.sibling(&format!("{TRANSPARENT_SUFFIX}{IMAGE_EXTENSION}")),
                ),
                SaveOutput::Project(self.sibling(PROJECT_EXTENSION)),
            ],
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.name, suffix))
    }
}

/// Whether a path looks like a project file
pub fn is_project_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(PROJECT_EXTENSION))
}

/// Default directory for saves: `cwd/saves` if it exists, otherwise `cwd`
pub fn saves_dir(cwd: &Path) -> PathBuf {
    let saves = cwd.join(SAVES_DIR);
    if saves.is_dir() {
        saves
    } else {
        cwd.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_appended() {
        let target = SaveTarget::new("/tmp/out", "rock", SaveKind::Project);
        assert_eq!(target.name(), "rock.chisel-project");
        assert_eq!(
            target.outputs(),
            vec![SaveOutput::Project(PathBuf::from(
                "/tmp/out/rock.chisel-project"
            ))]
        );
    }

    #[test]
    fn test_extension_not_doubled() {
        let target = SaveTarget::new("/tmp", "rock.png", SaveKind::Transparent);
        assert_eq!(target.name(), "rock.png");
        assert_eq!(target.kind(), SaveKind::Transparent);
    }

    #[test]
    fn test_typed_extension_switches_kind() {
        let target = SaveTarget::new("/tmp", "rock.chisel-project", SaveKind::Background);
        assert_eq!(target.kind(), SaveKind::Project);

        let target = SaveTarget::new("/tmp", "rock.png", SaveKind::Project);
        assert_eq!(target.kind(), SaveKind::Background);
        assert_eq!(target.name(), "rock.png");
    }

    #[test]
    fn test_all_writes_three_files() {
        let target = SaveTarget::new("/tmp", "statue", SaveKind::All);
        let outputs = target.outputs();
        assert_eq!(
            outputs,
            vec![
                SaveOutput::Background(PathBuf::from("/tmp/statue.png")),
                SaveOutput::Transparent(PathBuf::from("/tmp/statue_transparent.png")),
                SaveOutput::Project(PathBuf::from("/tmp/statue.chisel-project")),
            ]
        );
    }

    #[test]
    fn test_name_truncated() {
        let long = "é".repeat(MAX_FILENAME_LENGTH + 40);
        let target = SaveTarget::new("/tmp", &long, SaveKind::Background);
        assert_eq!(
            target.name().chars().count(),
            MAX_FILENAME_LENGTH + IMAGE_EXTENSION.len()
        );
        assert!(target.name().ends_with(IMAGE_EXTENSION));
    }

    #[test]
    fn test_infer() {
        assert_eq!(SaveKind::infer("a.chisel-project"), Some(SaveKind::Project));
        assert_eq!(SaveKind::infer("a.png"), Some(SaveKind::Background));
        assert_eq!(SaveKind::infer("a.jpg"), None);
    }

    #[test]
    fn test_is_project_file() {
        assert!(is_project_file(Path::new("saves/rock.chisel-project")));
        assert!(!is_project_file(Path::new("saves/rock.png")));
        assert!(!is_project_file(Path::new("saves")));
    }

    #[test]
    fn test_saves_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(saves_dir(dir.path()), dir.path());

        std::fs::create_dir(dir.path().join(SAVES_DIR)).unwrap();
        assert_eq!(saves_dir(dir.path()), dir.path().join(SAVES_DIR));
    }
}
