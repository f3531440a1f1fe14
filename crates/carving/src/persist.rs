//! Atomic file replacement
//!
//! Output is written to a uniquely named hidden sibling file and renamed
//! over the destination, so a failed write never leaves a partial file
//! behind and concurrent saves to one destination never share a temp file.

use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

/// Write `bytes` to `destination` atomically
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> io::Result<()> {
    let name = destination.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", destination.display()),
        )
    })?;
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut prefix = std::ffi::OsString::from(".");
    prefix.push(name);
    prefix.push(".");

    // Dropped without persisting on any error, which deletes it
    let mut temp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    debug!(
        "write_atomic: {} bytes to {} via {}",
        bytes.len(),
        destination.display(),
        temp.path().display()
    );

    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_write_and_replace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rock.bin");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_concurrent_writes_to_one_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Arc::new(dir.path().join("rock.bin"));
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 64 * 1024]).collect();

        let writers: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let path = Arc::clone(&path);
                thread::spawn(move || write_atomic(&path, &payload))
            })
            .collect();
        for writer in writers {
            writer.join().unwrap().unwrap();
        }

        // The survivor is one complete payload, never an interleaving
        let written = fs::read(path.as_ref()).unwrap();
        assert!(payloads.contains(&written));
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("rock.bin");

        assert!(write_atomic(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_path_without_name_is_rejected() {
        let err = write_atomic(Path::new("/"), b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
