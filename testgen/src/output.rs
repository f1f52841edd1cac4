//! Writing generated suites to disk.

use crate::{GeneratedSuite, GenerationError, GenerationResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Write every file of a suite into `directory`, creating it if needed.
///
/// Either all files are written or none are left behind: on failure the
/// files written so far are removed.
pub fn write_suite(suite: &GeneratedSuite, directory: &Path) -> GenerationResult<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .map_err(|source| GenerationError::destination_unavailable(directory, source))?;

    let mut written = Vec::with_capacity(suite.len());
    for file in suite.files() {
        let path = directory.join(&file.name);
        if let Err(err) = write_file(&path, &file.contents) {
            discard(&written);
            return Err(err);
        }
        debug!(path = %path.display(), bytes = file.contents.len(), "wrote test file");
        written.push(path);
    }
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> GenerationResult<()> {
    let mut handle = File::create(path)
        .map_err(|source| GenerationError::destination_unavailable(path, source))?;
    let result = handle.write_all(contents.as_bytes()).and_then(|()| handle.flush());
    drop(handle);
    result.map_err(|source| {
        discard(&[path.to_path_buf()]);
        GenerationError::io(path, source)
    })
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), %err, "could not remove incomplete output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratedFile;

    #[test]
    fn test_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut suite = GeneratedSuite::new("BankTest");
        suite.push(GeneratedFile::new("A.java", "class A {}\n"));
        suite.push(GeneratedFile::new("B.java", "class B {}\n"));

        let target = dir.path().join("nested").join("out");
        let written = write_suite(&suite, &target).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(target.join("B.java")).unwrap(), "class B {}\n");
    }

    #[test]
    fn test_destination_under_a_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut suite = GeneratedSuite::new("BankTest");
        suite.push(GeneratedFile::new("A.java", "class A {}\n"));
        let err = write_suite(&suite, &blocker.join("out")).unwrap_err();
        assert!(matches!(err, GenerationError::DestinationUnavailable { .. }));
    }

    #[test]
    fn test_failed_file_removes_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("B.java")).unwrap();

        let mut suite = GeneratedSuite::new("BankTest");
        suite.push(GeneratedFile::new("A.java", "class A {}\n"));
        suite.push(GeneratedFile::new("B.java", "class B {}\n"));
        let err = write_suite(&suite, dir.path()).unwrap_err();
        assert!(matches!(err, GenerationError::DestinationUnavailable { .. }));
        assert!(!dir.path().join("A.java").exists());
    }
}
