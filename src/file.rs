use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::strip::{self, Stripped};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Strip console logging statements from the file at `path`, overwriting it in place.
///
/// The file must be UTF-8. It is rewritten even if nothing was removed, and
/// no backup is kept.
pub fn rewrite_file(path: impl AsRef<Path>) -> Result<Stripped, FileError> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_owned(),
        source,
    })?;

    let stripped = strip::process(&contents);
    debug!(
        "Removed {} and kept {} calls in {:?}",
        stripped.removed.len(),
        stripped.kept.len(),
        path
    );

    fs::write(path, &stripped.text).map_err(|source| FileError::Write {
        path: path.to_owned(),
        source,
    })?;

    Ok(stripped)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.js");
        fs::write(&path, "start();\nconsole.log(1);\nend();\n").unwrap();

        let stripped = rewrite_file(&path).unwrap();

        assert_eq!(1, stripped.removed.len());
        assert_eq!("start();\nend();\n", fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.js");

        let err = rewrite_file(&path).unwrap_err();

        assert!(matches!(err, FileError::Read { .. }));
        assert!(!path.exists(), "missing file should not be created");
    }

    #[test]
    fn invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.js");
        fs::write(&path, b"console.log(\xff);\n").unwrap();

        let err = rewrite_file(&path).unwrap_err();

        match err {
            FileError::Read { source, .. } => {
                assert_eq!(io::ErrorKind::InvalidData, source.kind())
            }
            other => panic!("expected read error, got {other:?}"),
        }
        assert_eq!(
            b"console.log(\xff);\n".as_slice(),
            fs::read(&path).unwrap(),
            "file should be left untouched"
        );
    }
}
