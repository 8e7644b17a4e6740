// Binary verification
// Runs at detection time and again before every execution: the binary may be
// replaced or removed while the provider is running.

use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::VerificationError;

/// Reject paths that are unsafe or impossible to execute
///
/// Checks, in order:
/// 1. the path exists and can be stat'ed
/// 2. the entry itself is a regular file (symlinks are not followed and are rejected)
/// 3. at least one execute permission bit is set
pub fn verify_binary(path: &Path) -> Result<(), VerificationError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(VerificationError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(VerificationError::Stat {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let file_type = metadata.file_type();
    if !file_type.is_file() {
        let kind = if file_type.is_symlink() {
            "symbolic link"
        } else if file_type.is_dir() {
            "directory"
        } else {
            "special file"
        };
        return Err(VerificationError::InvalidBinaryKind {
            path: path.to_path_buf(),
            kind,
        });
    }

    if !is_executable(path, &metadata) {
        return Err(VerificationError::NotExecutable {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn is_executable(_path: &Path, metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path, _metadata: &Metadata) -> bool {
    // No execute bits on Windows: fall back to the executable extensions
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["exe", "com", "bat", "cmd"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, mode: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = verify_binary(&dir.path().join("terraform"));
        assert!(matches!(result, Err(VerificationError::NotFound { .. })));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = TempDir::new().unwrap();
        let result = verify_binary(dir.path());
        assert!(matches!(
            result,
            Err(VerificationError::InvalidBinaryKind { kind: "directory", .. })
        ));
    }

    #[test]
    fn test_symlink_to_executable_rejected() {
        let dir = TempDir::new().unwrap();
        let target = write_file(&dir, "terraform-real", 0o755);
        let link = dir.path().join("terraform");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(verify_binary(&target).is_ok());
        assert!(matches!(
            verify_binary(&link),
            Err(VerificationError::InvalidBinaryKind { kind: "symbolic link", .. })
        ));
    }

    #[test]
    fn test_non_executable_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "terraform", 0o644);
        assert!(matches!(
            verify_binary(&path),
            Err(VerificationError::NotExecutable { .. })
        ));
    }

    #[test]
    fn test_executable_file_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "terraform", 0o755);
        assert!(verify_binary(&path).is_ok());
    }

    #[test]
    fn test_any_execute_bit_is_enough() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "tofu", 0o601);
        assert!(verify_binary(&path).is_ok());
    }
}
