//! File-level conversion helpers
//!
//! Thin wrappers around the in-memory API. In-place conversion writes to a
//! sibling temporary file and renames it over the original.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Encoding, Error, Result, convert_to_utf8, detect_encoding};

/// Suffix of the temporary file written next to the target during replace
const TEMP_SUFFIX: &str = ".utf8.tmp";

/// Read an entire file as raw bytes.
pub fn read_all_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Create or truncate `path` and write `bytes` to it.
pub fn write_all_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of the temporary sibling used by [`replace_atomically`].
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Replace the contents of `path` with `bytes`.
///
/// The bytes go to `<path>.utf8.tmp` first, which is then renamed over
/// `path`. If the rename fails the target is removed and the rename retried
/// once. When writing or the final rename fails, the temporary file is
/// removed and the error returned.
pub fn replace_atomically(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp = temp_path(path);

    if let Err(err) = write_all_bytes(&temp, bytes) {
        let _ = std::fs::remove_file(&temp);
        return Err(err);
    }

    let Err(first) = std::fs::rename(&temp, path) else {
        return Ok(());
    };
    debug!(path = %path.display(), error = %first, "rename failed, removing target and retrying");

    // The target may already be gone; only the second rename decides
    let _ = std::fs::remove_file(path);
    if let Err(source) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(Error::Replace {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Detect the encoding of a file.
pub fn detect_file(path: impl AsRef<Path>) -> Result<Encoding> {
    let bytes = read_all_bytes(path)?;
    Ok(detect_encoding(&bytes))
}

/// Read a file and convert its contents to UTF-8.
///
/// Returns the UTF-8 bytes and the encoding they were decoded from.
pub fn convert_file(path: impl AsRef<Path>) -> Result<(Vec<u8>, Encoding)> {
    let path = path.as_ref();
    let bytes = read_all_bytes(path)?;
    let converted = convert_to_utf8(&bytes);
    let encoding = converted.encoding;
    debug!(path = %path.display(), encoding = encoding.name(), "converted file");
    Ok((converted.into_bytes(), encoding))
}

/// Convert `input` to UTF-8 and write the result to `output`.
///
/// The input file is left untouched.
pub fn convert_file_to(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Encoding> {
    let (utf8, encoding) = convert_file(input)?;
    write_all_bytes(output, &utf8)?;
    Ok(encoding)
}

/// Convert a file to UTF-8 and replace it on disk.
pub fn convert_file_in_place(path: impl AsRef<Path>) -> Result<Encoding> {
    let path = path.as_ref();
    let (utf8, encoding) = convert_file(path)?;
    replace_atomically(path, &utf8)?;
    Ok(encoding)
}
