/// File handling utilities
///
/// This module reads whole files into memory for scanning, memory-mapping
/// large ones, and maps every failure onto a `FileError`.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use log::{debug, info};
use memmap2::Mmap;

use crate::error::FileError;

/// Result of reading a file's content
#[derive(Debug)]
pub struct FileContent {
    /// The content of the file as a string
    pub content: String,
    /// Size of the file in bytes
    pub size: u64,
    /// Whether the file was read through a memory map
    pub mapped: bool,
}

/// Read the whole content of a text file.
///
/// Files larger than `mmap_threshold` bytes are memory-mapped instead of
/// read through a buffer. Either way the content must be valid UTF-8;
/// anything else is a `FileError::Read`.
///
/// # Arguments
///
/// * `file_path` - Path to the file
/// * `mmap_threshold` - Size in bytes above which the file is memory-mapped
///
/// # Returns
///
/// The file content, or `FileError::NotFound` / `FileError::Read`
pub fn read_file_content(file_path: &Path, mmap_threshold: usize) -> Result<FileContent, FileError> {
    let size = fs::metadata(file_path)
        .map_err(|e| FileError::from_io(file_path, e))?
        .len();

    if size > mmap_threshold as u64 {
        info!("Using memory-mapped read for large file ({} bytes)", size);
        let content = read_mapped(file_path).map_err(|e| FileError::from_io(file_path, e))?;
        return Ok(FileContent { content, size, mapped: true });
    }

    debug!("Reading {} ({} bytes)", file_path.display(), size);
    let content = fs::read_to_string(file_path).map_err(|e| FileError::from_io(file_path, e))?;

    Ok(FileContent { content, size, mapped: false })
}

fn read_mapped(file_path: &Path) -> io::Result<String> {
    let file = File::open(file_path)?;

    // SAFETY: the map is read-only and dropped before this function returns;
    // the bytes are copied into an owned String first.
    let mmap = unsafe { Mmap::map(&file)? };

    std::str::from_utf8(&mmap)
        .map(str::to_owned)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_small_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cards.txt");
        fs::write(&path, "4111-1111-1111-1111\n").expect("write");

        let content = read_file_content(&path, 1024).expect("read");
        assert_eq!(content.content, "4111-1111-1111-1111\n");
        assert_eq!(content.size, 20);
        assert!(!content.mapped);
    }

    #[test]
    fn test_read_mapped_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cards.txt");
        fs::write(&path, "line one\nline two\n").expect("write");

        let content = read_file_content(&path, 4).expect("read");
        assert!(content.mapped);
        assert_eq!(content.content, "line one\nline two\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = read_file_content(&dir.path().join("nope.txt"), 1024).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).expect("write");

        for threshold in [0, 1024] {
            let err = read_file_content(&path, threshold).unwrap_err();
            assert!(matches!(err, FileError::Read { .. }), "threshold {}", threshold);
        }
    }
}
