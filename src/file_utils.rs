use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @checks: File name ends with `suffix`, exact and case-sensitive
    pub fn has_suffix<P: AsRef<Path>>(path: P, suffix: &str) -> bool {
        path.as_ref()
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
    }

    /// Lazily walk `root` and yield every regular file whose name ends with `suffix`.
    ///
    /// Symlinks are not followed while walking, but a link that points at a file
    /// is yielded. Entries that cannot be read are skipped with a warning.
    pub fn discover<P: AsRef<Path>>(root: P, suffix: &str) -> impl Iterator<Item = PathBuf> {
        let suffix = suffix.to_string();
        WalkDir::new(root.as_ref())
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(move |entry| {
                entry.file_name().to_string_lossy().ends_with(suffix.as_str()) && entry.path().is_file()
            })
            .map(walkdir::DirEntry::into_path)
    }

    // @generates: Output path next to the input, extension replaced
    pub fn output_path<P: AsRef<Path>>(input_file: P, extension: &str) -> PathBuf {
        input_file.as_ref().with_extension(extension)
    }

    // @returns: Base name without extension, used as the document identifier
    pub fn file_identifier<P: AsRef<Path>>(input_file: P) -> String {
        input_file
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
