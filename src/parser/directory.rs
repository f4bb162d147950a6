use crate::parser::filter::is_supported_file;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find decodable files in a directory. If recursive is true, use walkdir; otherwise list files.
///
/// Results are sorted so batch runs process files in a stable order.
pub fn find_input_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut input_files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let path = entry.path();
            if is_supported_file(path) {
                input_files.push(path.to_path_buf());
            }
        }
    } else {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if is_supported_file(&path) {
                input_files.push(path);
            }
        }
    }

    input_files.sort();
    Ok(input_files)
}
