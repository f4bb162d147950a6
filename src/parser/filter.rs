use crate::format::InputFormat;
use std::path::Path;

/// Return true if the path is an existing file with a decodable extension
pub fn is_supported_file(path: &Path) -> bool {
    path.is_file() && input_format_of(path).is_some()
}

/// Input format implied by the path's extension, if it is a supported one
pub fn input_format_of(path: &Path) -> Option<InputFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| InputFormat::from_label(ext).ok())
}
