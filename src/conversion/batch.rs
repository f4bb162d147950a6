//! Directory conversion: every decodable file under a directory is converted
//! into a mirrored tree with the output format's extension.

use crate::conversion::engine::{ConversionRequest, Converter};
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::format::{InputFormat, OutputFormat};
use crate::parser::directory::find_input_files;
use crate::parser::InputSource;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options for a directory run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Record failures and keep going instead of stopping at the first one
    pub continue_on_error: bool,
    /// Force one input format for every file instead of using extensions
    pub input_format: Option<InputFormat>,
}

/// Per-file results of a directory run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (input, output) pairs that were written
    pub converted: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, ConversionError)>,
    pub cache_hits: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Map an input file into an output file path.
/// This preserves the input directory structure relative to `input_dir`.
pub fn map_input_to_output(
    input_dir: &Path,
    input_file: &Path,
    output_dir: &Path,
    extension: &str,
) -> PathBuf {
    let relative = input_file.strip_prefix(input_dir).unwrap_or(input_file);
    let mut out = output_dir.join(relative);
    out.set_extension(extension);
    out
}

/// List the files a directory run would convert
pub fn discover(input_dir: &Path, recursive: bool) -> ConversionResult<Vec<PathBuf>> {
    find_input_files(input_dir, recursive).map_err(|e| io_error(input_dir, e))
}

/// One discovered input and where its output goes
#[derive(Debug)]
struct PlannedFile {
    input: PathBuf,
    output: PathBuf,
    /// Earlier input that maps to the same output path
    claimed_by: Option<PathBuf>,
}

impl PlannedFile {
    fn collision(&self) -> Option<ConversionError> {
        self.claimed_by.as_ref().map(|first| {
            ConversionError::conversion(ConversionErrorKind::OutputCollision {
                output: self.output.clone(),
                first: first.clone(),
            })
        })
    }
}

/// Map every input to its output path; the first input in discovery order owns a path
fn plan_outputs(
    input_dir: &Path,
    files: Vec<PathBuf>,
    output_dir: &Path,
    output_format: OutputFormat,
) -> Vec<PlannedFile> {
    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(files.len());
    files
        .into_iter()
        .map(|input| {
            let output =
                map_input_to_output(input_dir, &input, output_dir, output_format.extension());
            let claimed_by = match owners.get(&output) {
                Some(first) => Some(first.clone()),
                None => {
                    owners.insert(output.clone(), input.clone());
                    None
                }
            };
            PlannedFile {
                input,
                output,
                claimed_by,
            }
        })
        .collect()
}

/// Convert every supported file in `input_dir` into `output_dir`.
///
/// `on_file` is called once per file after it has been attempted, which lets
/// callers drive a progress display. Inputs that share a stem (`a.json` and
/// `a.yaml`) map to one output path: the first in discovery order is written
/// and the others fail with an output collision. Without `continue_on_error`
/// a collision stops the run before any file is written.
pub fn convert_directory(
    converter: &Converter,
    input_dir: &Path,
    output_dir: &Path,
    output_format: OutputFormat,
    options: &BatchOptions,
    mut on_file: impl FnMut(&Path),
) -> ConversionResult<BatchReport> {
    let files = discover(input_dir, options.recursive)?;
    debug!(count = files.len(), dir = %input_dir.display(), "discovered input files");

    let plan = plan_outputs(input_dir, files, output_dir, output_format);
    if !options.continue_on_error {
        if let Some(collision) = plan.iter().find_map(PlannedFile::collision) {
            return Err(collision);
        }
    }

    let mut report = BatchReport::default();
    for planned in plan {
        let result = match planned.collision() {
            Some(collision) => Err(collision),
            None => convert_file(
                converter,
                &planned.input,
                &planned.output,
                output_format,
                options,
            ),
        };
        on_file(&planned.input);

        match result {
            Ok(cache_hit) => {
                if cache_hit {
                    report.cache_hits += 1;
                }
                report.converted.push((planned.input, planned.output));
            }
            Err(e) if options.continue_on_error => {
                warn!(file = %planned.input.display(), error = %e, "skipping file");
                report.failed.push((planned.input, e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// Convert one file and write the artifact; returns whether the cache was hit
fn convert_file(
    converter: &Converter,
    input_file: &Path,
    output_file: &Path,
    output_format: OutputFormat,
    options: &BatchOptions,
) -> ConversionResult<bool> {
    let source = InputSource::from_path(input_file)?;
    let mut request = ConversionRequest::new(source, output_format);
    request.input_format = options.input_format;

    let conversion = converter.convert(&request)?;

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    fs::write(output_file, conversion.bytes()).map_err(|e| io_error(output_file, e))?;

    Ok(conversion.cache_hit)
}

fn io_error(path: &Path, e: std::io::Error) -> ConversionError {
    ConversionError::conversion(ConversionErrorKind::io(
        format!("{}: {}", path.display(), e),
        Some(path.to_path_buf()),
    ))
}
