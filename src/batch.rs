//! Batch conversion of RAW files and folders
//!
//! Scans folders for files with a known RAW extension and converts each one,
//! carrying on past individual failures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::image_pipeline::{
    ConversionConfig, ConversionError, DngWriter, RawImageReader, RawLoaderReader, RawToDngPipeline, Result,
    StandardDngWriter,
};
use crate::logger::{debug, error, info, warn};

/// File extensions recognized as camera RAW files, lowercase.
pub const RAW_EXTENSIONS: &[&str] = &[
    "3fr", "ari", "arw", "bay", "cap", "cr2", "crw", "data", "dcr", "dcs", "dng", "drf", "eip",
    "erf", "fff", "gpr", "iiq", "k25", "kdc", "mdc", "mef", "mos", "mrw", "nef", "nrw", "obm",
    "orf", "pef", "ptx", "pxn", "r3d", "raf", "raw", "rw2", "rwl", "rwz", "sr2", "srf", "srw",
    "x3f",
];

pub fn is_raw_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| RAW_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Every RAW file under `dir`, recursively, skipping hidden entries, sorted by file name.
pub fn find_raw_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_raw_files(dir, &mut files)?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    info!("Discovered {} RAW files in {}", files.len(), dir.display());
    debug!("Files found: {:?}", files);
    Ok(files)
}

fn collect_raw_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ConversionError::InputReadError(format!("{}: {}", dir.display(), e)))?;

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_raw_files(&path, files)?;
        } else if file_type.is_file() && is_raw_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// `<stem>.dng` inside `output_dir`, or next to the input when no directory is given.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".dng");
    let dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.parent().map(Path::to_path_buf).unwrap_or_default());
    dir.join(name)
}

// Paths compare case-insensitively.
fn collision_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Output path for every input, in order. An output that would land on any input
/// or on an output already claimed earlier in the list is refused.
pub fn plan_outputs(files: &[PathBuf], output_dir: Option<&Path>) -> Vec<Result<PathBuf>> {
    let inputs: HashSet<String> = files.iter().map(|input| collision_key(input)).collect();
    let mut claimed: HashSet<String> = HashSet::new();

    files
        .iter()
        .map(|input| {
            let output = output_path_for(input, output_dir);
            let key = collision_key(&output);
            if inputs.contains(&key) {
                Err(ConversionError::OutputWriteError(format!(
                    "{}: output would overwrite an input file",
                    output.display()
                )))
            } else if !claimed.insert(key) {
                Err(ConversionError::OutputWriteError(format!(
                    "{}: output already produced by another input",
                    output.display()
                )))
            } else {
                Ok(output)
            }
        })
        .collect()
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: Vec<(PathBuf, ConversionError)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.converted + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct BatchConverter<R: RawImageReader, W: DngWriter> {
    pipeline: RawToDngPipeline<R, W>,
    output_dir: Option<PathBuf>,
    show_progress: bool,
}

impl BatchConverter<RawLoaderReader, StandardDngWriter> {
    pub fn new(config: ConversionConfig, output_dir: Option<PathBuf>) -> Self {
        Self::with_pipeline(RawToDngPipeline::new(config), output_dir)
    }
}

impl<R: RawImageReader, W: DngWriter> BatchConverter<R, W> {
    pub fn with_pipeline(pipeline: RawToDngPipeline<R, W>, output_dir: Option<PathBuf>) -> Self {
        Self {
            pipeline,
            output_dir,
            show_progress: false,
        }
    }

    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress || total == 0 {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Converts every file in order. Individual failures are collected, not returned.
    /// Inputs whose output would clobber another file of the run are not converted.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchSummary> {
        if files.is_empty() {
            return Err(ConversionError::NoRawFiles("the selected inputs".to_string()));
        }

        let pb = self.progress_bar(files.len());
        let mut summary = BatchSummary::default();

        let outputs = plan_outputs(files, self.output_dir.as_deref());

        for (input, output) in files.iter().zip(outputs) {
            let name = input.file_name().unwrap_or_default().to_string_lossy().into_owned();
            if let Some(pb) = &pb {
                pb.set_message(name);
            }

            let result = match output {
                Ok(output) => self.pipeline.convert_file(input, &output),
                Err(e) => {
                    warn!("Skipping {}: {}", input.display(), e);
                    Err(e)
                }
            };

            match result {
                Ok(()) => summary.converted += 1,
                Err(e) => {
                    error!("Failed to convert {}: {}", input.display(), e);
                    summary.failed.push((input.clone(), e));
                }
            }

            if let Some(pb) = &pb {
                pb.inc(1);
            }
            info!("Converted: {}, Failed: {}", summary.converted, summary.failed.len());
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }
        Ok(summary)
    }
}
