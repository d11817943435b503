use std::path::{Path, PathBuf};

use crate::data::model::ConfoundTable;
use crate::error::{ConfoundsError, Result};

// ---------------------------------------------------------------------------
// Path normalization
// ---------------------------------------------------------------------------

/// Suffix of a preprocessed BOLD image as emitted by fMRIPrep.
pub const PREPROC_IMAGE_SUFFIX: &str = "_space-MNI152NLin2009cAsym_desc-preproc_bold.nii.gz";

/// Suffix of the confounds file that sits next to the image.
pub const CONFOUNDS_FILE_SUFFIX: &str = "_desc-confounds_regressors.tsv";

/// Rewrite a preprocessed-image path to its sibling confounds file.
///
/// Only an exact match of [`PREPROC_IMAGE_SUFFIX`] is rewritten; every other
/// path is returned unchanged. This lets callers pass either the functional
/// image they are about to denoise or the confounds file itself.
pub fn normalize_confounds_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match raw.strip_suffix(PREPROC_IMAGE_SUFFIX) {
        Some(stem) => {
            let rewritten = format!("{stem}{CONFOUNDS_FILE_SUFFIX}");
            log::debug!("normalized image path to confounds file: {rewritten}");
            PathBuf::from(rewritten)
        }
        None => path.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// TSV loader
// ---------------------------------------------------------------------------

/// Load a confounds table from a tab-separated UTF-8 file with a header row.
///
/// Cells parse as `f64`; the fMRIPrep missing-value spellings (`n/a`, `NA`,
/// `NaN`, `nan`) and empty cells become `NaN`. Ragged rows and non-numeric
/// cells fail with [`ConfoundsError::Parse`].
pub fn load_table(path: &Path) -> Result<ConfoundTable> {
    let file = std::fs::File::open(path).map_err(|source| ConfoundsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, 0, "<header>", e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        // Ragged rows surface here as the csv crate's UnequalLengths error.
        let record = result.map_err(|e| csv_error(path, row, "<record>", e))?;
        for (idx, cell) in record.iter().enumerate() {
            let value = parse_cell(cell).ok_or_else(|| ConfoundsError::Parse {
                path: path.to_path_buf(),
                row,
                column: headers[idx].clone(),
                message: format!("'{cell}' is not a number"),
            })?;
            columns[idx].push(value);
        }
    }

    let table = ConfoundTable::from_columns(headers.into_iter().zip(columns))?;
    log::info!(
        "loaded {} ({} columns, {} rows)",
        path.display(),
        table.n_cols(),
        table.n_rows()
    );
    Ok(table)
}

fn csv_error(path: &Path, row: usize, column: &str, e: csv::Error) -> ConfoundsError {
    ConfoundsError::Parse {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        message: e.to_string(),
    }
}

/// Parse one cell. fMRIPrep writes `n/a` for missing values; pandas also
/// accepts a handful of other spellings, matched here.
fn parse_cell(s: &str) -> Option<f64> {
    let s = s.trim();
    match s {
        "" | "n/a" | "N/A" | "NA" | "NaN" | "nan" => Some(f64::NAN),
        _ => s.parse::<f64>().ok(),
    }
}
