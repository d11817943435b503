use std::path::{Path, PathBuf};

use crate::data::loader::{load_table, normalize_confounds_path};
use crate::data::model::ConfoundTable;
use crate::error::Result;
use crate::options::LoadOptions;
use crate::reduce::reduce_motion;
use crate::select::select_columns;
use crate::strategy::MOTION_AXES;

// ---------------------------------------------------------------------------
// Sources and outputs
// ---------------------------------------------------------------------------

/// Where the raw confounds come from: an in-memory table, one file
/// reference, or a batch of file references.
#[derive(Debug, Clone)]
pub enum ConfoundsSource {
    Table(ConfoundTable),
    Path(PathBuf),
    Paths(Vec<PathBuf>),
}

impl From<ConfoundTable> for ConfoundsSource {
    fn from(table: ConfoundTable) -> Self {
        ConfoundsSource::Table(table)
    }
}

impl From<PathBuf> for ConfoundsSource {
    fn from(path: PathBuf) -> Self {
        ConfoundsSource::Path(path)
    }
}

impl From<&Path> for ConfoundsSource {
    fn from(path: &Path) -> Self {
        ConfoundsSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfoundsSource {
    fn from(path: &str) -> Self {
        ConfoundsSource::Path(PathBuf::from(path))
    }
}

impl From<Vec<PathBuf>> for ConfoundsSource {
    fn from(paths: Vec<PathBuf>) -> Self {
        ConfoundsSource::Paths(paths)
    }
}

/// One table for single sources, a same-order sequence for batches.
#[derive(Debug, Clone)]
pub enum ConfoundsOutput {
    Single(ConfoundTable),
    Batch(Vec<ConfoundTable>),
}

impl ConfoundsOutput {
    pub fn single(self) -> Option<ConfoundTable> {
        match self {
            ConfoundsOutput::Single(table) => Some(table),
            ConfoundsOutput::Batch(_) => None,
        }
    }

    pub fn batch(self) -> Option<Vec<ConfoundTable>> {
        match self {
            ConfoundsOutput::Single(_) => None,
            ConfoundsOutput::Batch(tables) => Some(tables),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Select and reduce confounds from `source` according to `options`.
///
/// Single sources produce [`ConfoundsOutput::Single`]; a path batch is
/// processed element by element in input order and fails fast on the first
/// error. For per-element error collection, see [`try_load_each`].
pub fn load_confounds<S>(source: S, options: &LoadOptions) -> Result<ConfoundsOutput>
where
    S: Into<ConfoundsSource>,
{
    options.validate()?;
    match source.into() {
        ConfoundsSource::Table(table) => process_table(&table, options).map(ConfoundsOutput::Single),
        ConfoundsSource::Path(path) => load_one(&path, options).map(ConfoundsOutput::Single),
        ConfoundsSource::Paths(paths) => paths
            .iter()
            .map(|path| load_one(path, options))
            .collect::<Result<Vec<_>>>()
            .map(ConfoundsOutput::Batch),
    }
}

/// The hardened batch variant: one `Result` per input path, input order
/// preserved, so a single corrupt file no longer sinks a whole cohort.
pub fn try_load_each(paths: &[PathBuf], options: &LoadOptions) -> Vec<Result<ConfoundTable>> {
    paths
        .iter()
        .map(|path| options.validate().and_then(|()| load_one(path, options)))
        .collect()
}

fn load_one(path: &Path, options: &LoadOptions) -> Result<ConfoundTable> {
    let path = normalize_confounds_path(path);
    let raw = load_table(&path)?;
    process_table(&raw, options)
}

/// The single-table pipeline: select, slice the non-motion half, reduce the
/// motion half, align rows, concatenate.
fn process_table(raw: &ConfoundTable, options: &LoadOptions) -> Result<ConfoundTable> {
    let selection = select_columns(raw.names(), &options.strategies);
    let non_motion = raw.select(selection.non_motion.iter().map(String::as_str))?;

    // Motion is reduced only when the selection reaches the six base
    // parameters themselves; derived variants alone do not trigger it.
    let wants_motion = MOTION_AXES.iter().any(|axis| selection.motion.contains(*axis));
    if !wants_motion {
        log::debug!("no base motion parameters selected, skipping reduction");
        return Ok(non_motion);
    }

    let motion = reduce_motion(raw, options.motion_model, &options.reduction)?;
    let non_motion = match &motion.kept_rows {
        Some(rows) if rows.len() != raw.n_rows() => non_motion.take_rows(rows),
        _ => non_motion,
    };
    non_motion.hstack(motion.table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::Reduction;
    use crate::select::ConfoundSpec;

    fn raw() -> ConfoundTable {
        let t: Vec<f64> = (0..8).map(|i| i as f64 * 0.5).collect();
        ConfoundTable::from_columns([
            ("trans_x", t.clone()),
            ("rot_y", t.iter().map(|v| v * 3.0).collect()),
            ("csf", vec![1.0; 8]),
            ("cosine00", t.iter().map(|v| v.cos()).collect()),
            ("t_comp_cor_00", t.iter().map(|v| v + 1.0).collect()),
        ])
        .unwrap()
    }

    fn options(specs: &[&str], reduction: Reduction) -> LoadOptions {
        LoadOptions {
            strategies: specs.iter().copied().map(ConfoundSpec::from).collect(),
            reduction,
            ..LoadOptions::default()
        }
    }

    #[test]
    fn minimal_without_reduction_orders_non_motion_first() {
        let out = load_confounds(raw(), &options(&["minimal"], Reduction::None))
            .unwrap()
            .single()
            .unwrap();
        assert_eq!(out.names(), ["cosine00", "csf", "rot_y", "trans_x"]);
    }

    #[test]
    fn derived_motion_alone_skips_reduction() {
        // "trans" matches the derivative column, but no base axis exists,
        // so the motion block is dropped entirely.
        let table = ConfoundTable::from_columns([
            ("trans_x_derivative1", vec![1.0, 2.0, 3.0]),
            ("csf", vec![0.1, 0.2, 0.3]),
        ])
        .unwrap();
        let out = load_confounds(table, &options(&["minimal"], Reduction::Components(1)))
            .unwrap()
            .single()
            .unwrap();
        assert_eq!(out.names(), ["csf"]);
    }

    #[test]
    fn missing_literal_column_fails() {
        let err =
            load_confounds(raw(), &options(&["global_signal"], Reduction::None)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ConfoundsError::MissingColumn { .. }
        ));
    }

    #[test]
    fn empty_strategy_list_is_invalid() {
        let err = load_confounds(raw(), &options(&[], Reduction::None)).unwrap_err();
        assert!(matches!(err, crate::error::ConfoundsError::InvalidInput(_)));
    }

    #[test]
    fn row_drops_propagate_to_non_motion_columns() {
        let mut t: Vec<f64> = (0..8).map(|i| i as f64).collect();
        t[0] = f64::NAN;
        let table = ConfoundTable::from_columns([
            ("trans_x", t),
            ("rot_y", (0..8).map(|i| ((i * 7) % 5) as f64).collect()),
            ("csf", (0..8).map(|i| i as f64 + 100.0).collect()),
        ])
        .unwrap();
        let out = load_confounds(table, &options(&["minimal"], Reduction::Components(1)))
            .unwrap()
            .single()
            .unwrap();
        assert_eq!(out.names(), ["csf", "motion_pca_1"]);
        assert_eq!(out.n_rows(), 7);
        // Row 0 was incomplete, so the csf column starts at the second value.
        assert_eq!(out.column("csf").unwrap()[0], 101.0);
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        let out = load_confounds(Vec::<PathBuf>::new(), &LoadOptions::default())
            .unwrap()
            .batch()
            .unwrap();
        assert!(out.is_empty());
    }
}
