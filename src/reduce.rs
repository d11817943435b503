use nalgebra::{DMatrix, SymmetricEigen};
use serde::Deserialize;

use crate::data::model::ConfoundTable;
use crate::error::{ConfoundsError, Result};
use crate::strategy::MotionModel;

// ---------------------------------------------------------------------------
// Reduction target
// ---------------------------------------------------------------------------

/// How far to compress the motion columns.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "f64")]
pub enum Reduction {
    /// Pass the raw motion columns through untouched.
    None,
    /// Keep the smallest component count whose cumulative explained
    /// variance reaches this ratio (exclusive bounds: 0 < r < 1).
    VarianceRatio(f64),
    /// Keep exactly this many components (at least 1).
    Components(usize),
}

impl Reduction {
    /// Interpret the numeric `n_components` convention: 0 means no
    /// reduction, a fraction is a variance target, an integral value of at
    /// least 1 is a fixed component count.
    pub fn from_n_components(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfoundsError::InvalidInput(format!(
                "n_components must be a non-negative number, got {value}"
            )));
        }
        if value == 0.0 {
            Ok(Reduction::None)
        } else if value < 1.0 {
            Ok(Reduction::VarianceRatio(value))
        } else if value.fract() == 0.0 {
            Ok(Reduction::Components(value as usize))
        } else {
            Err(ConfoundsError::InvalidInput(format!(
                "n_components above 1 must be an integer, got {value}"
            )))
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Reduction::None => Ok(()),
            Reduction::VarianceRatio(r) if r > 0.0 && r < 1.0 => Ok(()),
            Reduction::VarianceRatio(r) => Err(ConfoundsError::InvalidInput(format!(
                "variance ratio must lie in (0, 1), got {r}"
            ))),
            Reduction::Components(k) if k >= 1 => Ok(()),
            Reduction::Components(_) => Err(ConfoundsError::InvalidInput(
                "component count must be at least 1".to_string(),
            )),
        }
    }
}

impl TryFrom<f64> for Reduction {
    type Error = ConfoundsError;

    fn try_from(value: f64) -> Result<Self> {
        Reduction::from_n_components(value)
    }
}

// ---------------------------------------------------------------------------
// Motion reduction
// ---------------------------------------------------------------------------

/// The motion half of the output table.
///
/// `kept_rows` makes the complete-case side effect of PCA explicit: when
/// reduction ran, it holds the raw-table row indices that survived NaN
/// filtering (all of them if nothing was dropped), and the caller must
/// subset the rest of the output to the same rows. It is `None` for the
/// pass-through path, which never drops rows.
#[derive(Debug, Clone)]
pub struct MotionBlock {
    pub table: ConfoundTable,
    pub kept_rows: Option<Vec<usize>>,
}

/// Source the motion columns named by `model` from `raw` and reduce them.
///
/// Expansion tolerates absent variants: only columns actually present in
/// the table are sourced. With [`Reduction::None`] the sourced columns pass
/// through byte-for-byte under their original names; otherwise rows with
/// any missing value are dropped and the survivors are projected onto the
/// leading principal components, renamed `motion_pca_1, motion_pca_2, ...`
/// in descending explained-variance order.
pub fn reduce_motion(
    raw: &ConfoundTable,
    model: MotionModel,
    reduction: &Reduction,
) -> Result<MotionBlock> {
    reduction.validate()?;

    let available = raw.name_set();
    let source: Vec<String> = model
        .expand()
        .into_iter()
        .filter(|name| available.contains(name.as_str()))
        .collect();

    if matches!(reduction, Reduction::None) {
        let table = raw.select(source.iter().map(String::as_str))?;
        return Ok(MotionBlock {
            table,
            kept_rows: None,
        });
    }

    if source.is_empty() {
        return Err(ConfoundsError::InsufficientData(format!(
            "motion model '{model}' matches no columns in the table"
        )));
    }

    let columns: Vec<&[f64]> = source
        .iter()
        .map(|name| raw.column(name).expect("sourced from available columns"))
        .collect();

    // Complete-case filtering: drop any row with a missing motion value.
    let kept: Vec<usize> = (0..raw.n_rows())
        .filter(|&row| columns.iter().all(|col| !col[row].is_nan()))
        .collect();
    if kept.len() < raw.n_rows() {
        log::debug!(
            "dropped {} incomplete rows before motion PCA",
            raw.n_rows() - kept.len()
        );
    }

    let n = kept.len();
    let p = source.len();
    if n < 2 {
        return Err(ConfoundsError::InsufficientData(format!(
            "{n} complete rows, need at least 2"
        )));
    }

    // Center columns, then eigendecompose the covariance matrix.
    let mut centered = DMatrix::<f64>::zeros(n, p);
    for (j, col) in columns.iter().enumerate() {
        let mean = kept.iter().map(|&r| col[r]).sum::<f64>() / n as f64;
        for (i, &r) in kept.iter().enumerate() {
            centered[(i, j)] = col[r] - mean;
        }
    }
    let covariance = (centered.transpose() * &centered) / (n as f64 - 1.0);
    let eigen = SymmetricEigen::new(covariance);

    // Descending eigenvalue order; tiny negative values are numeric noise.
    let mut order: Vec<usize> = (0..p).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let variances: Vec<f64> = order
        .iter()
        .map(|&i| eigen.eigenvalues[i].max(0.0))
        .collect();
    let total: f64 = variances.iter().sum();
    if total <= 0.0 {
        return Err(ConfoundsError::InsufficientData(
            "motion columns have zero variance".to_string(),
        ));
    }

    let k = component_count(reduction, &variances, total, n, p)?;
    log::debug!(
        "motion PCA keeps {k} of {p} components ({:.1}% variance)",
        100.0 * variances[..k].iter().sum::<f64>() / total
    );

    let mut projection = DMatrix::<f64>::zeros(p, k);
    for (j, &col) in order[..k].iter().enumerate() {
        projection.set_column(j, &eigen.eigenvectors.column(col));
    }
    let scores = centered * projection;

    let mut table = ConfoundTable::new();
    for j in 0..k {
        table.push_column(
            format!("motion_pca_{}", j + 1),
            scores.column(j).iter().copied().collect(),
        )?;
    }
    Ok(MotionBlock {
        table,
        kept_rows: Some(kept),
    })
}

/// Resolve the reduction target to a concrete component count.
fn component_count(
    reduction: &Reduction,
    variances: &[f64],
    total: f64,
    n: usize,
    p: usize,
) -> Result<usize> {
    match *reduction {
        Reduction::Components(k) => {
            if k > p.min(n) {
                return Err(ConfoundsError::InsufficientData(format!(
                    "requested {k} components but only {} are available",
                    p.min(n)
                )));
            }
            Ok(k)
        }
        Reduction::VarianceRatio(target) => {
            let mut cumulative = 0.0;
            for (i, v) in variances.iter().enumerate() {
                cumulative += v / total;
                if cumulative >= target {
                    return Ok(i + 1);
                }
            }
            Err(ConfoundsError::InsufficientData(format!(
                "variance target {target} unreachable with rank {p}"
            )))
        }
        Reduction::None => unreachable!("pass-through handled before PCA"),
    }
}
