//! Strategy-based selection and PCA reduction of fMRIPrep confound
//! regressors.
//!
//! fMRIPrep writes one wide tab-separated table of nuisance time series per
//! functional run. This crate picks the subset worth regressing out, by
//! strategy name and/or literal column name, and optionally compresses the
//! redundant head-motion columns into a few principal components.
//!
//! Pipeline:
//! ```text
//!  .tsv path(s) or ConfoundTable
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  normalize path, parse TSV
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  select   │  strategies → motion / non-motion column sets
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  reduce   │  motion columns → raw or motion_pca_* components
//!   └──────────┘
//!        │
//!        ▼
//!   non-motion columns ++ motion block
//! ```
//!
//! ```no_run
//! use confounds::{load_confounds, LoadOptions};
//!
//! let options = LoadOptions::default();
//! let out = load_confounds("sub-01_desc-confounds_regressors.tsv", &options)?;
//! # Ok::<(), confounds::ConfoundsError>(())
//! ```

pub mod data;
pub mod error;
pub mod load;
pub mod options;
pub mod reduce;
pub mod select;
pub mod strategy;

pub use data::loader::{load_table, normalize_confounds_path};
pub use data::model::ConfoundTable;
pub use error::{ConfoundsError, Result};
pub use load::{load_confounds, try_load_each, ConfoundsOutput, ConfoundsSource};
pub use options::LoadOptions;
pub use reduce::{reduce_motion, MotionBlock, Reduction};
pub use select::{is_motion_column, select_columns, ConfoundSpec, Selection};
pub use strategy::{MotionModel, Strategy, MOTION_AXES};
