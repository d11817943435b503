/// Data layer: the confounds table and its loader.
///
/// Architecture:
/// ```text
///  fMRIPrep .tsv (or .nii.gz image path)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  normalize path, parse TSV → ConfoundTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ ConfoundTable  │  named equal-length f64 columns
///   └───────────────┘
/// ```
pub mod loader;
pub mod model;
