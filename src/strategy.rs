use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfoundsError;

// ---------------------------------------------------------------------------
// Strategy catalog
// ---------------------------------------------------------------------------

/// The six rigid-body head-motion axes estimated by fMRIPrep.
pub const MOTION_AXES: [&str; 6] = ["trans_x", "trans_y", "trans_z", "rot_x", "rot_y", "rot_z"];

/// A named bundle of substring patterns selecting raw confound columns.
///
/// The set is closed; any other requested name is treated as a literal
/// column request by [`crate::select::ConfoundSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Motion + high-pass filter + matter, the usual starting point.
    Minimal,
    Motion,
    /// CSF and white-matter signals.
    Matter,
    HighPassFilter,
    Compcor,
}

impl Strategy {
    /// The fixed pattern table. A column matches when any pattern is a
    /// substring of its name: case-sensitive, unanchored, so `"rot"` also
    /// matches a column like `rotation_outlier`.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            Strategy::Motion => &["trans", "rot"],
            Strategy::Matter => &["csf", "white_matter"],
            Strategy::HighPassFilter => &["cosine"],
            Strategy::Compcor => &["comp_cor"],
            // motion ∪ high_pass_filter ∪ matter
            Strategy::Minimal => &["trans", "rot", "cosine", "csf", "white_matter"],
        }
    }

    /// Whether a raw column name matches this strategy.
    pub fn matches(self, column: &str) -> bool {
        self.patterns().iter().any(|p| column.contains(p))
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Minimal => "minimal",
            Strategy::Motion => "motion",
            Strategy::Matter => "matter",
            Strategy::HighPassFilter => "high_pass_filter",
            Strategy::Compcor => "compcor",
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfoundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Strategy::Minimal),
            "motion" => Ok(Strategy::Motion),
            "matter" => Ok(Strategy::Matter),
            "high_pass_filter" => Ok(Strategy::HighPassFilter),
            "compcor" => Ok(Strategy::Compcor),
            other => Err(ConfoundsError::InvalidInput(format!(
                "unknown strategy '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Motion model expander
// ---------------------------------------------------------------------------

/// Which transformations of the six motion axes are included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum MotionModel {
    /// The six raw parameters.
    #[serde(rename = "6params")]
    #[default]
    SixParams,
    /// Raw parameters plus temporal derivatives (12).
    #[serde(rename = "derivatives")]
    Derivatives,
    /// Raw parameters plus quadratic terms (12).
    #[serde(rename = "square")]
    Square,
    /// All 24 variants. See [`MotionModel::expand`] for the exact behavior.
    #[serde(rename = "full")]
    Full,
}

impl MotionModel {
    /// Column-name suffix appended to an axis by this model's template.
    fn suffix(self) -> &'static str {
        match self {
            MotionModel::SixParams => "",
            MotionModel::Derivatives => "_derivative1",
            MotionModel::Square => "_power2",
            MotionModel::Full => "_derivative1_power2",
        }
    }

    /// Expand into the set of motion column names this model covers.
    ///
    /// For `SixParams`, `Derivatives` and `Square` the result is the six
    /// base axes plus the model's own variant of each (the base template is
    /// the identity, so `SixParams` collapses to just the six axes). `Full`
    /// is special-cased to the union of every template over every axis, all
    /// 24 names, not merely base + squared derivatives. Columns named here
    /// but absent from a given table are tolerated downstream; expansion
    /// itself never consults the data.
    pub fn expand(self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        match self {
            MotionModel::Full => {
                for axis in MOTION_AXES {
                    for model in [
                        MotionModel::SixParams,
                        MotionModel::Derivatives,
                        MotionModel::Square,
                        MotionModel::Full,
                    ] {
                        names.insert(format!("{axis}{}", model.suffix()));
                    }
                }
            }
            model => {
                for axis in MOTION_AXES {
                    names.insert(axis.to_string());
                    names.insert(format!("{axis}{}", model.suffix()));
                }
            }
        }
        names
    }

    pub fn name(self) -> &'static str {
        match self {
            MotionModel::SixParams => "6params",
            MotionModel::Derivatives => "derivatives",
            MotionModel::Square => "square",
            MotionModel::Full => "full",
        }
    }
}

impl FromStr for MotionModel {
    type Err = ConfoundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6params" => Ok(MotionModel::SixParams),
            "derivatives" => Ok(MotionModel::Derivatives),
            "square" => Ok(MotionModel::Square),
            "full" => Ok(MotionModel::Full),
            other => Err(ConfoundsError::InvalidInput(format!(
                "unknown motion model '{other}'"
            ))),
        }
    }
}

impl fmt::Display for MotionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
