use serde::Deserialize;

use crate::error::{ConfoundsError, Result};
use crate::reduce::Reduction;
use crate::select::ConfoundSpec;
use crate::strategy::{MotionModel, Strategy};

// ---------------------------------------------------------------------------
// LoadOptions – what to select and how far to reduce
// ---------------------------------------------------------------------------

/// Options for [`crate::load_confounds`].
///
/// The defaults mirror common denoising practice: the `minimal` strategy,
/// motion compressed to 95% explained variance, the plain 6-parameter
/// motion model. Deserializes from an options document such as
///
/// ```json
/// {
///   "strategies": ["minimal", "compcor", "global_signal"],
///   "n_components": 0.95,
///   "motion_model": "derivatives"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Strategy names and/or literal column names, unioned.
    pub strategies: Vec<ConfoundSpec>,
    /// Motion reduction target, in the numeric `n_components` convention.
    #[serde(rename = "n_components")]
    pub reduction: Reduction,
    pub motion_model: MotionModel,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strategies: vec![ConfoundSpec::Strategy(Strategy::Minimal)],
            reduction: Reduction::VarianceRatio(0.95),
            motion_model: MotionModel::SixParams,
        }
    }
}

impl LoadOptions {
    /// Parse an options document from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let options: LoadOptions = serde_json::from_str(text)
            .map_err(|e| ConfoundsError::InvalidInput(format!("invalid options document: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(ConfoundsError::InvalidInput(
                "strategy list is empty".to_string(),
            ));
        }
        self.reduction.validate()
    }
}
