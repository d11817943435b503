use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Deserialize;

use crate::strategy::Strategy;

// ---------------------------------------------------------------------------
// ConfoundSpec – a strategy name or a literal column request
// ---------------------------------------------------------------------------

/// One entry of the user's strategy list.
///
/// The five catalog names resolve to [`Strategy`]; anything else is a
/// request for a single column by its literal name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ConfoundSpec {
    Strategy(Strategy),
    Column(String),
}

impl From<String> for ConfoundSpec {
    fn from(s: String) -> Self {
        match Strategy::from_str(&s) {
            Ok(strategy) => ConfoundSpec::Strategy(strategy),
            Err(_) => ConfoundSpec::Column(s),
        }
    }
}

impl From<&str> for ConfoundSpec {
    fn from(s: &str) -> Self {
        ConfoundSpec::from(s.to_string())
    }
}

impl From<Strategy> for ConfoundSpec {
    fn from(strategy: Strategy) -> Self {
        ConfoundSpec::Strategy(strategy)
    }
}

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// A column counts as motion when its name contains "rot" or "trans".
pub fn is_motion_column(name: &str) -> bool {
    name.contains("rot") || name.contains("trans")
}

/// The resolved set of columns to retain, split into disjoint motion and
/// non-motion halves. Both halves are lexicographically ordered, which
/// makes output column order deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub motion: BTreeSet<String>,
    pub non_motion: BTreeSet<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.motion.is_empty() && self.non_motion.is_empty()
    }

    pub fn len(&self) -> usize {
        self.motion.len() + self.non_motion.len()
    }
}

/// Resolve the union of all requested columns against the available ones.
///
/// Strategy entries contribute every available column matching any of their
/// patterns; literal entries contribute their name verbatim, present or not
/// (absence surfaces later, when the non-motion half is sliced out of the
/// table). Duplicate requests collapse under union semantics.
pub fn select_columns<S: AsRef<str>>(available: &[S], specs: &[ConfoundSpec]) -> Selection {
    let mut of_interest: BTreeSet<String> = BTreeSet::new();

    for spec in specs {
        match spec {
            ConfoundSpec::Strategy(strategy) => {
                of_interest.extend(
                    available
                        .iter()
                        .map(AsRef::as_ref)
                        .filter(|col| strategy.matches(col))
                        .map(str::to_string),
                );
            }
            ConfoundSpec::Column(name) => {
                of_interest.insert(name.clone());
            }
        }
    }

    let (motion, non_motion) = of_interest
        .into_iter()
        .partition(|name| is_motion_column(name));
    let selection = Selection { motion, non_motion };
    log::debug!(
        "resolved {} confounds ({} motion, {} non-motion)",
        selection.len(),
        selection.motion.len(),
        selection.non_motion.len()
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [&str; 7] = [
        "trans_x",
        "rot_y",
        "csf",
        "white_matter",
        "cosine00",
        "t_comp_cor_00",
        "framewise_displacement",
    ];

    #[test]
    fn minimal_selects_motion_matter_and_cosine() {
        let selection = select_columns(&COLUMNS, &[ConfoundSpec::from("minimal")]);
        let motion: Vec<&str> = selection.motion.iter().map(String::as_str).collect();
        let non_motion: Vec<&str> = selection.non_motion.iter().map(String::as_str).collect();
        assert_eq!(motion, ["rot_y", "trans_x"]);
        assert_eq!(non_motion, ["cosine00", "csf", "white_matter"]);
    }

    #[test]
    fn union_is_idempotent() {
        let once = select_columns(&COLUMNS, &[ConfoundSpec::from("minimal")]);
        let twice = select_columns(
            &COLUMNS,
            &[ConfoundSpec::from("minimal"), ConfoundSpec::from("minimal")],
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn literal_requests_pass_through_even_when_absent() {
        let selection = select_columns(&COLUMNS, &[ConfoundSpec::from("global_signal")]);
        assert!(selection.non_motion.contains("global_signal"));
        assert!(selection.motion.is_empty());
    }

    #[test]
    fn unknown_names_are_literals_not_strategies() {
        assert_eq!(
            ConfoundSpec::from("compcor"),
            ConfoundSpec::Strategy(Strategy::Compcor)
        );
        assert_eq!(
            ConfoundSpec::from("compcors"),
            ConfoundSpec::Column("compcors".to_string())
        );
    }

    #[test]
    fn partition_is_disjoint_and_substring_permissive() {
        let columns = ["rotation_outlier", "strange_transit", "csf"];
        let selection = select_columns(&columns, &[ConfoundSpec::from("motion")]);
        // Both odd names contain "rot"/"trans" and land on the motion side.
        assert!(selection.motion.contains("rotation_outlier"));
        assert!(selection.motion.contains("strange_transit"));
        assert!(selection.motion.is_disjoint(&selection.non_motion));
    }
}
