use formfill_core::options::{
    DEFAULT_MIN_SCORE, DEFAULT_MIN_UNDERSCORE_RUN, DEFAULT_PLACEHOLDER, DEFAULT_SUBSTRING_BOOST,
};
use formfill_core::FillOptions;

use crate::prelude::*;

/// Longest underscore run accepted as a blank.
pub const MAX_UNDERSCORE_RUN: usize = 256;

/// Resolution and fill tuning shared by `fill` and `resolve`.
#[derive(Debug, Clone, clap::Args)]
pub struct EngineArgs {
    /// Minimum similarity (0..1) for a label to count as found
    #[arg(long, env = "FORMFILL_MIN_SCORE", default_value_t = DEFAULT_MIN_SCORE)]
    pub min_score: f64,

    /// Score given to a region that contains the whole label
    #[arg(long, env = "FORMFILL_SUBSTRING_BOOST", default_value_t = DEFAULT_SUBSTRING_BOOST)]
    pub substring_boost: f64,

    /// Text written in place of empty values
    #[arg(long, env = "FORMFILL_PLACEHOLDER", default_value = DEFAULT_PLACEHOLDER)]
    pub placeholder: String,

    /// Shortest run of underscores treated as a blank
    #[arg(long, env = "FORMFILL_MIN_UNDERSCORE_RUN", default_value_t = DEFAULT_MIN_UNDERSCORE_RUN)]
    pub min_underscore_run: usize,
}

impl Default for EngineArgs {
    fn default() -> Self {
        EngineArgs {
            min_score: DEFAULT_MIN_SCORE,
            substring_boost: DEFAULT_SUBSTRING_BOOST,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            min_underscore_run: DEFAULT_MIN_UNDERSCORE_RUN,
        }
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidOption {
            name,
            reason: f!("{value} is outside 0..1"),
        }
        .into())
    }
}

impl EngineArgs {
    pub fn options(&self) -> Result<FillOptions> {
        if !(1..=MAX_UNDERSCORE_RUN).contains(&self.min_underscore_run) {
            return Err(Error::InvalidOption {
                name: "min-underscore-run",
                reason: f!("{} is outside 1..={MAX_UNDERSCORE_RUN}", self.min_underscore_run),
            }
            .into());
        }

        Ok(FillOptions {
            min_score: unit_interval("min-score", self.min_score)?,
            substring_boost: unit_interval("substring-boost", self.substring_boost)?,
            placeholder: self.placeholder.clone(),
            min_underscore_run: self.min_underscore_run,
        })
    }
}
