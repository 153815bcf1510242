use serde::{Deserialize, Serialize};

/// Minimum score a candidate needs before it is acted upon.
pub const DEFAULT_MIN_SCORE: f64 = 0.62;

/// Score floor for candidates that contain the whole anchor.
pub const DEFAULT_SUBSTRING_BOOST: f64 = 0.95;

/// Written instead of an empty value (em dash).
pub const DEFAULT_PLACEHOLDER: &str = "\u{2014}";

/// Shortest run of underscores treated as a drawn blank.
pub const DEFAULT_MIN_UNDERSCORE_RUN: usize = 3;

/// Tuning knobs for resolution and filling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOptions {
    pub min_score: f64,
    pub substring_boost: f64,
    pub placeholder: String,
    pub min_underscore_run: usize,
}

impl Default for FillOptions {
    fn default() -> Self {
        FillOptions {
            min_score: DEFAULT_MIN_SCORE,
            substring_boost: DEFAULT_SUBSTRING_BOOST,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            min_underscore_run: DEFAULT_MIN_UNDERSCORE_RUN,
        }
    }
}

impl FillOptions {
    /// The text actually written for `value`: the value itself, or the
    /// placeholder when it is empty.
    pub fn fill_text<'a>(&'a self, value: &'a str) -> &'a str {
        if value.is_empty() {
            &self.placeholder
        } else {
            value
        }
    }
}
