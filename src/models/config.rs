use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Letter segmentation limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Widest column run accepted as a single glyph
    pub max_letter_width: u32,
    /// Narrowest acceptable first glyph in a six-box segmentation
    pub min_letter_width: u32,
    pub placeholder_width: u32,
    pub placeholder_height: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_letter_width: 33,
            min_letter_width: 14,
            placeholder_width: 200,
            placeholder_height: 70,
        }
    }
}

/// Solver configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Keep matching past unresolved glyphs and mark them with dashes
    pub devmode: bool,
    /// Record unsolved captchas in `logs_path`
    pub keep_logs: bool,
    pub logs_path: PathBuf,
    /// Training corpus directory; `None` uses the bundled location
    pub training_data_dir: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    pub segmentation: SegmentationConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            devmode: false,
            keep_logs: false,
            logs_path: PathBuf::from("not-solved-captcha.log"),
            training_data_dir: None,
            fetch_timeout_secs: 120,
            segmentation: SegmentationConfig::default(),
        }
    }
}
