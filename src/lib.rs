pub mod error;
pub mod models;
pub mod services;

pub use error::{CaptchaError, Result};
pub use models::config::{SegmentationConfig, SolverConfig};
pub use models::solution::{Solution, Symbol, NOT_SOLVED};
pub use services::config::ConfigManager;
pub use services::failure_log::FailureLog;
pub use services::image_source::ImageSource;
pub use services::ocr::{GlyphMatcher, Signature, TrainingCorpus};
pub use services::solver::CaptchaSolver;

/// Solve one captcha against a loaded corpus.
///
/// Returns the six captcha characters, the characters with `-` for
/// unrecognised glyphs when `devmode` is set, or `Not solved`.
pub fn solve(
    source: &ImageSource,
    corpus: &TrainingCorpus,
    devmode: bool,
    keep_logs: bool,
    logs_path: Option<&std::path::Path>,
) -> Result<String> {
    let mut config = SolverConfig {
        devmode,
        keep_logs,
        ..SolverConfig::default()
    };
    if let Some(path) = logs_path {
        config.logs_path = path.to_path_buf();
    }

    CaptchaSolver::new(corpus, config).solve_text(source)
}
