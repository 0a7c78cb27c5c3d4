use crate::error::{CaptchaError, Result};
use crate::models::config::SolverConfig;
use crate::models::solution::{Solution, Symbol};
use crate::services::failure_log::FailureLog;
use crate::services::image_source::ImageSource;
use crate::services::ocr::preprocessing::monochrome;
use crate::services::ocr::{GlyphMatcher, LetterSegmenter, Signature, TrainingCorpus};
use image::DynamicImage;
use std::ops::ControlFlow;
use std::time::Duration;

/// Captcha solver: monochrome → segment → encode → match
pub struct CaptchaSolver<M = TrainingCorpus> {
    matcher: M,
    segmenter: LetterSegmenter,
    config: SolverConfig,
    failure_log: Option<FailureLog>,
}

impl CaptchaSolver<TrainingCorpus> {
    /// Load the training corpus named by the config (or the first standard
    /// location) and build a solver around it
    pub fn from_config(config: SolverConfig) -> Result<Self> {
        let dir = match &config.training_data_dir {
            Some(dir) => dir.clone(),
            None => TrainingCorpus::locate()
                .ok_or_else(|| CaptchaError::corpus("Training data directory not found in any expected location"))?,
        };

        let corpus = TrainingCorpus::load_from_dir(dir)?;
        Ok(Self::new(corpus, config))
    }
}

impl<M: GlyphMatcher> CaptchaSolver<M> {
    pub fn new(matcher: M, config: SolverConfig) -> Self {
        let failure_log = config
            .keep_logs
            .then(|| FailureLog::new(config.logs_path.clone()));

        Self {
            matcher,
            segmenter: LetterSegmenter::new(config.segmentation.clone()),
            config,
            failure_log,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Signatures of the six glyphs in reading order
    pub fn extract_signatures(&self, image: &DynamicImage) -> Vec<Signature> {
        let bitmap = monochrome(image);
        self.segmenter
            .segment(&bitmap)
            .iter()
            .map(Signature::encode)
            .collect()
    }

    /// Solve a decoded captcha. No failure record is written.
    pub fn solve_image(&self, image: &DynamicImage) -> Solution {
        // Step 1: Threshold to two-level monochrome
        let bitmap = monochrome(image);

        // Step 2: Split into six trimmed glyphs
        let glyphs = self.segmenter.segment(&bitmap);

        // Step 3: Encode lazily so an early abort skips the remaining glyphs
        resolve_all(
            &self.matcher,
            glyphs.iter().map(Signature::encode),
            self.config.devmode,
        )
    }

    /// Load, solve, and record the captcha in the failure log when the
    /// result is the `Not solved` sentinel and logging is enabled.
    /// Devmode results with dash markers are not recorded.
    pub fn solve(&self, source: &ImageSource) -> Result<Solution> {
        let image = source.load(Duration::from_secs(self.config.fetch_timeout_secs))?;
        let solution = self.solve_image(&image);

        if solution.aborted {
            tracing::info!(source = %source.identifier(), "captcha not solved");
            if let Some(log) = &self.failure_log {
                log.record(&source.identifier());
            }
        } else {
            tracing::info!(solution = %solution, solved = solution.is_solved(), "captcha solved");
        }

        Ok(solution)
    }

    /// Convenience wrapper returning the captcha text or the `Not solved` sentinel
    pub fn solve_text(&self, source: &ImageSource) -> Result<String> {
        Ok(self.solve(source)?.text())
    }
}

/// Match signatures in order.
///
/// Outside devmode the first unresolved glyph stops the scan and later
/// signatures are never looked up. In devmode every position is matched and
/// unresolved ones are kept as `Symbol::Unresolved`.
pub fn resolve_all<M, I>(matcher: &M, signatures: I, devmode: bool) -> Solution
where
    M: GlyphMatcher + ?Sized,
    I: IntoIterator<Item = Signature>,
{
    let folded = signatures
        .into_iter()
        .enumerate()
        .try_fold(Vec::new(), |mut symbols, (position, signature)| {
            let symbol = Symbol::from(matcher.resolve(&signature));
            tracing::debug!(position = position + 1, ?symbol, "glyph matched");
            symbols.push(symbol);

            if !devmode && !symbol.is_resolved() {
                ControlFlow::Break(symbols)
            } else {
                ControlFlow::Continue(symbols)
            }
        });

    match folded {
        ControlFlow::Continue(symbols) => Solution::complete(symbols),
        ControlFlow::Break(symbols) => Solution::aborted(symbols),
    }
}
