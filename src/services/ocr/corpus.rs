use super::engine::GlyphMatcher;
use super::signature::Signature;
use crate::error::{CaptchaError, Result};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Locations searched for the training corpus, relative to the working directory
const TRAINING_DATA_PATHS: [&str; 2] = ["training_data", "resources/training_data"];

/// Known signatures per symbol.
///
/// Symbols iterate in alphabetical order, which fixes the lookup priority
/// when a signature was recorded under more than one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingCorpus {
    symbols: BTreeMap<char, HashSet<Signature>>,
}

impl TrainingCorpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from in-memory entries
    pub fn from_symbols<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: IntoIterator<Item = Signature>,
    {
        let mut symbols: BTreeMap<char, HashSet<Signature>> = BTreeMap::new();
        for (symbol, signatures) in entries {
            symbols.entry(symbol).or_default().extend(signatures);
        }
        Self { symbols }
    }

    /// Find the first existing corpus directory among the standard locations
    pub fn locate() -> Option<PathBuf> {
        TRAINING_DATA_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_dir())
    }

    /// Load every `<symbol>.json` file of a corpus directory in one batch.
    ///
    /// Each file holds a JSON array of signature strings. Files whose stem is
    /// not a single character are skipped.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(CaptchaError::corpus(format!(
                "Training data directory not found: {:?}",
                dir
            )));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match path.file_stem().and_then(|s| s.to_str()).and_then(single_char) {
                Some(symbol) => files.push((symbol, path)),
                None => tracing::debug!(path = ?path, "skipping non-symbol file"),
            }
        }

        let loaded = files
            .into_par_iter()
            .map(|(symbol, path)| -> Result<(char, Vec<Signature>)> {
                let content = fs::read_to_string(&path)?;
                let signatures: Vec<Signature> = serde_json::from_str(&content)?;
                Ok((symbol, signatures))
            })
            .collect::<Result<Vec<_>>>()?;

        let corpus = Self::from_symbols(loaded);
        tracing::info!(
            symbols = corpus.len(),
            signatures = corpus.signature_count(),
            "training corpus loaded from {:?}",
            dir
        );

        Ok(corpus)
    }

    /// Write the corpus back as one `<symbol>.json` file per symbol
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for (symbol, signatures) in &self.symbols {
            let mut sorted: Vec<&Signature> = signatures.iter().collect();
            sorted.sort();

            let json = serde_json::to_string(&sorted)?;
            fs::write(dir.join(format!("{}.json", symbol)), json)?;
        }

        Ok(())
    }

    /// Record the glyph signatures of a labelled captcha.
    ///
    /// Returns how many signatures were new to the corpus.
    pub fn learn(&mut self, label: &str, signatures: &[Signature]) -> Result<usize> {
        let symbols: Vec<char> = label.chars().collect();
        if symbols.len() != signatures.len() {
            return Err(CaptchaError::corpus(format!(
                "Label '{}' has {} symbols but {} glyphs were extracted",
                label,
                symbols.len(),
                signatures.len()
            )));
        }

        let mut added = 0;
        for (symbol, signature) in symbols.into_iter().zip(signatures) {
            if self.symbols.entry(symbol).or_default().insert(signature.clone()) {
                added += 1;
            }
        }

        Ok(added)
    }

    /// Symbols in lookup order
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.keys().copied()
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn signature_count(&self) -> usize {
        self.symbols.values().map(HashSet::len).sum()
    }
}

impl GlyphMatcher for TrainingCorpus {
    fn resolve(&self, signature: &Signature) -> Option<char> {
        self.symbols
            .iter()
            .find(|(_, known)| known.contains(signature))
            .map(|(symbol, _)| *symbol)
    }
}

fn single_char(stem: &str) -> Option<char> {
    let mut chars = stem.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sig(text: &str) -> Signature {
        Signature::from(text)
    }

    #[test]
    fn test_resolve_known_signature() {
        let corpus = TrainingCorpus::from_symbols(vec![
            ('A', vec![sig("a1"), sig("a2")]),
            ('B', vec![sig("b1")]),
        ]);

        assert_eq!(corpus.resolve(&sig("a2")), Some('A'));
        assert_eq!(corpus.resolve(&sig("b1")), Some('B'));
        assert_eq!(corpus.resolve(&sig("zz")), None);
    }

    #[test]
    fn test_resolve_prefers_alphabetical_symbol() {
        let corpus = TrainingCorpus::from_symbols(vec![
            ('X', vec![sig("shared")]),
            ('C', vec![sig("shared")]),
        ]);

        assert_eq!(corpus.resolve(&sig("shared")), Some('C'));
        assert_eq!(corpus.symbols().collect::<Vec<_>>(), vec!['C', 'X']);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.json"), r#"["b'x\\x9c1'", "b'x\\x9c2'"]"#).unwrap();
        fs::write(dir.path().join("B.json"), r#"["b'x\\x9c3'"]"#).unwrap();
        fs::write(dir.path().join("README.json"), r#"["ignored"]"#).unwrap();
        fs::write(dir.path().join("C.txt"), "ignored").unwrap();

        let corpus = TrainingCorpus::load_from_dir(dir.path()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.signature_count(), 3);
        assert_eq!(corpus.resolve(&sig(r"b'x\x9c3'")), Some('B'));
        assert_eq!(corpus.resolve(&sig("ignored")), None);
    }

    #[test]
    fn test_standard_locations_are_inside_working_dir() {
        for path in TRAINING_DATA_PATHS {
            assert!(Path::new(path).is_relative());
            assert!(!Path::new(path)
                .components()
                .any(|c| c == std::path::Component::ParentDir));
        }
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = TrainingCorpus::load_from_dir(dir.path().join("missing"));
        assert!(matches!(result, Err(CaptchaError::Corpus(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.json"), "not json").unwrap();

        let result = TrainingCorpus::load_from_dir(dir.path());
        assert!(matches!(result, Err(CaptchaError::Json(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let corpus = TrainingCorpus::from_symbols(vec![
            ('k', vec![sig("k1"), sig("k2")]),
            ('7', vec![sig("s1")]),
        ]);

        corpus.save_to_dir(dir.path()).unwrap();
        let loaded = TrainingCorpus::load_from_dir(dir.path()).unwrap();

        assert_eq!(loaded, corpus);
    }

    #[test]
    fn test_learn_labelled_captcha() {
        let mut corpus = TrainingCorpus::new();
        let signatures = vec![sig("1"), sig("2"), sig("3")];

        assert_eq!(corpus.learn("ABA", &signatures).unwrap(), 3);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.resolve(&sig("3")), Some('A'));

        // Already known signatures are not counted again
        assert_eq!(corpus.learn("ABA", &signatures).unwrap(), 0);
    }

    #[test]
    fn test_learn_length_mismatch() {
        let mut corpus = TrainingCorpus::new();
        let result = corpus.learn("ABCDEF", &[sig("1")]);
        assert!(matches!(result, Err(CaptchaError::Corpus(_))));
        assert!(corpus.is_empty());
    }
}
