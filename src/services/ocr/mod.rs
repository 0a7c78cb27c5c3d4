pub mod corpus;
pub mod engine;
pub mod preprocessing;
pub mod segmenter;
pub mod signature;

// Re-export main types
pub use corpus::TrainingCorpus;
pub use engine::GlyphMatcher;
pub use segmenter::LetterSegmenter;
pub use signature::Signature;
