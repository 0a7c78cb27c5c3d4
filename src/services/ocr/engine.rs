use super::signature::Signature;

/// Glyph matcher trait - abstraction over signature lookup backends
pub trait GlyphMatcher: Send + Sync {
    /// Resolve a signature to its symbol, or `None` when no symbol knows it
    fn resolve(&self, signature: &Signature) -> Option<char>;
}

impl<M: GlyphMatcher + ?Sized> GlyphMatcher for &M {
    fn resolve(&self, signature: &Signature) -> Option<char> {
        (**self).resolve(signature)
    }
}
