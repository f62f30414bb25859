//! Glossa Core Library
//!
//! This is the core library for the Glossa translation cache, providing
//! cache-key derivation, text canonicalization, the error taxonomy, and the
//! collaborator contracts for the external translation, pronunciation,
//! segmentation, detection, generation and recognition capabilities.
//!
//! The caching, coalescing and orchestration layers that consume these types
//! live in the `glossa_service` crate.

pub mod error;
pub mod keys;
pub mod language;
pub mod payload;
pub mod text;
pub mod upstream;

// Re-export main types
pub use error::{CacheError, Error, InternalError, Result, UpstreamError, ValidationError};
pub use keys::CacheKey;
pub use language::LanguageTag;
pub use payload::{Completeness, TranslationPayload};
pub use upstream::{
    Detector, IdentitySegmenter, Pronouncer, Pronunciation, Recognizer, Segmenter, SeedKind,
    SentenceSource, Translation, Translator,
};
