//! Test utilities for the Glossa backend
//!
//! Provides programmable mock implementations of every collaborator contract
//! plus builders for cache payloads, so the caching and coalescing layers can
//! be tested without any real translation, pronunciation or OCR engine.

pub mod builders;
pub mod mocks;

pub use builders::test_data;
pub use mocks::{
    MockPronouncer, MockTranslator, SpacingSegmenter, StaticDetector, StaticRecognizer,
    StaticSentenceSource,
};
