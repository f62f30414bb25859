//! Request orchestrators
//!
//! This module contains the per-request pipelines coordinating cache
//! lookups, pivot reuse, and coalesced upstream calls.

pub mod translate_orchestrator;

pub use translate_orchestrator::{TranslateOrchestrator, TranslateRequest};
