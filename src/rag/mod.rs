//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Provides the ability to ask questions and get answers grounded in the
//! indexed talk transcripts.

pub mod context;
mod response;

pub use context::{build_context_block, ContextChunk};
pub use response::{AugmentedPrompt, QueryService, RagConfig, RagResponse};
