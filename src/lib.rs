//! talkrag - Retrieval-augmented question answering over talk transcripts
//!
//! Ingests a CSV dataset of talks into a vector index and answers natural
//! language questions using only the retrieved transcript passages.
//!
//! # Overview
//!
//! talkrag allows you to:
//! - Chunk transcripts into overlapping, attributed passages
//! - Embed and upsert those passages into a Pinecone index
//! - Ask questions over HTTP or from the command line
//! - Inspect the exact prompt and passages behind every answer
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings, credentials and prompt templates
//! - `dataset` - CSV talk loading
//! - `chunking` - Fixed-size character chunking
//! - `embedding` - Embedding generation
//! - `completion` - Chat completion
//! - `vector_store` - Vector index abstraction
//! - `ingest` - Chunk, embed and upsert pipeline
//! - `rag` - Query service for question answering
//! - `services` - Wiring of providers from configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use talkrag::config::Settings;
//! use talkrag::services::Services;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let services = Services::connect(&settings).await?;
//!     let service = services.query_service(&settings)?;
//!
//!     let response = service.ask("Which talks discuss creativity in schools?").await?;
//!     println!("{}", response.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod openai;
pub mod rag;
pub mod retry;
pub mod services;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{Result, TalkRagError};
