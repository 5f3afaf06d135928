//! Test doubles for the provider traits.

use crate::completion::ChatModel;
use crate::embedding::Embedder;
use crate::error::{Result, TalkRagError};
use crate::vector_store::{QueryMatch, VectorRecord, VectorStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embeds text into a small deterministic vector.
///
/// Texts containing `fail_marker` produce an embedding error.
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
    pub fail_marker: Option<String>,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_marker: None,
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(TalkRagError::Embedding("provider rejected input".to_string()));
            }
        }
        let len = text.chars().count() as f32;
        let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count() as f32;
        Ok(vec![1.0, len / 1000.0, vowels / 100.0])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Returns a fixed reply and remembers the prompts it was given.
pub struct FakeChat {
    pub reply: String,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "fake-chat"
    }
}

/// Serves a canned ranked match list and records upserts.
pub struct ScriptedStore {
    pub matches: Vec<QueryMatch>,
    /// Number of upsert calls that fail before one succeeds.
    pub upsert_failures: AtomicUsize,
    /// HTTP status reported by each failing upsert.
    pub failure_status: u16,
    pub upsert_calls: AtomicUsize,
    pub upserted: Mutex<Vec<Vec<VectorRecord>>>,
    pub queries: AtomicUsize,
}

impl ScriptedStore {
    pub fn with_matches(matches: Vec<QueryMatch>) -> Self {
        Self {
            matches,
            upsert_failures: AtomicUsize::new(0),
            failure_status: 503,
            upsert_calls: AtomicUsize::new(0),
            upserted: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn failing_upserts(failures: usize) -> Self {
        let store = Self::with_matches(Vec::new());
        store.upsert_failures.store(failures, Ordering::SeqCst);
        store
    }

    /// Every upsert is refused with `status`.
    pub fn rejecting_upserts(status: u16) -> Self {
        let mut store = Self::failing_upserts(usize::MAX);
        store.failure_status = status;
        store
    }

    pub fn batches(&self) -> Vec<Vec<VectorRecord>> {
        self.upserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.upsert_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.upsert_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(TalkRagError::ProviderStatus {
                service: "index".to_string(),
                status: self.failure_status,
                body: "upsert refused".to_string(),
            });
        }
        self.upserted.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }

    async fn query(
        &self,
        _vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .matches
            .iter()
            .take(top_k)
            .cloned()
            .map(|mut m| {
                if !include_metadata {
                    m.metadata = None;
                }
                m
            })
            .collect())
    }
}
