//! FAQ matching by embedding similarity.
//!
//! [`FaqMatcher`] owns the FAQ entries and an index of their question
//! embeddings. The index is built once per process by [`FaqMatcher::warm_up`]
//! behind a [`OnceCell`], so concurrent first callers share a single build.
//! The build issues one embedding call per entry, all in flight at once. A failed
//! build leaves the cell empty and the next call tries again. The index is
//! never refreshed afterwards.
//!
//! A lookup embeds the question, scores it against every indexed question
//! with cosine similarity, keeps the first best-scoring entry, and returns it
//! only if the score is strictly above the threshold.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;

use hr_faq_core::models::FaqEntry;
use hr_faq_core::similarity::{accept, best_match};

use crate::embedding::{embed_one, Embedder};

/// An accepted FAQ match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaqMatch<'a> {
    pub entry: &'a FaqEntry,
    pub score: f32,
}

pub struct FaqMatcher {
    entries: Vec<FaqEntry>,
    embedder: Arc<dyn Embedder>,
    threshold: f32,
    index: OnceCell<Vec<Vec<f32>>>,
}

impl FaqMatcher {
    pub fn new(entries: Vec<FaqEntry>, embedder: Arc<dyn Embedder>, threshold: f32) -> Self {
        Self {
            entries,
            embedder,
            threshold,
            index: OnceCell::new(),
        }
    }

    /// True once the question index has been built.
    #[cfg(test)]
    fn is_warm(&self) -> bool {
        self.index.initialized()
    }

    /// Builds the question index if it is not built yet.
    ///
    /// Idempotent; returns the number of indexed entries.
    pub async fn warm_up(&self) -> Result<usize> {
        Ok(self.index().await?.len())
    }

    async fn index(&self) -> Result<&Vec<Vec<f32>>> {
        self.index.get_or_try_init(|| self.build_index()).await
    }

    async fn build_index(&self) -> Result<Vec<Vec<f32>>> {
        tracing::info!(
            entries = self.entries.len(),
            model = self.embedder.model_name(),
            "embedding FAQ questions"
        );

        let embedder = self.embedder.as_ref();
        let vectors = futures::future::try_join_all(
            self.entries
                .iter()
                .map(|entry| embed_one(embedder, &entry.question)),
        )
        .await?;

        tracing::info!(entries = vectors.len(), "FAQ index ready");
        Ok(vectors)
    }

    /// Finds the FAQ entry answering `question`, if any is close enough.
    ///
    /// # Errors
    ///
    /// Any embedding failure, for the index or for the question.
    pub async fn find(&self, question: &str) -> Result<Option<FaqMatch<'_>>> {
        let index = self.index().await?;
        if index.is_empty() {
            return Ok(None);
        }

        let query = embed_one(self.embedder.as_ref(), question).await?;
        let best = best_match(&query, index);

        if let Some(b) = best {
            tracing::info!(
                score = format_args!("{:.2}", b.score),
                question = %self.entries[b.index].question,
                "best FAQ similarity"
            );
        }

        Ok(accept(best, self.threshold).map(|s| FaqMatch {
            entry: &self.entries[s.index],
            score: s.score,
        }))
    }
}
