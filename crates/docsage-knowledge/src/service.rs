//! The knowledge base service and its single-flight initialization guard.
//!
//! [`KnowledgeBase`] is a cheap cloneable handle. The first call to
//! [`KnowledgeBase::ensure_initialized`] starts one build; every concurrent or
//! later caller awaits that same shared future instead of starting another.
//! Build failures are logged and absorbed: the service then runs without a
//! knowledge base and every read returns its empty default.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::context::{assemble_context, ContextSource};
use crate::index::KnowledgeBaseIndex;
use crate::types::{ContextResult, IndexStats, KnowledgeBaseInfo, LifecycleState};
use docsage_core::{Error, KnowledgeBaseConfig, Result};
use docsage_ingest::{segmenter_for, Chunker, DocumentChunk, DocumentSource, PdfFileSource, Segmenter};

type PendingBuild = Shared<BoxFuture<'static, ()>>;

/// Handle to the process-wide knowledge base.
#[derive(Clone)]
pub struct KnowledgeBase {
    inner: Arc<Inner>,
}

struct Inner {
    disabled: bool,
    source: Arc<dyn DocumentSource>,
    segmenter: Arc<dyn Segmenter>,
    chunker: Chunker,
    /// Not started (`None`), or the shared in-flight/completed build.
    pending: Mutex<Option<PendingBuild>>,
    slot: RwLock<Slot>,
}

struct Slot {
    state: LifecycleState,
    index: Option<Arc<KnowledgeBaseIndex>>,
    /// Bumped by `reset`; a build only commits into the generation it started in.
    generation: u64,
}

impl KnowledgeBase {
    /// Knowledge base over the configured PDF file.
    pub fn from_config(config: &KnowledgeBaseConfig) -> Self {
        let source = Arc::new(PdfFileSource::new(config.pdf_path.clone()));
        Self::new(config, source)
    }

    /// Knowledge base over an arbitrary document source.
    pub fn new(config: &KnowledgeBaseConfig, source: Arc<dyn DocumentSource>) -> Self {
        let segmenter = segmenter_for(config.segmenter);
        if config.disabled {
            info!("Knowledge base initialization disabled");
        } else {
            debug!(
                "Knowledge base source {} (segmenter {}, chunk {}/{})",
                source.describe(),
                segmenter.name(),
                config.chunk_size,
                config.chunk_overlap
            );
        }

        Self {
            inner: Arc::new(Inner {
                disabled: config.disabled,
                source,
                segmenter,
                chunker: Chunker::new(config.chunk_size, config.chunk_overlap),
                pending: Mutex::new(None),
                slot: RwLock::new(Slot {
                    state: initial_state(config.disabled),
                    index: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Build the index unless a build already ran or is running.
    ///
    /// Never fails: a failed build is logged, leaves [`Self::is_ready`] false,
    /// and is not retried until [`Self::retry`] or [`Self::reset`].
    pub async fn ensure_initialized(&self) {
        if self.inner.disabled {
            return;
        }

        let pending = {
            let mut pending = self.inner.pending.lock();
            match pending.as_ref() {
                Some(build) => build.clone(),
                None => {
                    let build = self.start_build();
                    *pending = Some(build.clone());
                    build
                }
            }
        };

        pending.await;
    }

    /// Start a fresh build if the last one failed, then wait for it.
    pub async fn retry(&self) {
        {
            let mut pending = self.inner.pending.lock();
            if self.state() == LifecycleState::Failed {
                info!("Retrying knowledge base initialization");
                *pending = None;
            }
        }
        self.ensure_initialized().await;
    }

    /// Drop the index and return to the pre-initialization state.
    ///
    /// A build still in flight finishes but its result is discarded.
    pub fn reset(&self) {
        let mut pending = self.inner.pending.lock();
        let mut slot = self.inner.slot.write();
        *pending = None;
        slot.generation += 1;
        slot.index = None;
        slot.state = initial_state(self.inner.disabled);
    }

    /// Must be called with the `pending` lock held.
    fn start_build(&self) -> PendingBuild {
        let generation = {
            let mut slot = self.inner.slot.write();
            slot.state = LifecycleState::Building;
            slot.generation
        };

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let builder = Arc::clone(&inner);
            let outcome = tokio::task::spawn_blocking(move || builder.build_index())
                .await
                .unwrap_or_else(|e| Err(Error::Build(format!("index build task failed: {e}"))));
            inner.commit(generation, outcome);
        });

        async move {
            if let Err(e) = task.await {
                error!("Knowledge base initialization task aborted: {}", e);
            }
        }
        .boxed()
        .shared()
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.slot.read().state
    }

    pub fn is_ready(&self) -> bool {
        let slot = self.inner.slot.read();
        slot.state == LifecycleState::Ready && slot.index.is_some()
    }

    /// The built index, if any.
    pub fn index(&self) -> Option<Arc<KnowledgeBaseIndex>> {
        self.inner.slot.read().index.clone()
    }

    pub fn overall_summary(&self) -> String {
        self.index()
            .map(|index| index.summary().to_string())
            .unwrap_or_default()
    }

    pub fn top_keywords(&self) -> Vec<String> {
        self.index()
            .map(|index| index.keywords().to_vec())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> IndexStats {
        self.index().map(|index| index.stats()).unwrap_or_default()
    }

    /// Up to `max_results` chunks ranked against `query`; empty when not ready.
    pub fn search_relevant_chunks(&self, query: &str, max_results: usize) -> Vec<DocumentChunk> {
        let Some(index) = self.index() else {
            warn!("Knowledge base not initialized; returning no chunks");
            return Vec::new();
        };
        index
            .search(query, max_results, self.inner.segmenter.as_ref())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Initialize if needed, then report readiness and, when ready, the
    /// summary, keywords and stats.
    pub async fn info(&self) -> KnowledgeBaseInfo {
        self.ensure_initialized().await;

        match self.index() {
            Some(index) if self.is_ready() => KnowledgeBaseInfo {
                is_ready: true,
                summary: Some(index.summary().to_string()),
                keywords: Some(index.keywords().to_vec()),
                stats: Some(index.stats()),
            },
            _ => KnowledgeBaseInfo::default(),
        }
    }

    /// Initialize if needed, then assemble prompt context for `query`.
    ///
    /// Non-empty `uploaded_text` takes priority over the knowledge base.
    pub async fn build_context(&self, query: &str, uploaded_text: Option<&str>) -> ContextResult {
        self.ensure_initialized().await;
        assemble_context(self, query, uploaded_text)
    }
}

impl ContextSource for KnowledgeBase {
    fn is_ready(&self) -> bool {
        KnowledgeBase::is_ready(self)
    }

    fn search_relevant_chunks(&self, query: &str, max_results: usize) -> Vec<DocumentChunk> {
        KnowledgeBase::search_relevant_chunks(self, query, max_results)
    }

    fn overall_summary(&self) -> String {
        KnowledgeBase::overall_summary(self)
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("source", &self.inner.source.describe())
            .field("segmenter", &self.inner.segmenter.name())
            .field("state", &self.state())
            .finish()
    }
}

impl Inner {
    /// Runs on a blocking thread.
    fn build_index(&self) -> Result<KnowledgeBaseIndex> {
        info!("Initializing knowledge base from {}", self.source.describe());

        let extracted = self.source.load()?;
        if extracted.text.trim().is_empty() {
            warn!(
                "{} yielded no text; the knowledge base will be empty",
                self.source.describe()
            );
        }

        Ok(KnowledgeBaseIndex::build(
            &extracted.text,
            &self.chunker,
            self.segmenter.as_ref(),
        ))
    }

    fn commit(&self, generation: u64, outcome: Result<KnowledgeBaseIndex>) {
        let mut slot = self.slot.write();
        if slot.generation != generation {
            debug!("Discarding knowledge base build from a previous generation");
            return;
        }

        match outcome {
            Ok(index) => {
                info!("Knowledge base initialized with {} chunks", index.total_chunks());
                info!("Summary: {}", preview(index.summary(), 200));
                info!(
                    "Top keywords: {}",
                    index.keywords().iter().take(10).cloned().collect::<Vec<_>>().join(", ")
                );
                info!("Knowledge base statistics: {:?}", index.stats());
                info!(
                    "Knowledge base built at {} from source sha256 {}",
                    index.built_at().to_rfc3339(),
                    short_hash(index.source_hash())
                );
                slot.index = Some(Arc::new(index));
                slot.state = LifecycleState::Ready;
            }
            Err(e) => {
                error!("Failed to initialize knowledge base: {}", e);
                warn!("Continuing without the knowledge base");
                info!(
                    "To enable it, place the document at {} or set KNOWLEDGE_BASE_PDF_PATH",
                    self.source.describe()
                );
                slot.index = None;
                slot.state = LifecycleState::Failed;
            }
        }
    }
}

fn initial_state(disabled: bool) -> LifecycleState {
    if disabled {
        LifecycleState::Disabled
    } else {
        LifecycleState::Uninitialized
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsage_ingest::ExtractedText;

    struct StaticSource(&'static str);

    impl DocumentSource for StaticSource {
        fn load(&self) -> Result<ExtractedText> {
            Ok(ExtractedText {
                text: self.0.to_string(),
                page_count: 1,
            })
        }

        fn describe(&self) -> String {
            "static".into()
        }
    }

    fn config() -> KnowledgeBaseConfig {
        KnowledgeBaseConfig::default()
    }

    #[tokio::test]
    async fn test_reads_before_initialization_return_defaults() {
        let kb = KnowledgeBase::new(&config(), Arc::new(StaticSource("Some text here.")));
        assert_eq!(kb.state(), LifecycleState::Uninitialized);
        assert!(!kb.is_ready());
        assert_eq!(kb.overall_summary(), "");
        assert!(kb.top_keywords().is_empty());
        assert_eq!(kb.stats(), IndexStats::default());
        assert!(kb.search_relevant_chunks("text", 3).is_empty());
    }

    #[tokio::test]
    async fn test_initializes_once_and_serves_reads() {
        let kb = KnowledgeBase::new(
            &config(),
            Arc::new(StaticSource("Payroll runs monthly. Receipts are required.")),
        );
        kb.ensure_initialized().await;

        assert_eq!(kb.state(), LifecycleState::Ready);
        assert!(kb.is_ready());
        assert_eq!(kb.overall_summary(), "Payroll runs monthly. Receipts are required.");
        assert_eq!(kb.stats().total_chunks, 1);
        assert_eq!(kb.search_relevant_chunks("payroll", 3).len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_never_builds() {
        let mut config = config();
        config.disabled = true;
        let kb = KnowledgeBase::new(&config, Arc::new(StaticSource("Text.")));

        kb.ensure_initialized().await;
        kb.retry().await;
        assert_eq!(kb.state(), LifecycleState::Disabled);
        assert!(!kb.is_ready());
        assert_eq!(kb.info().await, KnowledgeBaseInfo::default());
    }

    #[tokio::test]
    async fn test_reset_returns_to_uninitialized() {
        let kb = KnowledgeBase::new(&config(), Arc::new(StaticSource("Text here.")));
        kb.ensure_initialized().await;
        assert!(kb.is_ready());

        kb.reset();
        assert_eq!(kb.state(), LifecycleState::Uninitialized);
        assert!(!kb.is_ready());
        assert!(kb.index().is_none());

        kb.ensure_initialized().await;
        assert!(kb.is_ready());
    }

    #[tokio::test]
    async fn test_info_when_ready() {
        let kb = KnowledgeBase::new(&config(), Arc::new(StaticSource("Handbook covers payroll.")));
        let info = kb.info().await;
        assert!(info.is_ready);
        assert_eq!(info.summary.as_deref(), Some("Handbook covers payroll."));
        assert_eq!(
            info.keywords,
            Some(vec!["handbook".to_string(), "covers".into(), "payroll".into()])
        );
        assert_eq!(info.stats.map(|s| s.total_chunks), Some(1));
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_hash("abc"), "abc");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
