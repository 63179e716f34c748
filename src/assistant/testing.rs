//! Scripted collaborator stubs for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::assistant::core::config::AssistantConfig;
use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::embedding::embedder::{EmbedFuture, Embedder};
use crate::assistant::engine::orchestrator::{AssistantBackends, TurnOrchestrator};
use crate::assistant::llm::generator::{GenerateFuture, GenerationRequest, TextGenerator};
use crate::assistant::storage::vector_index::{IndexMatch, StoreFuture, VectorIndex};

const DEFAULT_REPLY: &str = "scripted reply";

enum Step {
    Reply(String),
    Fail,
}

/// Generator that answers from a queue and records every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_replies<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::default();
        for reply in replies {
            generator.push_reply(reply);
        }
        Arc::new(generator)
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(Step::Reply(reply.into()));
        }
    }

    pub fn push_failure(&self) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(Step::Fail);
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map_or(0, |requests| requests.len())
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, request: GenerationRequest) -> GenerateFuture<'_, AssistantResult<String>> {
        Box::pin(async move {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let step = self.steps.lock().ok().and_then(|mut steps| steps.pop_front());
            match step {
                Some(Step::Reply(reply)) => Ok(reply),
                Some(Step::Fail) => Err(AssistantError::Unavailable(
                    "scripted generator failure".to_string(),
                )),
                None => Ok(DEFAULT_REPLY.to_string()),
            }
        })
    }
}

/// Embedder returning the same vector for every text.
pub struct FixedEmbedder {
    vector: Vec<f64>,
    ndims: usize,
    texts: Mutex<Vec<String>>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f64>) -> Arc<Self> {
        let ndims = vector.len();
        Self::with_ndims(vector, ndims)
    }

    /// Embedder whose reported dimensionality differs from what it returns.
    pub fn with_ndims(vector: Vec<f64>, ndims: usize) -> Arc<Self> {
        Arc::new(Self {
            vector,
            ndims,
            texts: Mutex::new(Vec::new()),
        })
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|texts| texts.clone()).unwrap_or_default()
    }
}

impl Embedder for FixedEmbedder {
    fn embed_text(&self, text: &str) -> EmbedFuture<'_, AssistantResult<Vec<f64>>> {
        let text = text.to_string();
        Box::pin(async move {
            if let Ok(mut texts) = self.texts.lock() {
                texts.push(text);
            }
            Ok(self.vector.clone())
        })
    }

    fn ndims(&self) -> usize {
        self.ndims
    }
}

/// Index returning a fixed candidate list, truncated to `top_k`.
pub struct StaticIndex {
    matches: Vec<IndexMatch>,
    fail: bool,
    searches: Mutex<usize>,
}

impl StaticIndex {
    pub fn new(matches: Vec<IndexMatch>) -> Arc<Self> {
        Arc::new(Self {
            matches,
            fail: false,
            searches: Mutex::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            matches: Vec::new(),
            fail: true,
            searches: Mutex::new(0),
        })
    }

    pub fn searches(&self) -> usize {
        self.searches.lock().map_or(0, |count| *count)
    }
}

impl VectorIndex for StaticIndex {
    fn search(
        &self,
        _vector: Vec<f64>,
        top_k: usize,
    ) -> StoreFuture<'_, AssistantResult<Vec<IndexMatch>>> {
        Box::pin(async move {
            if let Ok(mut count) = self.searches.lock() {
                *count += 1;
            }
            if self.fail {
                return Err(AssistantError::Backend {
                    backend: "static",
                    status: 503,
                });
            }
            Ok(self.matches.iter().take(top_k).cloned().collect())
        })
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}

/// Build a candidate from `(key, value)` pairs.
pub fn index_match(pairs: &[(&str, Value)], score: Option<f64>) -> IndexMatch {
    let metadata: Map<String, Value> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect();
    IndexMatch { metadata, score }
}

/// Orchestrator over the given stubs with default configuration.
pub fn orchestrator(
    generator: Arc<ScriptedGenerator>,
    embedder: Arc<FixedEmbedder>,
    index: Arc<StaticIndex>,
) -> TurnOrchestrator {
    let backends = AssistantBackends {
        classifier: generator.clone(),
        generator,
        embedder,
        index,
    };
    TurnOrchestrator::new(backends, &AssistantConfig::default())
}
