//! Turn orchestration: route, run one branch, merge.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::assistant::compose::composer::{ComposedReply, ResponseComposer};
use crate::assistant::core::config::{AssistantConfig, IndexBackend};
use crate::assistant::core::errors::AssistantResult;
use crate::assistant::core::route::Route;
use crate::assistant::core::snippet::RetrievedSnippet;
use crate::assistant::embedding::embedder::{Embedder, OllamaEmbedder};
use crate::assistant::llm::generator::{OllamaGenerator, TextGenerator};
use crate::assistant::retrieval::retriever::KnowledgeRetriever;
use crate::assistant::router::classifier::MessageRouter;
use crate::assistant::state::conversation::{ConversationState, TurnDelta};
use crate::assistant::storage::mongo_index::{MongoIndex, MongoTarget};
use crate::assistant::storage::pinecone_index::PineconeIndex;
use crate::assistant::storage::sqlite_index::SqliteVecIndex;
use crate::assistant::storage::vector_index::VectorIndex;

/// Collaborators used by the orchestrator.
pub struct AssistantBackends {
    /// Route classifier model.
    pub classifier: Arc<dyn TextGenerator>,
    /// Reply generation model.
    pub generator: Arc<dyn TextGenerator>,
    /// Query embedder.
    pub embedder: Arc<dyn Embedder>,
    /// Knowledge index.
    pub index: Arc<dyn VectorIndex>,
}

impl AssistantBackends {
    /// Build Ollama models and the configured index.
    ///
    /// The classifier and the generator share one client; they differ only in
    /// the temperature passed per request.
    ///
    /// # Errors
    /// Returns an error if a client cannot be built or the index cannot be reached.
    pub async fn from_config(config: &AssistantConfig) -> AssistantResult<Self> {
        let generator: Arc<dyn TextGenerator> = Arc::new(OllamaGenerator::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::new(&config.llm, &config.embedding)?);
        let index: Arc<dyn VectorIndex> = match &config.retrieval.backend {
            IndexBackend::Sqlite { path, table } => {
                Arc::new(SqliteVecIndex::open(path, table).await?)
            }
            IndexBackend::Pinecone {
                host,
                api_key,
                namespace,
            } => {
                let index = PineconeIndex::new(host, api_key, namespace.clone())?;
                index.verify().await?;
                Arc::new(index)
            }
            IndexBackend::Mongo {
                uri,
                database,
                collection,
                index_name,
                embedding_path,
                app_name,
            } => {
                let target = MongoTarget {
                    database,
                    collection,
                    index_name,
                    embedding_path,
                };
                Arc::new(MongoIndex::connect(uri, app_name.as_deref(), target).await?)
            }
        };

        Ok(Self {
            classifier: Arc::clone(&generator),
            generator,
            embedder,
            index,
        })
    }
}

/// Stage of a turn, named in failure logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStage {
    /// Route classification.
    Routing,
    /// Conversational reply.
    GeneralBranch,
    /// Retrieval and grounded reply.
    SleepBranch,
    /// Folding the reply into state.
    Merge,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Routing => "routing",
            Self::GeneralBranch => "general_branch",
            Self::SleepBranch => "sleep_branch",
            Self::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// Result of a completed turn.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    /// State with the turn applied.
    pub state: ConversationState,
    /// Assistant reply.
    pub reply: String,
    /// Route taken.
    pub route: Route,
    /// Snippets the reply was grounded on.
    pub snippets: Vec<RetrievedSnippet>,
}

/// Sequences router, retriever, and composer for each turn.
#[derive(Clone)]
pub struct TurnOrchestrator {
    router: MessageRouter,
    retriever: KnowledgeRetriever,
    composer: ResponseComposer,
}

impl TurnOrchestrator {
    /// Create an orchestrator.
    #[must_use]
    pub fn new(backends: AssistantBackends, config: &AssistantConfig) -> Self {
        Self {
            router: MessageRouter::new(backends.classifier, config.llm.classifier_temperature),
            retriever: KnowledgeRetriever::new(
                backends.embedder,
                backends.index,
                config.retrieval.top_k,
                config.conversation.query_history_turns,
            ),
            composer: ResponseComposer::new(
                backends.generator,
                config.llm.temperature,
                config.conversation.window_messages,
            ),
        }
    }

    /// Process one user turn.
    ///
    /// The turn runs on a copy of `state`; on success the copy is returned
    /// with the user message and reply applied. On error nothing is returned,
    /// so the caller's state stays as it was.
    ///
    /// # Errors
    /// Returns an error if any collaborator call fails.
    pub async fn process_turn(
        &self,
        state: &ConversationState,
        raw_text: &str,
    ) -> AssistantResult<TurnOutcome> {
        let mut working = state.clone();
        if !working.record_user_message(raw_text) {
            debug!("Empty user message; continuing with existing history");
        }

        let route = run_stage(TurnStage::Routing, self.router.route(&working)).await?;
        let stage = match route {
            Route::General => TurnStage::GeneralBranch,
            Route::Sleep => TurnStage::SleepBranch,
        };
        let composed = run_stage(stage, self.run_branch(route, &working)).await?;

        debug!("Stage {}: applying {} reply", TurnStage::Merge, route);
        working.apply(TurnDelta {
            reply: composed.reply.clone(),
            route,
            snippets: composed.snippets.clone(),
        });
        info!(
            "Turn complete: route={}, snippets={}",
            route,
            composed.snippets.len()
        );

        Ok(TurnOutcome {
            state: working,
            reply: composed.reply,
            route,
            snippets: composed.snippets,
        })
    }

    async fn run_branch(
        &self,
        route: Route,
        state: &ConversationState,
    ) -> AssistantResult<ComposedReply> {
        let snippets = match route {
            Route::Sleep if state.latest_user_utterance().is_some() => {
                self.retriever.retrieve_for(state).await?
            }
            Route::Sleep | Route::General => Vec::new(),
        };
        self.composer.compose(route, state, snippets).await
    }
}

async fn run_stage<T, F>(stage: TurnStage, future: F) -> AssistantResult<T>
where
    F: Future<Output = AssistantResult<T>>,
{
    future.await.inspect_err(|err| {
        error!("Turn failed during {}: {}", stage, err);
    })
}
