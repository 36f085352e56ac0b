//! Selection orchestrator: the tier walk.
//!
//! `TryRetrieval → TryProvider → TryLocal → Done`. A remote tier is attempted
//! only when it is configured and the session has not flagged it. The first
//! success wins; any failure flags that tier for the rest of the session and
//! moves on. The local tier cannot fail, so every walk ends with an item.
//!
//! Tiers run strictly one after another, each under its own timeout.

use futures::future;
use std::sync::Arc;
use std::time::Duration;
use stoa_config::AppConfig;
use stoa_core::context::{Context, classify};
use stoa_core::error::{Error, SelectError};
use stoa_core::item::Item;
use stoa_core::selector::{ItemSelector, SelectionResult, Tier};
use stoa_core::signals::SignalSource;
use stoa_corpus::local::{self, LocalSelector};
use stoa_corpus::Corpus;
use stoa_providers::{ProviderRegistry, RetrievalClient};
use tracing::{debug, info, warn};

use crate::session::SessionState;

/// Provider candidate cap when none is configured.
pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// A configured remote tier and its per-call deadline.
struct RemoteTier {
    selector: Arc<dyn ItemSelector>,
    timeout: Duration,
}

/// Walks the tiers for each selection request.
pub struct Orchestrator {
    corpus: Arc<Corpus>,
    retrieval: Option<RemoteTier>,
    provider: Option<RemoteTier>,
    probe_retrieval: bool,
    max_candidates: usize,
    local: LocalSelector,
    session: SessionState,
}

impl Orchestrator {
    /// A local-only orchestrator over `corpus`.
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self {
            corpus,
            retrieval: None,
            provider: None,
            probe_retrieval: true,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            local: LocalSelector::new(),
            session: SessionState::new(),
        }
    }

    /// Build from configuration, loading the corpus it names.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let corpus = Corpus::open(config.corpus.path.as_deref(), config.corpus.auto_tag)?;
        Self::from_config_with_corpus(config, Arc::new(corpus))
    }

    /// Build from configuration over an already-loaded corpus.
    ///
    /// An enabled tier without its endpoint or credential is a configuration
    /// error here rather than a silent downgrade to local.
    pub fn from_config_with_corpus(
        config: &AppConfig,
        corpus: Arc<Corpus>,
    ) -> Result<Self, Error> {
        let mut orchestrator =
            Self::new(corpus).with_max_candidates(config.selection.max_candidates);

        let retrieval = &config.retrieval;
        if retrieval.enabled {
            let endpoint = retrieval
                .endpoint
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .ok_or_else(|| {
                    Error::config("retrieval is enabled but retrieval.endpoint is not set")
                })?;
            let timeout = Duration::from_secs(retrieval.timeout_secs);
            let client = RetrievalClient::new(endpoint, retrieval.api_key.clone(), timeout);
            orchestrator = orchestrator
                .with_retrieval(Arc::new(client), timeout)
                .with_probe(retrieval.probe);
        }

        let provider = &config.provider;
        if provider.enabled {
            let timeout = Duration::from_secs(provider.timeout_secs);
            let client = ProviderRegistry::new(timeout).resolve(&config.provider_config())?;
            orchestrator = orchestrator.with_provider(Arc::new(client), timeout);
        }

        info!(
            retrieval = orchestrator.retrieval.is_some(),
            provider = orchestrator.provider_name().unwrap_or("none"),
            corpus = orchestrator.corpus.len(),
            "Orchestrator ready"
        );
        Ok(orchestrator)
    }

    pub fn with_retrieval(mut self, selector: Arc<dyn ItemSelector>, timeout: Duration) -> Self {
        self.retrieval = Some(RemoteTier { selector, timeout });
        self
    }

    pub fn with_provider(mut self, selector: Arc<dyn ItemSelector>, timeout: Duration) -> Self {
        self.provider = Some(RemoteTier { selector, timeout });
        self
    }

    /// Whether to health-check retrieval before its first use in a session.
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe_retrieval = probe;
        self
    }

    /// Zero is treated as one.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }

    /// Share (or replace) the session flags.
    pub fn with_session(mut self, session: SessionState) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn retrieval_enabled(&self) -> bool {
        self.retrieval.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.selector.name())
    }

    /// Select an item for `context`. Never fails once constructed.
    pub async fn select(&self, context: &Context) -> Result<SelectionResult, Error> {
        self.select_until(context, future::pending::<()>()).await
    }

    /// Read signals from `source`, classify them at the current local time,
    /// and select.
    pub async fn select_now(&self, source: &dyn SignalSource) -> Result<SelectionResult, Error> {
        let context = classify(&source.read(), &chrono::Local::now());
        self.select(&context).await
    }

    /// Like [`select`](Self::select), but gives up with [`Error::Cancelled`]
    /// as soon as `cancel` completes. A cancelled attempt does not flag its
    /// tier.
    pub async fn select_until<C>(
        &self,
        context: &Context,
        cancel: C,
    ) -> Result<SelectionResult, Error>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);

        if let Some(remote) = self.remote(Tier::Retrieval) {
            tokio::select! {
                biased;
                _ = &mut cancel => return Err(cancelled(Tier::Retrieval)),
                outcome = self.try_retrieval(remote, context) => {
                    if let Some(result) = self.settle(Tier::Retrieval, remote, outcome) {
                        return Ok(result);
                    }
                }
            }
        }

        if let Some(remote) = self.remote(Tier::Provider) {
            let candidates = bound_candidates(&self.corpus, context, self.max_candidates);
            tokio::select! {
                biased;
                _ = &mut cancel => return Err(cancelled(Tier::Provider)),
                outcome = self.call(remote, context, &candidates) => {
                    if let Some(result) = self.settle(Tier::Provider, remote, outcome) {
                        return Ok(result);
                    }
                }
            }
        }

        let item = self.local.select_item(context, &self.corpus).clone();
        info!(
            tier = "local",
            item_id = %item.id,
            primary_tag = %context.primary_tag,
            "Selection served"
        );
        Ok(SelectionResult {
            item,
            served_by: Tier::Local,
        })
    }

    /// The tier, if configured and not flagged this session.
    fn remote(&self, tier: Tier) -> Option<&RemoteTier> {
        let remote = match tier {
            Tier::Retrieval => self.retrieval.as_ref(),
            Tier::Provider => self.provider.as_ref(),
            Tier::Local => None,
        }?;
        if self.session.is_unavailable(tier) {
            debug!(tier = %tier, "Skipping tier flagged unavailable this session");
            return None;
        }
        Some(remote)
    }

    async fn try_retrieval(
        &self,
        remote: &RemoteTier,
        context: &Context,
    ) -> Result<Item, SelectError> {
        if self.probe_retrieval && !self.session.retrieval_probed() {
            let probe = remote.selector.probe();
            let healthy = match tokio::time::timeout(remote.timeout, probe).await {
                Ok(result) => result?,
                Err(_) => return Err(timed_out(remote)),
            };
            if !healthy {
                return Err(SelectError::Unavailable("retrieval health probe failed".into()));
            }
            self.session.mark_retrieval_probed();
        }

        self.call(remote, context, self.corpus.items()).await
    }

    async fn call(
        &self,
        remote: &RemoteTier,
        context: &Context,
        candidates: &[Item],
    ) -> Result<Item, SelectError> {
        debug!(
            selector = remote.selector.name(),
            candidates = candidates.len(),
            "Trying remote selector"
        );

        let request = remote.selector.select_item(context, candidates);
        let item = match tokio::time::timeout(remote.timeout, request).await {
            Ok(result) => result?,
            Err(_) => return Err(timed_out(remote)),
        };

        if !self.corpus.contains(&item.id) {
            return Err(SelectError::MalformedResponse(format!(
                "'{}' is not a corpus item",
                item.id
            )));
        }
        Ok(item)
    }

    /// Turn one tier attempt into a result, or flag the tier and continue.
    fn settle(
        &self,
        tier: Tier,
        remote: &RemoteTier,
        outcome: Result<Item, SelectError>,
    ) -> Option<SelectionResult> {
        match outcome {
            Ok(item) => {
                info!(
                    tier = %tier,
                    selector = remote.selector.name(),
                    item_id = %item.id,
                    "Selection served"
                );
                Some(SelectionResult { item, served_by: tier })
            }
            Err(err) => {
                warn!(
                    tier = %tier,
                    selector = remote.selector.name(),
                    kind = err.kind(),
                    error = %err,
                    "Tier failed, marking unavailable for this session"
                );
                self.session.mark_unavailable(tier);
                None
            }
        }
    }
}

fn timed_out(remote: &RemoteTier) -> SelectError {
    SelectError::Transport(format!(
        "{} timed out after {:?}",
        remote.selector.name(),
        remote.timeout
    ))
}

fn cancelled(tier: Tier) -> Error {
    debug!(tier = %tier, "Selection cancelled");
    Error::Cancelled
}

/// The provider's candidate list: items passing the local filter first, in
/// corpus order, then the rest, truncated to `max`.
pub fn bound_candidates(corpus: &Corpus, context: &Context, max: usize) -> Vec<Item> {
    let (mut preferred, rest): (Vec<&Item>, Vec<&Item>) =
        corpus.iter().partition(|item| local::matches(item, context));
    preferred.extend(rest);
    preferred.into_iter().take(max).cloned().collect()
}
