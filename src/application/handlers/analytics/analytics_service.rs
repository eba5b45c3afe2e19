//! AnalyticsService - Compute-once access to the metrics of a term.
//!
//! Every metric is read from the `AnalyticsCache` when present. On a miss the
//! matching calculator runs over data from the vote data ports, and the
//! serialized result is stored under `(term_id, metric key)`. Entries never
//! expire here; callers clear a term after its vote data changes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AnalyticsConfig;
use crate::domain::analysis::{
    AgreementMatrix, AgreementMatrixBuilder, CoalitionFinder, CoalitionRecord, CohesionCalculator,
    CohesionResult, MarkovResult, PartyDecision, PowerIndexCalculator, PowerIndexResult, SeatMap,
    SequenceAnalyzer, TermList, TermOverview,
};
use crate::domain::foundation::TermId;
use crate::ports::{
    AnalyticsCache, CacheEntry, CacheError, DecisionProvider, MetricKey, ProviderError,
    SeatProvider,
};

/// Errors surfaced by the analytics application layer
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to serialize metric: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// True when a write was attempted through a read-only cache handle.
    pub fn is_write_not_permitted(&self) -> bool {
        matches!(self, AnalyticsError::Cache(CacheError::WriteNotPermitted(_)))
    }
}

/// Memoizing front of the analysis calculators.
pub struct AnalyticsService {
    seats: Arc<dyn SeatProvider>,
    decisions: Arc<dyn DecisionProvider>,
    cache: Arc<dyn AnalyticsCache>,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(
        seats: Arc<dyn SeatProvider>,
        decisions: Arc<dyn DecisionProvider>,
        cache: Arc<dyn AnalyticsCache>,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            seats,
            decisions,
            cache,
            config,
        }
    }

    /// Returns the cached value of `key`, or runs `compute` and caches its result.
    ///
    /// An entry that no longer deserializes into `T` is treated as a miss.
    ///
    /// # Errors
    /// On a miss through a read-only cache handle, fails with
    /// `CacheError::WriteNotPermitted` before `compute` runs.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        term_id: TermId,
        key: MetricKey,
        compute: F,
    ) -> Result<T, AnalyticsError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AnalyticsError>>,
    {
        if let Some(data) = self.cache.get(term_id, key.as_str()).await? {
            match serde_json::from_value::<T>(data) {
                Ok(value) => {
                    debug!(term_id = %term_id, key = %key, "Analytics cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(
                    term_id = %term_id,
                    key = %key,
                    error = %e,
                    "Discarding unreadable analytics cache entry"
                ),
            }
        }

        self.cache.access().ensure_writable("write")?;

        info!(term_id = %term_id, key = %key, "Computing analytics");
        let value = compute().await?;
        self.cache
            .set(term_id, key.as_str(), serde_json::to_value(&value)?)
            .await?;
        debug!(term_id = %term_id, key = %key, "Saved analytics to cache");

        Ok(value)
    }

    /// Shapley-Shubik and Banzhaf indices per party, strongest first.
    pub async fn power_indices(&self, term_id: TermId) -> Result<Vec<PowerIndexResult>, AnalyticsError> {
        self.get_or_compute(term_id, MetricKey::PowerIndices, || async move {
            let seats = self.load_seats(term_id).await?;
            Ok(PowerIndexCalculator::compute(&seats))
        })
        .await
    }

    /// Average Rice index per party, most cohesive first.
    pub async fn cohesion(&self, term_id: TermId) -> Result<Vec<CohesionResult>, AnalyticsError> {
        self.get_or_compute(term_id, MetricKey::Cohesion, || async move {
            let decisions = self.load_decisions(term_id).await?;
            Ok(CohesionCalculator::by_party(&decisions))
        })
        .await
    }

    /// Momentum and volatility of parties with long enough vote sequences.
    pub async fn markov(&self, term_id: TermId) -> Result<Vec<MarkovResult>, AnalyticsError> {
        self.get_or_compute(term_id, MetricKey::Markov, || async move {
            let sequences = self.load_sequences(term_id).await?;
            Ok(SequenceAnalyzer::analyze(
                &sequences,
                self.config.min_sequence_length,
            ))
        })
        .await
    }

    /// Minimal winning coalitions, smallest surplus first.
    ///
    /// At most `coalition_display_limit` records are stored and returned.
    pub async fn coalitions(&self, term_id: TermId) -> Result<Vec<CoalitionRecord>, AnalyticsError> {
        self.get_or_compute(term_id, MetricKey::Coalitions, || async move {
            let seats = self.load_seats(term_id).await?;
            let Some(quota) = seats.quota() else {
                return Ok(Vec::new());
            };

            let mut coalitions =
                CoalitionFinder::search(&seats, quota, self.config.coalition_search());
            coalitions.truncate(self.config.coalition_display_limit);

            Ok(coalitions.into_iter().map(CoalitionRecord::from).collect())
        })
        .await
    }

    /// Pairwise agreement between the parties of the chamber.
    ///
    /// Falls back to the parties named in the decisions when the term has no
    /// seat data.
    pub async fn agreement_matrix(&self, term_id: TermId) -> Result<AgreementMatrix, AnalyticsError> {
        self.get_or_compute(term_id, MetricKey::AgreementMatrix, || async move {
            let (seats, decisions) =
                futures::try_join!(self.load_seats(term_id), self.load_decisions(term_id))?;

            let parties: Vec<String> = if seats.is_empty() {
                decisions
                    .iter()
                    .map(|d| d.party.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            } else {
                seats.parties().map(str::to_string).collect()
            };

            Ok(AgreementMatrixBuilder::build(&parties, &decisions))
        })
        .await
    }

    /// Headline counts of a term. Cheap, so never cached.
    pub async fn overview(&self, term_id: TermId) -> Result<TermOverview, AnalyticsError> {
        let (seats, votings) = futures::try_join!(self.load_seats(term_id), async {
            Ok::<_, AnalyticsError>(self.decisions.count_votings(term_id).await?)
        })?;
        Ok(TermOverview::new(term_id, &seats, votings))
    }

    /// Known terms, newest first. Never cached.
    pub async fn terms(&self) -> Result<TermList, AnalyticsError> {
        let (terms, with_votes) = futures::try_join!(
            self.seats.list_terms(),
            self.decisions.terms_with_votes()
        )?;
        debug!(terms = terms.len(), "Listed terms");
        Ok(TermList::new(terms, &with_votes))
    }

    /// Ensures all five metrics of a term are cached.
    ///
    /// Metrics write distinct keys and run concurrently. Repeat calls are
    /// served from the cache.
    pub async fn precompute_all(&self, term_id: TermId) -> Result<(), AnalyticsError> {
        info!(term_id = %term_id, "Precomputing analytics");

        futures::try_join!(
            self.power_indices(term_id),
            self.cohesion(term_id),
            self.markov(term_id),
            self.coalitions(term_id),
            self.agreement_matrix(term_id),
        )?;

        info!(term_id = %term_id, metrics = MetricKey::ALL.len(), "Analytics precomputed");
        Ok(())
    }

    /// Drops every cached metric of a term.
    pub async fn invalidate(&self, term_id: TermId) -> Result<(), AnalyticsError> {
        self.cache.clear(Some(term_id)).await?;
        info!(term_id = %term_id, "Cleared analytics cache");
        Ok(())
    }

    /// Whether any metric of the term is cached.
    pub async fn is_cached(&self, term_id: TermId) -> Result<bool, AnalyticsError> {
        Ok(self.cache.exists(term_id).await?)
    }

    /// Reads a cached metric without computing it.
    pub async fn cached(
        &self,
        term_id: TermId,
        key: MetricKey,
    ) -> Result<Option<CacheEntry>, AnalyticsError> {
        Ok(self.cache.get_entry(term_id, key.as_str()).await?)
    }

    async fn load_seats(&self, term_id: TermId) -> Result<SeatMap, AnalyticsError> {
        let seats = self.seats.get_parties(term_id).await?;
        if seats.is_empty() {
            warn!(term_id = %term_id, "No seat data for term");
        }
        Ok(seats)
    }

    async fn load_decisions(&self, term_id: TermId) -> Result<Vec<PartyDecision>, AnalyticsError> {
        let decisions = self.decisions.get_party_decisions(term_id).await?;
        if decisions.is_empty() {
            warn!(term_id = %term_id, "No party decisions for term");
        }
        Ok(decisions)
    }

    async fn load_sequences(
        &self,
        term_id: TermId,
    ) -> Result<BTreeMap<String, Vec<String>>, AnalyticsError> {
        let sequences = self.decisions.get_vote_sequences(term_id).await?;
        if sequences.is_empty() {
            warn!(term_id = %term_id, "No vote sequences for term");
        }
        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryAnalyticsCache, InMemoryVoteData};
    use crate::domain::analysis::Decision;
    use crate::ports::CacheAccess;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn term() -> TermId {
        TermId::new(10).unwrap()
    }

    fn chamber() -> SeatMap {
        SeatMap::from_pairs([("A", 200), ("B", 150), ("C", 100), ("D", 10)]).unwrap()
    }

    fn decisions() -> Vec<PartyDecision> {
        vec![
            PartyDecision::from_tally("v1", "A", 190, 5),
            PartyDecision::from_tally("v1", "B", 140, 8),
            PartyDecision::from_tally("v1", "C", 10, 85),
            PartyDecision::from_tally("v2", "A", 180, 10),
            PartyDecision::from_tally("v2", "B", 20, 120),
            PartyDecision::from_tally("v2", "C", 5, 90),
        ]
    }

    fn sequences() -> BTreeMap<String, Vec<String>> {
        let steady: Vec<String> = std::iter::repeat("YES".to_string()).take(12).collect();
        let flipping: Vec<String> = ["YES", "NO"]
            .iter()
            .cycle()
            .take(12)
            .map(|s| s.to_string())
            .collect();
        let short = vec!["NO".to_string(); 3];
        BTreeMap::from([
            ("A".to_string(), steady),
            ("B".to_string(), flipping),
            ("D".to_string(), short),
        ])
    }

    fn vote_data() -> InMemoryVoteData {
        InMemoryVoteData::new()
            .with_seats(term(), chamber())
            .with_decisions(term(), decisions())
            .with_sequences(term(), sequences())
    }

    fn service_with(data: InMemoryVoteData, cache: InMemoryAnalyticsCache) -> AnalyticsService {
        let data = Arc::new(data);
        AnalyticsService::new(
            data.clone(),
            data,
            Arc::new(cache),
            AnalyticsConfig::default(),
        )
    }

    #[tokio::test]
    async fn get_or_compute_runs_compute_once() {
        let cache = InMemoryAnalyticsCache::new();
        let service = service_with(vote_data(), cache);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        for _ in 0..3 {
            let value: Vec<u32> = service
                .get_or_compute(term(), MetricKey::Cohesion, || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(value, vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute() {
        let service = service_with(vote_data(), InMemoryAnalyticsCache::new());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let compute = || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(42u32)
        };

        service.get_or_compute(term(), MetricKey::Markov, compute).await.unwrap();
        service.invalidate(term()).await.unwrap();
        service.get_or_compute(term(), MetricKey::Markov, compute).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unreadable_entry_is_recomputed() {
        let cache = InMemoryAnalyticsCache::new();
        cache
            .set(term(), "cohesion", serde_json::json!({"not": "a list"}))
            .await
            .unwrap();
        let service = service_with(vote_data(), cache);

        let cohesion = service.cohesion(term()).await.unwrap();
        assert_eq!(cohesion.len(), 3);
    }

    #[tokio::test]
    async fn read_only_cache_serves_hits_and_rejects_misses() {
        let writable = InMemoryAnalyticsCache::new();
        let reader = writable.read_only_view();
        service_with(vote_data(), writable)
            .power_indices(term())
            .await
            .unwrap();

        let service = service_with(vote_data(), reader);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let power = service.power_indices(term()).await.unwrap();
        assert_eq!(power.len(), 4);

        let err = service
            .get_or_compute(term(), MetricKey::Markov, || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(0u32)
            })
            .await
            .unwrap_err();
        assert!(err.is_write_not_permitted());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn precompute_all_fills_every_key() {
        let cache = InMemoryAnalyticsCache::new();
        let service = service_with(vote_data(), cache.clone());

        service.precompute_all(term()).await.unwrap();

        for key in MetricKey::ALL {
            assert!(
                cache.get(term(), key.as_str()).await.unwrap().is_some(),
                "missing {}",
                key
            );
        }
        assert_eq!(cache.entry_count().await, 5);
    }

    #[tokio::test]
    async fn precompute_all_is_idempotent() {
        let data = vote_data();
        let service = service_with(data.clone(), InMemoryAnalyticsCache::new());

        service.precompute_all(term()).await.unwrap();
        let reads_after_first = data.read_count();
        service.precompute_all(term()).await.unwrap();

        assert!(reads_after_first > 0);
        assert_eq!(data.read_count(), reads_after_first);
    }

    #[tokio::test]
    async fn coalitions_for_example_chamber() {
        let service = service_with(vote_data(), InMemoryAnalyticsCache::new());

        let coalitions = service.coalitions(term()).await.unwrap();
        let sets: Vec<Vec<String>> = coalitions.iter().map(|c| c.parties.clone()).collect();

        assert!(sets.contains(&vec!["A".to_string(), "B".to_string()]));
        assert!(sets.contains(&vec!["A".to_string(), "C".to_string()]));
        assert!(!sets.contains(&vec!["A".to_string(), "B".to_string(), "C".to_string()]));
        assert!(coalitions.iter().all(|c| c.seats >= 231));
        assert!(coalitions.windows(2).all(|w| w[0].surplus <= w[1].surplus));
    }

    #[tokio::test]
    async fn coalitions_respect_display_limit() {
        let data = Arc::new(vote_data());
        let config = AnalyticsConfig {
            coalition_display_limit: 1,
            ..Default::default()
        };
        let service = AnalyticsService::new(
            data.clone(),
            data,
            Arc::new(InMemoryAnalyticsCache::new()),
            config,
        );

        let coalitions = service.coalitions(term()).await.unwrap();
        assert_eq!(coalitions.len(), 1);
        assert_eq!(coalitions[0].surplus, 19);
    }

    #[tokio::test]
    async fn markov_skips_short_sequences() {
        let service = service_with(vote_data(), InMemoryAnalyticsCache::new());

        let markov = service.markov(term()).await.unwrap();
        let parties: Vec<&str> = markov.iter().map(|m| m.party.as_str()).collect();

        assert_eq!(parties, vec!["A", "B"]);
        assert_eq!(markov[0].momentum, 0.5);
        assert_eq!(markov[1].volatility, 1.0);
    }

    #[tokio::test]
    async fn agreement_matrix_covers_chamber() {
        let service = service_with(vote_data(), InMemoryAnalyticsCache::new());

        let matrix = service.agreement_matrix(term()).await.unwrap();

        assert_eq!(matrix.len(), 4);
        assert_eq!(matrix.get("A", "A"), Some(100.0));
        assert_eq!(matrix.get("A", "B"), Some(50.0));
        assert_eq!(matrix.get("A", "D"), Some(0.0));
        assert_eq!(decisions()[2].decision, Decision::No);
    }

    #[tokio::test]
    async fn missing_term_yields_empty_metrics() {
        let service = service_with(InMemoryVoteData::new(), InMemoryAnalyticsCache::new());
        let unknown = TermId::new(99).unwrap();

        assert!(service.power_indices(unknown).await.unwrap().is_empty());
        assert!(service.coalitions(unknown).await.unwrap().is_empty());
        assert!(service.cohesion(unknown).await.unwrap().is_empty());
        assert!(service.markov(unknown).await.unwrap().is_empty());
        assert!(service.agreement_matrix(unknown).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overview_counts_term() {
        let service = service_with(vote_data(), InMemoryAnalyticsCache::new());

        let overview = service.overview(term()).await.unwrap();

        assert_eq!(overview.parties_count, 4);
        assert_eq!(overview.total_seats, 460);
        assert_eq!(overview.quota, Some(231));
        assert_eq!(overview.votings_count, 2);
    }

    #[tokio::test]
    async fn overview_counts_votes_without_party_decisions() {
        let data = vote_data().with_voting_count(term(), 7);
        let service = service_with(data, InMemoryAnalyticsCache::new());

        let overview = service.overview(term()).await.unwrap();

        assert_eq!(overview.votings_count, 7);
    }

    #[tokio::test]
    async fn terms_lists_newest_first_with_current() {
        let data = vote_data()
            .with_seats(TermId::new(9).unwrap(), chamber())
            .with_voting_count(TermId::new(9).unwrap(), 0);
        let service = service_with(data, InMemoryAnalyticsCache::new());

        let list = service.terms().await.unwrap();

        assert_eq!(list.current, Some(term()));
        let items: Vec<(i32, bool)> = list
            .items
            .iter()
            .map(|t| (t.id.value(), t.has_voting_data))
            .collect();
        assert_eq!(items, vec![(10, true), (9, false)]);
    }

    #[tokio::test]
    async fn cached_never_computes() {
        let service = service_with(vote_data(), InMemoryAnalyticsCache::new());

        assert!(service.cached(term(), MetricKey::Cohesion).await.unwrap().is_none());
        service.cohesion(term()).await.unwrap();

        let entry = service.cached(term(), MetricKey::Cohesion).await.unwrap().unwrap();
        assert_eq!(entry.key, "cohesion");
        assert_eq!(entry.term_id, term());
    }

    #[test]
    fn write_not_permitted_is_detected() {
        let err = AnalyticsError::from(CacheAccess::ReadOnly.ensure_writable("clear").unwrap_err());
        assert!(err.is_write_not_permitted());
    }
}
