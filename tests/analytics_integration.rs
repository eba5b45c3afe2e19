//! Integration tests for the analytics pipeline.
//!
//! Drives the public API end to end with the in-memory and file adapters:
//! vote data in, precompute, read back through a read-only cache handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use sejm_analytics::adapters::{FileAnalyticsCache, InMemoryAnalyticsCache, InMemoryVoteData};
use sejm_analytics::application::{
    AnalyticsService, ClearAnalyticsCommand, ClearAnalyticsHandler, PrecomputeAnalyticsCommand,
    PrecomputeAnalyticsHandler,
};
use sejm_analytics::config::AnalyticsConfig;
use sejm_analytics::domain::analysis::{
    CoalitionRecord, MarkovResult, PartyDecision, PowerIndexResult, SeatMap,
};
use sejm_analytics::domain::foundation::TermId;
use sejm_analytics::ports::{AnalyticsCache, CacheAccess, MetricKey};

fn term() -> TermId {
    TermId::new(10).unwrap()
}

fn vote_data() -> InMemoryVoteData {
    let seats = SeatMap::from_pairs([("A", 200), ("B", 150), ("C", 100), ("D", 10)]).unwrap();

    let mut decisions = Vec::new();
    for i in 0..12 {
        let voting = format!("v{i}");
        decisions.push(PartyDecision::from_tally(&voting, "A", 195, 5));
        decisions.push(PartyDecision::from_tally(&voting, "B", 75, 75));
        let (yes, no) = if i % 2 == 0 { (90, 10) } else { (10, 90) };
        decisions.push(PartyDecision::from_tally(&voting, "C", yes, no));
    }

    let mut sequences: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for d in &decisions {
        sequences
            .entry(d.party.clone())
            .or_default()
            .push(d.decision.to_string());
    }

    InMemoryVoteData::new()
        .with_seats(term(), seats)
        .with_decisions(term(), decisions)
        .with_sequences(term(), sequences)
}

fn service(data: &InMemoryVoteData, cache: Arc<dyn AnalyticsCache>) -> AnalyticsService {
    let data = Arc::new(data.clone());
    AnalyticsService::new(data.clone(), data, cache, AnalyticsConfig::default())
}

fn party_sets(coalitions: &[CoalitionRecord]) -> Vec<Vec<&str>> {
    coalitions
        .iter()
        .map(|c| c.parties.iter().map(String::as_str).collect())
        .collect()
}

#[tokio::test]
async fn precompute_then_serve_from_read_only_handle() {
    let data = vote_data();
    let writer = InMemoryAnalyticsCache::new();
    let reader = writer.read_only_view();

    let handler = PrecomputeAnalyticsHandler::new(Arc::new(service(&data, Arc::new(writer))));
    handler
        .handle(PrecomputeAnalyticsCommand {
            term_id: term(),
            force: false,
        })
        .await
        .unwrap();
    let reads = data.read_count();

    let query = service(&data, Arc::new(reader));

    let power: Vec<PowerIndexResult> = query.power_indices(term()).await.unwrap();
    assert_eq!(power[0].party, "A");
    let shapley: f64 = power.iter().map(|p| p.shapley).sum();
    let banzhaf: f64 = power.iter().map(|p| p.banzhaf).sum();
    assert!((shapley - 1.0).abs() < 1e-6);
    assert!((banzhaf - 1.0).abs() < 1e-6);
    let d = power.iter().find(|p| p.party == "D").unwrap();
    assert_eq!(d.shapley, 0.0);

    let coalitions = query.coalitions(term()).await.unwrap();
    let sets = party_sets(&coalitions);
    assert!(sets.contains(&vec!["A", "B"]));
    assert!(sets.contains(&vec!["A", "C"]));
    assert!(!sets.contains(&vec!["A", "B", "C"]));

    let cohesion = query.cohesion(term()).await.unwrap();
    assert_eq!(cohesion[0].party, "A");
    assert_eq!(cohesion[0].rice_index, 0.95);
    let b = cohesion.iter().find(|c| c.party == "B").unwrap();
    assert_eq!(b.rice_index, 0.0);

    let markov: Vec<MarkovResult> = query.markov(term()).await.unwrap();
    let c = markov.iter().find(|m| m.party == "C").unwrap();
    assert_eq!(c.volatility, 1.0);
    assert_eq!(c.momentum, 0.0);

    let matrix = query.agreement_matrix(term()).await.unwrap();
    assert_eq!(matrix.get("A", "A"), Some(100.0));
    assert_eq!(matrix.get("A", "C"), Some(50.0));
    assert_eq!(matrix.get("A", "B"), Some(0.0));
    assert_eq!(matrix.get("C", "D"), Some(0.0));

    // Every read above was a cache hit
    assert_eq!(data.read_count(), reads);
}

#[tokio::test]
async fn file_cache_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let data = vote_data();

    let writer = Arc::new(FileAnalyticsCache::new(dir.path(), CacheAccess::ReadWrite));
    service(&data, writer).precompute_all(term()).await.unwrap();

    let reopened = Arc::new(FileAnalyticsCache::new(dir.path(), CacheAccess::ReadOnly));
    for key in MetricKey::ALL {
        assert!(reopened.get(term(), key.as_str()).await.unwrap().is_some());
    }

    let reads = data.read_count();
    let coalitions = service(&data, reopened.clone())
        .coalitions(term())
        .await
        .unwrap();
    assert_eq!(coalitions[0].surplus, 19);
    assert_eq!(data.read_count(), reads);

    assert!(reopened.clear(Some(term())).await.is_err());
}

#[tokio::test]
async fn corrupt_cache_file_is_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let term_dir = dir.path().join("term_10");
    std::fs::create_dir_all(&term_dir).unwrap();
    std::fs::write(term_dir.join("cohesion.json"), b"{\"term_id\": 10, \"key\": ").unwrap();
    std::fs::write(dir.path().join("sync_state.db"), b"state").unwrap();

    let data = vote_data();
    let cache = Arc::new(FileAnalyticsCache::new(dir.path(), CacheAccess::ReadWrite));
    let svc = service(&data, cache.clone());

    svc.precompute_all(term()).await.unwrap();
    let cohesion = svc.cohesion(term()).await.unwrap();
    assert_eq!(cohesion[0].party, "A");

    cache.clear(None).await.unwrap();
    assert!(!cache.exists(term()).await.unwrap());
    assert!(dir.path().join("sync_state.db").exists());
}

#[tokio::test]
async fn clear_after_sync_recomputes_on_next_precompute() {
    let data = vote_data();
    let cache = InMemoryAnalyticsCache::new();
    let svc = Arc::new(service(&data, Arc::new(cache.clone())));
    let precompute = PrecomputeAnalyticsHandler::new(svc);
    let clear = ClearAnalyticsHandler::new(Arc::new(cache.clone()));
    let cmd = PrecomputeAnalyticsCommand {
        term_id: term(),
        force: false,
    };

    precompute.handle(cmd.clone()).await.unwrap();
    let first = data.read_count();

    clear
        .handle(ClearAnalyticsCommand {
            term_id: Some(term()),
        })
        .await
        .unwrap();
    assert!(!cache.exists(term()).await.unwrap());

    let result = precompute.handle(cmd).await.unwrap();
    assert!(!result.was_cached);
    assert_eq!(data.read_count(), first * 2);
    assert_eq!(cache.entry_count().await, 5);
}

#[tokio::test]
async fn empty_term_produces_empty_metrics() {
    let data = InMemoryVoteData::new();
    let cache = InMemoryAnalyticsCache::new();
    let svc = service(&data, Arc::new(cache.clone()));
    let empty = TermId::new(1).unwrap();

    svc.precompute_all(empty).await.unwrap();

    assert_eq!(cache.get(empty, "power_indices").await.unwrap(), Some(serde_json::json!([])));
    assert_eq!(cache.get(empty, "coalitions").await.unwrap(), Some(serde_json::json!([])));
    assert_eq!(cache.get(empty, "agreement_matrix").await.unwrap(), Some(serde_json::json!({})));

    let overview = svc.overview(empty).await.unwrap();
    assert!(!overview.has_seat_data());
    assert_eq!(overview.quota, None);
}
