//! PostgreSQL implementation of SeatProvider and DecisionProvider.
//!
//! Reads the `mp`, `voting` and `vote` tables written by the sync pipeline
//! and aggregates individual MP votes into per-party decisions.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::analysis::{PartyDecision, SeatMap};
use crate::domain::foundation::TermId;
use crate::ports::{DecisionProvider, ProviderError, SeatProvider};

/// Read-only access to synced vote data.
#[derive(Clone)]
pub struct PostgresVoteDataReader {
    pool: PgPool,
}

impl PostgresVoteDataReader {
    /// Creates a new PostgresVoteDataReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClubSeatsRow {
    club: String,
    seats: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PartyTallyRow {
    voting_id: String,
    club: String,
    yes: i64,
    no: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SequenceRow {
    club: String,
    decision: String,
}

#[derive(Debug, sqlx::FromRow)]
struct TermRow {
    term_id: i32,
}

impl TryFrom<TermRow> for TermId {
    type Error = ProviderError;

    fn try_from(row: TermRow) -> Result<Self, Self::Error> {
        TermId::new(row.term_id).map_err(|e| ProviderError::InvalidData(e.to_string()))
    }
}

fn to_count(value: i64, what: &str) -> Result<u32, ProviderError> {
    u32::try_from(value)
        .map_err(|_| ProviderError::InvalidData(format!("{} out of range: {}", what, value)))
}

impl TryFrom<PartyTallyRow> for PartyDecision {
    type Error = ProviderError;

    fn try_from(row: PartyTallyRow) -> Result<Self, Self::Error> {
        Ok(PartyDecision::from_tally(
            row.voting_id,
            row.club,
            to_count(row.yes, "yes count")?,
            to_count(row.no, "no count")?,
        ))
    }
}

#[async_trait]
impl SeatProvider for PostgresVoteDataReader {
    async fn get_parties(&self, term_id: TermId) -> Result<SeatMap, ProviderError> {
        let rows: Vec<ClubSeatsRow> = sqlx::query_as(
            r#"
            SELECT club, COUNT(*) AS seats
            FROM mp
            WHERE term_id = $1 AND club IS NOT NULL
            GROUP BY club
            "#,
        )
        .bind(term_id.value())
        .fetch_all(&self.pool)
        .await?;

        let mut seats = SeatMap::new();
        for row in rows {
            let count = to_count(row.seats, "seat count")?;
            seats
                .insert(row.club, count)
                .map_err(|e| ProviderError::InvalidData(e.to_string()))?;
        }

        debug!(term_id = %term_id, parties = seats.len(), "Loaded seat distribution");
        Ok(seats)
    }

    async fn list_terms(&self) -> Result<Vec<TermId>, ProviderError> {
        let rows: Vec<TermRow> = sqlx::query_as(
            r#"
            SELECT DISTINCT term_id
            FROM mp
            ORDER BY term_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TermId::try_from).collect()
    }
}

#[async_trait]
impl DecisionProvider for PostgresVoteDataReader {
    async fn get_party_decisions(&self, term_id: TermId) -> Result<Vec<PartyDecision>, ProviderError> {
        let rows: Vec<PartyTallyRow> = sqlx::query_as(
            r#"
            SELECT v.voting_id::text AS voting_id,
                   v.club,
                   SUM(CASE WHEN v.vote = 'YES' THEN 1 ELSE 0 END) AS yes,
                   SUM(CASE WHEN v.vote = 'NO' THEN 1 ELSE 0 END) AS no
            FROM vote v
            JOIN voting vt ON v.voting_id = vt.id
            WHERE vt.term_id = $1 AND v.club IS NOT NULL
            GROUP BY v.voting_id, v.club
            "#,
        )
        .bind(term_id.value())
        .fetch_all(&self.pool)
        .await?;

        let decisions = rows
            .into_iter()
            .map(PartyDecision::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(term_id = %term_id, decisions = decisions.len(), "Loaded party decisions");
        Ok(decisions)
    }

    async fn get_vote_sequences(
        &self,
        term_id: TermId,
    ) -> Result<BTreeMap<String, Vec<String>>, ProviderError> {
        let rows: Vec<SequenceRow> = sqlx::query_as(
            r#"
            SELECT v.club,
                   CASE WHEN SUM(CASE WHEN v.vote = 'YES' THEN 1 ELSE 0 END) >
                             SUM(CASE WHEN v.vote = 'NO' THEN 1 ELSE 0 END)
                        THEN 'YES' ELSE 'NO' END AS decision
            FROM vote v
            JOIN voting vt ON v.voting_id = vt.id
            WHERE vt.term_id = $1 AND v.club IS NOT NULL
            GROUP BY v.club, vt.id, vt.date
            ORDER BY v.club, vt.date, vt.id
            "#,
        )
        .bind(term_id.value())
        .fetch_all(&self.pool)
        .await?;

        let mut sequences: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in rows {
            sequences.entry(row.club).or_default().push(row.decision);
        }

        debug!(term_id = %term_id, parties = sequences.len(), "Loaded vote sequences");
        Ok(sequences)
    }

    async fn count_votings(&self, term_id: TermId) -> Result<u64, ProviderError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voting WHERE term_id = $1")
            .bind(term_id.value())
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count)
            .map_err(|_| ProviderError::InvalidData(format!("voting count out of range: {}", count)))
    }

    async fn terms_with_votes(&self) -> Result<BTreeSet<TermId>, ProviderError> {
        let rows: Vec<TermRow> = sqlx::query_as("SELECT DISTINCT term_id FROM voting")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TermId::try_from).collect()
    }
}
