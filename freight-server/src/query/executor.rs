//! Query pipeline.
//!
//! Stages run in a fixed order: join, base filters, origin view, destination
//! view, re-join of the two views, date filters. Each call builds its own
//! intermediate relations; the shared store is only read.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::dataset::DatasetStore;
use crate::domain::LoadId;

use super::cancel::CancelFlag;
use super::filter::{Predicate, SearchFilters, ValidationError, matches_all, retain_matching};
use super::join::{JoinError, JoinedRecord, JoinedRelation, inner_join};
use super::roles::{DestinationRule, Role, RouteRoles};

/// Pipeline stage, for logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Join,
    Base,
    Origin,
    Destination,
    Rejoin,
    Dates,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Join => "join",
            Stage::Base => "base filters",
            Stage::Origin => "origin filters",
            Stage::Destination => "destination filters",
            Stage::Rejoin => "origin/destination re-join",
            Stage::Dates => "date filters",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from query execution.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The join stage hit a structural fault
    #[error("join stage failed: {0}")]
    Join(#[from] JoinError),

    /// The caller abandoned the query
    #[error("query cancelled after {0}")]
    Cancelled(Stage),

    /// The task running the query failed
    #[error("query task failed: {0}")]
    Task(String),
}

/// Tunables for query execution.
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    /// How destination stops are chosen.
    pub destination_rule: DestinationRule,
}

/// Rows matching a query, plus how long it took.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Matching rows, in join order.
    pub rows: JoinedRelation,

    /// Wall-clock time spent executing.
    pub elapsed: Duration,

    /// Filters skipped because their value was invalid.
    pub skipped: Vec<ValidationError>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Runs searches against a shared, immutable dataset store.
#[derive(Debug)]
pub struct QueryExecutor {
    store: Arc<DatasetStore>,
    config: QueryConfig,
}

impl QueryExecutor {
    /// Create a new executor.
    pub fn new(store: Arc<DatasetStore>, config: QueryConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Run a search.
    ///
    /// An empty result is a success. Invalid date filters are skipped and
    /// reported in [`QueryResult::skipped`].
    pub fn execute(
        &self,
        filters: &SearchFilters,
        cancel: &CancelFlag,
    ) -> Result<QueryResult, QueryError> {
        let started = Instant::now();
        info!(?filters, "Search initiated");

        let plan = filters.compose();
        for skipped in &plan.skipped {
            warn!(
                field = skipped.field,
                value = %skipped.value,
                "Skipping invalid date filter"
            );
        }
        if plan.is_empty() {
            debug!("No active filters");
        }

        let joined = inner_join(self.store.postings(), self.store.stops())?;
        log_stage(Stage::Join, &[], self.store.stop_count(), joined.len());
        checkpoint(cancel, Stage::Join)?;

        let before = joined.len();
        let base = retain_matching(joined, &plan.base);
        log_stage(Stage::Base, &plan.base, before, base.len());
        checkpoint(cancel, Stage::Base)?;

        let roles = RouteRoles::resolve(&base, self.config.destination_rule);

        let origin = role_view(&base, &roles, Role::Origin, &plan.origin);
        if let Some(rows) = &origin {
            log_stage(Stage::Origin, &plan.origin, base.len(), rows.len());
        }
        checkpoint(cancel, Stage::Origin)?;

        let destination = role_view(&base, &roles, Role::Destination, &plan.destination);
        if let Some(rows) = &destination {
            log_stage(Stage::Destination, &plan.destination, base.len(), rows.len());
        }
        checkpoint(cancel, Stage::Destination)?;

        let rejoined = rejoin(&base, origin.as_deref(), destination.as_deref());
        log_stage(Stage::Rejoin, &[], base.len(), rejoined.len());
        checkpoint(cancel, Stage::Rejoin)?;

        let before = rejoined.len();
        let constrained = |role| match role {
            Role::Origin => origin.is_some(),
            Role::Destination => destination.is_some(),
        };
        let rows = date_stage(&base, &roles, rejoined, &plan.dates, constrained);
        log_stage(Stage::Dates, &plan.dates, before, rows.len());

        let elapsed = started.elapsed();
        info!(
            rows = rows.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(QueryResult {
            rows,
            elapsed,
            skipped: plan.skipped,
        })
    }
}

fn log_stage(stage: Stage, predicates: &[Predicate], rows_in: usize, rows_out: usize) {
    let labels: Vec<String> = predicates.iter().map(Predicate::label).collect();
    debug!(
        stage = stage.as_str(),
        predicates = ?labels,
        rows_in,
        rows_out,
        "Stage complete"
    );
}

fn checkpoint(cancel: &CancelFlag, stage: Stage) -> Result<(), QueryError> {
    if cancel.is_cancelled() {
        debug!(stage = stage.as_str(), "Search cancelled");
        return Err(QueryError::Cancelled(stage));
    }
    Ok(())
}

/// Rows of a role view that satisfy the role's predicates.
///
/// `None` means the role is unconstrained.
fn role_view(
    base: &[JoinedRecord],
    roles: &RouteRoles<'_>,
    role: Role,
    predicates: &[Predicate],
) -> Option<Vec<usize>> {
    if predicates.is_empty() {
        return None;
    }
    let rows = roles
        .view(role)
        .into_iter()
        .filter(|&idx| matches_all(predicates, &base[idx]))
        .collect();
    Some(rows)
}

fn loads_of<'a>(base: &'a [JoinedRecord], rows: &[usize]) -> HashSet<&'a LoadId> {
    rows.iter().map(|&idx| base[idx].load_id()).collect()
}

/// Combine the origin and destination views on load identifier.
///
/// A load survives if it is in both views; an unconstrained view admits
/// every load. With neither role constrained the base relation passes
/// through whole. Otherwise the output is the constrained role rows of the
/// surviving loads, in base order.
fn rejoin(
    base: &[JoinedRecord],
    origin: Option<&[usize]>,
    destination: Option<&[usize]>,
) -> JoinedRelation {
    if origin.is_none() && destination.is_none() {
        return base.to_vec();
    }

    let origin_loads = origin.map(|rows| loads_of(base, rows));
    let destination_loads = destination.map(|rows| loads_of(base, rows));
    let survives = |load: &LoadId| {
        origin_loads.as_ref().is_none_or(|s| s.contains(load))
            && destination_loads.as_ref().is_none_or(|s| s.contains(load))
    };

    let selected: HashSet<usize> = origin
        .into_iter()
        .chain(destination)
        .flatten()
        .copied()
        .collect();

    base.iter()
        .enumerate()
        .filter(|(idx, record)| selected.contains(idx) && survives(record.load_id()))
        .map(|(_, record)| record.clone())
        .collect()
}

/// Apply date predicates per load.
///
/// A pickup date is checked against the load's origin row and a delivery
/// date against its destination row when that role was filtered on. When
/// the role was not filtered on, any of the load's base rows may satisfy it.
/// A load's output rows are kept or dropped together.
fn date_stage(
    base: &[JoinedRecord],
    roles: &RouteRoles<'_>,
    rejoined: JoinedRelation,
    dates: &[Predicate],
    constrained: impl Fn(Role) -> bool,
) -> JoinedRelation {
    if dates.is_empty() {
        return rejoined;
    }

    let mut rows_by_load: HashMap<&LoadId, Vec<usize>> = HashMap::new();
    for (idx, record) in base.iter().enumerate() {
        rows_by_load.entry(record.load_id()).or_default().push(idx);
    }

    let holds = |load: &LoadId, predicate: &Predicate| {
        let anchored = predicate.anchor().filter(|&role| constrained(role));
        match anchored {
            Some(Role::Origin) => roles
                .origin_of(load)
                .is_some_and(|idx| predicate.matches(&base[idx])),
            Some(Role::Destination) => roles
                .destination_of(load)
                .is_some_and(|idx| predicate.matches(&base[idx])),
            None => rows_by_load
                .get(load)
                .is_some_and(|rows| rows.iter().any(|&idx| predicate.matches(&base[idx]))),
        }
    };

    let mut verdicts: HashMap<LoadId, bool> = HashMap::new();
    rejoined
        .into_iter()
        .filter(|record| {
            let load = record.load_id();
            if let Some(&keep) = verdicts.get(load) {
                return keep;
            }
            let keep = dates.iter().all(|predicate| holds(load, predicate));
            verdicts.insert(load.clone(), keep);
            keep
        })
        .collect()
}
