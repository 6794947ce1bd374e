//! Debounce-by-latest bookkeeping for in-flight queries.
//!
//! Every query takes a ticket for its kind. Issuing a newer ticket of the
//! same kind supersedes the older one, whose result must then be dropped.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// The recomputation passes a client can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Map,
    ImpactedStreets,
    StreetSeries,
    StreetDistribution,
    VehicleDistribution,
    ImpactedVehicles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Running,
    Completed,
    Failed,
}

/// Handle returned when a query starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    pub kind: QueryKind,
    pub seq: u64,
}

/// Latest query of one kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub seq: u64,
    pub status: QueryStatus,
    pub issued_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    latest: HashMap<QueryKind, QueryRecord>,
}

/// In-memory query tracker.
#[derive(Debug, Clone, Default)]
pub struct QueryTracker {
    inner: Arc<RwLock<Inner>>,
}

impl QueryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a query, superseding any in-flight query of the same kind.
    pub fn begin(&self, kind: QueryKind) -> QueryTicket {
        let mut inner = self.inner.write();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.latest.insert(
            kind,
            QueryRecord {
                seq,
                status: QueryStatus::Running,
                issued_at: Utc::now(),
                completed_at: None,
            },
        );
        QueryTicket { kind, seq }
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.inner
            .read()
            .latest
            .get(&ticket.kind)
            .is_some_and(|r| r.seq == ticket.seq)
    }

    /// Mark the query finished. Returns `false` when it was superseded, in
    /// which case its result must be discarded.
    pub fn complete(&self, ticket: &QueryTicket) -> bool {
        self.finish(ticket, QueryStatus::Completed)
    }

    pub fn fail(&self, ticket: &QueryTicket) -> bool {
        self.finish(ticket, QueryStatus::Failed)
    }

    fn finish(&self, ticket: &QueryTicket, status: QueryStatus) -> bool {
        let mut inner = self.inner.write();
        match inner.latest.get_mut(&ticket.kind) {
            Some(record) if record.seq == ticket.seq => {
                record.status = status;
                record.completed_at = Some(Utc::now());
                true
            }
            _ => false,
        }
    }

    pub fn latest(&self, kind: QueryKind) -> Option<QueryRecord> {
        self.inner.read().latest.get(&kind).cloned()
    }
}
