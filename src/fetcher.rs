//! Enrolled-student lookup that repopulates the attendance roster.
//!
//! A fetch is split in two halves so the network call can run off the
//! request loop: [`RosterFetcher::begin`] validates and hands out a ticket,
//! [`RosterFetcher::resolve`] applies the portal's answer. Only the most
//! recently issued ticket may touch the rows; older answers resolve as
//! [`FetchOutcome::Stale`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::criteria::{CriteriaError, QueryCriteria, ValidCriteria};
use crate::portal::{EnrolledStudents, SourceError};
use crate::roster::{RosterRegion, RosterRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    criteria: ValidCriteria,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn criteria(&self) -> &ValidCriteria {
        &self.criteria
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Replaced { count: usize },
    Empty,
    Invalid(CriteriaError),
    Rejected { error: Option<String> },
    HttpStatus { status: u16, body: String },
    Transport { detail: String },
    Stale { seq: u64 },
}

impl FetchOutcome {
    /// True when the roster rows were replaced.
    pub fn applied(&self) -> bool {
        matches!(self, FetchOutcome::Replaced { .. } | FetchOutcome::Empty)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchOutcome::Replaced { .. } => "replaced",
            FetchOutcome::Empty => "empty",
            FetchOutcome::Invalid(_) => "invalid",
            FetchOutcome::Rejected { .. } => "rejected",
            FetchOutcome::HttpStatus { .. } => "httpError",
            FetchOutcome::Transport { .. } => "transportError",
            FetchOutcome::Stale { .. } => "stale",
        }
    }
}

/// Outcome of [`RosterFetcher::resolve`] with the rows as they stood when the
/// answer was applied or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: FetchOutcome,
    pub rows: Vec<RosterRow>,
}

pub struct RosterFetcher<R: RosterRegion> {
    region: Arc<Mutex<R>>,
    latest: AtomicU64,
}

impl<R: RosterRegion> RosterFetcher<R> {
    pub fn new(region: Arc<Mutex<R>>) -> Self {
        Self {
            region,
            latest: AtomicU64::new(0),
        }
    }

    pub fn region(&self) -> MutexGuard<'_, R> {
        // Row edits never leave the list half-written, so a poisoned lock is still usable.
        self.region.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn begin(&self, criteria: &QueryCriteria) -> Result<FetchTicket, FetchOutcome> {
        let valid = criteria.validate().map_err(FetchOutcome::Invalid)?;
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(FetchTicket {
            seq,
            criteria: valid,
        })
    }

    pub fn resolve(
        &self,
        ticket: &FetchTicket,
        answer: Result<EnrolledStudents, SourceError>,
    ) -> Resolution {
        if let Err(SourceError::Transport(detail) | SourceError::Malformed(detail)) = &answer {
            log::error!("enrolled-students fetch #{} failed: {}", ticket.seq, detail);
        }

        // The latest check happens under the region lock so a newer fetch
        // cannot slip in between the check and the replacement.
        let mut region = self.region();
        if self.latest.load(Ordering::SeqCst) != ticket.seq {
            log::debug!("discarding stale enrolled-students answer #{}", ticket.seq);
            return Resolution {
                outcome: FetchOutcome::Stale { seq: ticket.seq },
                rows: region.rows().to_vec(),
            };
        }

        let outcome = match answer {
            Ok(EnrolledStudents::Listed(records)) => {
                region.clear();
                for record in &records {
                    region.append(RosterRow::from_record(record));
                }
                if records.is_empty() {
                    FetchOutcome::Empty
                } else {
                    FetchOutcome::Replaced {
                        count: records.len(),
                    }
                }
            }
            Ok(EnrolledStudents::Refused(error)) => FetchOutcome::Rejected { error },
            Err(SourceError::Status { status, body }) => FetchOutcome::HttpStatus { status, body },
            Err(SourceError::Transport(detail) | SourceError::Malformed(detail)) => {
                FetchOutcome::Transport { detail }
            }
        };
        Resolution {
            outcome,
            rows: region.rows().to_vec(),
        }
    }
}
