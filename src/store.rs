//! State store for the transaction list screen.
//!
//! The store owns the loaded transactions and the `has_more` flag and is the
//! only place that decides when a fetch happens and how its result is merged.
//! It knows nothing about HTTP or rendering: `dispatch` returns the fetch to
//! perform (if any) as a plain [`FetchCommand`], and the driver feeds the
//! outcome back in as [`Event::PageLoaded`] / [`Event::FetchFailed`].
//!
//! Overlapping fetches are resolved by sequence number: every issued fetch
//! gets a fresh `seq`, and a result is applied only if its `seq` matches the
//! most recently issued one. A stale response, success or failure, is
//! discarded without touching state.

use tracing::{debug, warn};

use crate::api::{DateFilter, Transaction, TransactionPage};

/// Lifecycle phase of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// Most recent fetch succeeded
    Loaded,
    /// Most recent fetch failed; list and `has_more` kept from before
    Error,
}

/// Inputs to the store, from the screen or from a finished fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Screen mounted; load the first unfiltered page
    Mounted,
    /// User scrolled past the last row
    EndReached,
    /// Either date bound was edited (or cleared)
    FilterChanged(DateFilter),
    /// A fetch came back with a page
    PageLoaded { seq: u64, page: TransactionPage },
    /// A fetch failed (network, non-2xx, malformed body)
    FetchFailed { seq: u64, error: String },
}

/// One fetch the driver should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub seq: u64,
    pub cursor: Option<String>,
    pub filter: DateFilter,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    seq: u64,
    replace: bool,
}

pub struct ListStore {
    transactions: Vec<Transaction>,
    has_more: bool,
    phase: Phase,
    filter: DateFilter,
    last_error: Option<String>,
    next_seq: u64,
    in_flight: Option<InFlight>,
}

impl ListStore {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            has_more: false,
            phase: Phase::Idle,
            filter: DateFilter::default(),
            last_error: None,
            next_seq: 0,
            in_flight: None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn filter(&self) -> DateFilter {
        self.filter
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True when the most recent fetch succeeded with nothing to show
    pub fn is_empty_result(&self) -> bool {
        self.phase == Phase::Loaded && self.transactions.is_empty()
    }

    /// Apply one event, returning the fetch to perform (if any).
    pub fn dispatch(&mut self, event: Event) -> Option<FetchCommand> {
        match event {
            Event::Mounted => Some(self.begin_fetch(None, true)),
            Event::EndReached => self.on_end_reached(),
            Event::FilterChanged(filter) => {
                self.filter = filter;
                Some(self.begin_fetch(None, true))
            }
            Event::PageLoaded { seq, page } => {
                self.apply_page(seq, page);
                None
            }
            Event::FetchFailed { seq, error } => {
                self.apply_failure(seq, error);
                None
            }
        }
    }

    /// End-of-list pagination: only in pagination mode, never while a
    /// fetch is already in flight, and only while the server reported
    /// more data (an empty list always retries its first page). A failed
    /// fetch leaves `has_more` as it was, so reaching the end again
    /// retries it.
    fn on_end_reached(&mut self) -> Option<FetchCommand> {
        if self.filter.is_active() || matches!(self.phase, Phase::Idle | Phase::Loading) {
            return None;
        }
        if !self.has_more && !self.transactions.is_empty() {
            return None;
        }
        let cursor = self.transactions.last().map(|tx| tx.id.clone());
        Some(self.begin_fetch(cursor, false))
    }

    fn begin_fetch(&mut self, cursor: Option<String>, replace: bool) -> FetchCommand {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight = Some(InFlight { seq, replace });
        self.phase = Phase::Loading;
        self.last_error = None;
        debug!(
            "issuing fetch seq={} cursor={:?} filter_active={}",
            seq,
            cursor,
            self.filter.is_active()
        );
        FetchCommand {
            seq,
            cursor,
            filter: self.filter,
        }
    }

    fn apply_page(&mut self, seq: u64, page: TransactionPage) {
        let Some(in_flight) = self.in_flight else {
            warn!("dropping response seq={} with no fetch in flight", seq);
            return;
        };
        if in_flight.seq != seq {
            debug!(
                "discarding stale response seq={} (current seq={})",
                seq, in_flight.seq
            );
            return;
        }
        self.in_flight = None;

        if in_flight.replace {
            self.transactions = page.transactions;
        } else {
            self.transactions.extend(page.transactions);
        }
        self.has_more = page.has_more;
        self.phase = Phase::Loaded;
        self.last_error = None;
    }

    fn apply_failure(&mut self, seq: u64, error: String) {
        let Some(in_flight) = self.in_flight else {
            warn!("dropping failure seq={} with no fetch in flight", seq);
            return;
        };
        if in_flight.seq != seq {
            debug!(
                "discarding stale failure seq={} (current seq={})",
                seq, in_flight.seq
            );
            return;
        }
        self.in_flight = None;

        // List and has_more stay exactly as they were.
        self.phase = Phase::Error;
        self.last_error = Some(error);
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}
