//! Sync engine
//!
//! This module provides the SyncEngine that orchestrates one synchronization
//! run by coordinating the bank feed, the billing system and the checkpoint
//! store.
//!
//! A run walks through the states
//! `Idle → WindowDetermined → Fetched → Normalized → Filtered → Resumed →
//! Processing(i) → Done`, and ends in `Aborted` on the first fatal error.
//!
//! The engine enforces the exactly-once rules:
//! - only incoming transactions are considered
//! - the resume filter runs before anything is posted
//! - the checkpoint advances after every accepted payment, and to the window
//!   end only when the whole window was processed

use crate::core::matcher::{ClientMatcher, MatchStrategy};
use crate::core::normalizer::{normalize_all, retain_incoming};
use crate::core::poster::PaymentPoster;
use crate::core::resume::skip_processed;
use crate::core::traits::{BankFeed, BillingApi, CheckpointStore};
use crate::core::window::determine_window;
use crate::types::{FeedWindow, MatchResult, PostedPayment, SyncError};
use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Run-independent settings handed to the engine at construction
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Earliest posting date ever synchronized
    pub start_date: NaiveDate,

    /// How transaction references are matched to clients
    pub match_strategy: MatchStrategy,

    /// `providerName` reported with every payment
    pub provider_name: String,
}

/// Progress of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    WindowDetermined,
    Fetched,
    Normalized,
    Filtered,
    Resumed,
    /// Handling the transaction at this position of the resumed batch
    Processing(usize),
    Done,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Processing(i) => write!(f, "Processing({})", i),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub window: FeedWindow,

    /// Raw records returned by the feed
    pub fetched: usize,

    /// Records left after the direction filter
    pub incoming: usize,

    /// Incoming records dropped by the resume filter
    pub skipped: usize,

    /// Payments accepted by the billing system, in posting order
    pub posted: Vec<PostedPayment>,

    /// Posted payments without a client association
    pub unmatched: usize,
}

impl RunSummary {
    fn empty(window: FeedWindow) -> Self {
        RunSummary {
            window,
            fetched: 0,
            incoming: 0,
            skipped: 0,
            posted: Vec::new(),
            unmatched: 0,
        }
    }
}

/// Sync engine
///
/// Owns the three collaborators for the duration of a run. Runs are strictly
/// sequential; the engine must not be run concurrently with another process
/// using the same checkpoint resource.
pub struct SyncEngine<F: BankFeed, B: BillingApi, S: CheckpointStore> {
    feed: F,
    billing: B,
    checkpoints: S,
    config: SyncConfig,
    state: RunState,
}

impl<F: BankFeed, B: BillingApi, S: CheckpointStore> SyncEngine<F, B, S> {
    /// Create a new SyncEngine in the `Idle` state
    pub fn new(feed: F, billing: B, checkpoints: S, config: SyncConfig) -> Self {
        SyncEngine {
            feed,
            billing,
            checkpoints,
            config,
            state: RunState::Idle,
        }
    }

    /// State reached by the last run
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn billing(&self) -> &B {
        &self.billing
    }

    pub fn checkpoints(&self) -> &S {
        &self.checkpoints
    }

    /// Run one synchronization as of `today`
    ///
    /// The feed is queried from the checkpointed position through yesterday.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - the window was processed completely
    /// * `Err(SyncError)` - the run aborted; payments posted before the
    ///   failure remain checkpointed, so a retry resumes right after them
    pub fn run(&mut self, today: NaiveDate) -> Result<RunSummary, SyncError> {
        self.state = RunState::Idle;

        match self.run_window(today) {
            Ok(summary) => {
                self.transition(RunState::Done);
                info!(
                    posted = summary.posted.len(),
                    unmatched = summary.unmatched,
                    skipped = summary.skipped,
                    "Sync run completed"
                );
                Ok(summary)
            }
            Err(e) => {
                self.transition(RunState::Aborted);
                error!(error = %e, "Sync run aborted");
                Err(e)
            }
        }
    }

    fn run_window(&mut self, today: NaiveDate) -> Result<RunSummary, SyncError> {
        let checkpoint = self.checkpoints.load()?;
        let window = determine_window(self.config.start_date, checkpoint.as_ref(), today);
        self.transition(RunState::WindowDetermined);
        info!(
            start = %window.start,
            end = %window.end,
            resume_after = window.resume_after.as_deref().unwrap_or("-"),
            "Feed window determined"
        );

        if window.is_empty() {
            info!("Nothing to synchronize before today");
            return Ok(RunSummary::empty(window));
        }

        let raw = self.feed.fetch_transactions(window.start, window.end)?;
        self.transition(RunState::Fetched);

        let normalized = normalize_all(&raw)?;
        self.transition(RunState::Normalized);

        let incoming = retain_incoming(normalized);
        self.transition(RunState::Filtered);
        info!(
            fetched = raw.len(),
            incoming = incoming.len(),
            "Transactions fetched"
        );

        let incoming_count = incoming.len();
        let pending = skip_processed(incoming, window.resume_after.as_deref(), window.start)?;
        self.transition(RunState::Resumed);

        let mut summary = RunSummary {
            skipped: incoming_count - pending.len(),
            fetched: raw.len(),
            incoming: incoming_count,
            ..RunSummary::empty(window.clone())
        };

        let matcher = ClientMatcher::new(&self.billing, &self.config.match_strategy);
        let mut poster = PaymentPoster::new(
            &self.billing,
            &mut self.checkpoints,
            &self.config.provider_name,
        );

        for (i, tx) in pending.iter().enumerate() {
            self.state = RunState::Processing(i);
            debug!(state = %self.state, "Run state changed");
            info!(transaction = %tx.id, "Processing transaction");

            let matched = match matcher.resolve(tx) {
                Ok(matched) => matched,
                Err(e) if e.is_soft() => {
                    warn!(transaction = %tx.id, reason = %e, "Posting payment without client");
                    MatchResult::unmatched()
                }
                Err(e) => return Err(e),
            };

            let posted = poster.post(tx, &matched)?;
            if posted.client_id.is_none() {
                summary.unmatched += 1;
            }
            summary.posted.push(posted);
        }

        self.checkpoints.save_completed(window.end)?;

        Ok(summary)
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "Run state changed");
        self.state = next;
    }
}
