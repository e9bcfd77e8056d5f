//! Prometheus metrics for the court bot.
//!
//! [`BotMetrics`] owns a dedicated [`Registry`] that the HTTP server encodes
//! into the Prometheus text exposition format at `/metrics`.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use court_votes::VoteEvent;

use crate::NodeError;

pub struct BotMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Updates received from polling or the webhook.
    pub updates_received: IntCounter,
    /// Commands handled, labelled by command name.
    pub commands: IntCounterVec,
    pub votes_started: IntCounter,
    pub votes_passed: IntCounter,
    pub votes_failed: IntCounter,
    /// Votes cleared because they ran out of time.
    pub votes_expired: IntCounter,
    pub ballots_cast: IntCounter,
    /// Handlers that failed on a collaborator error.
    pub handler_errors: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// 1 while a vote is open, else 0.
    pub active_votes: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent handling one update, in milliseconds.
    pub handle_time_ms: Histogram,
}

impl BotMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let updates_received = register_int_counter_with_registry!(
            Opts::new("court_updates_received_total", "Total updates received"),
            registry
        )
        .expect("failed to register updates_received counter");

        let commands = register_int_counter_vec_with_registry!(
            Opts::new("court_commands_total", "Commands handled by name"),
            &["command"],
            registry
        )
        .expect("failed to register commands counter");

        let votes_started = register_int_counter_with_registry!(
            Opts::new("court_votes_started_total", "Total votes started"),
            registry
        )
        .expect("failed to register votes_started counter");

        let votes_passed = register_int_counter_with_registry!(
            Opts::new("court_votes_passed_total", "Total votes passed"),
            registry
        )
        .expect("failed to register votes_passed counter");

        let votes_failed = register_int_counter_with_registry!(
            Opts::new("court_votes_failed_total", "Total votes failed"),
            registry
        )
        .expect("failed to register votes_failed counter");

        let votes_expired = register_int_counter_with_registry!(
            Opts::new("court_votes_expired_total", "Total votes cleared on expiry"),
            registry
        )
        .expect("failed to register votes_expired counter");

        let ballots_cast = register_int_counter_with_registry!(
            Opts::new("court_ballots_cast_total", "Total ballots cast"),
            registry
        )
        .expect("failed to register ballots_cast counter");

        let handler_errors = register_int_counter_with_registry!(
            Opts::new("court_handler_errors_total", "Total failed update handlers"),
            registry
        )
        .expect("failed to register handler_errors counter");

        let active_votes = register_int_gauge_with_registry!(
            Opts::new("court_active_votes", "Number of open votes"),
            registry
        )
        .expect("failed to register active_votes gauge");

        // 0.5 ms → ~8 s; dominated by Bot API round trips.
        let handle_time_ms = register_histogram_with_registry!(
            HistogramOpts::new("court_handle_time_ms", "Update handling time in milliseconds")
                .buckets(vec![
                    0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0,
                    8000.0
                ]),
            registry
        )
        .expect("failed to register handle_time_ms histogram");

        Self {
            registry,
            updates_received,
            commands,
            votes_started,
            votes_passed,
            votes_failed,
            votes_expired,
            ballots_cast,
            handler_errors,
            active_votes,
            handle_time_ms,
        }
    }

    /// Count what a vote manager operation did.
    pub fn observe(&self, events: &[VoteEvent]) {
        for event in events {
            match event {
                VoteEvent::Started { .. } => self.votes_started.inc(),
                VoteEvent::BallotCast { .. } => self.ballots_cast.inc(),
                VoteEvent::Passed { .. } => self.votes_passed.inc(),
                VoteEvent::Failed { .. } => self.votes_failed.inc(),
                VoteEvent::Expired { .. } => self.votes_expired.inc(),
                VoteEvent::StatusReported { .. } | VoteEvent::Refused(_) => {}
            }
        }
    }

    /// Encode every metric in the text exposition format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| NodeError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| NodeError::Metrics(e.to_string()))
    }
}

impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}
