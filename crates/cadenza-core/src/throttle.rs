//! Per-command, per-user usage throttling.
//!
//! Each throttled command owns a [`ThrottleGate`]: a usage ceiling applied
//! over a fixed window that starts at a user's first accepted call. The gate
//! is the only mutable state shared between in-flight dispatches, so the
//! check-then-increment step runs inside one mutex critical section with no
//! suspension point. Two interleaved dispatches for the same user can never
//! both be admitted past the ceiling.
//!
//! Windows expire two ways: an entry whose window has run out is replaced
//! with a fresh window the next time its user calls, and
//! [`ThrottleGate::purge_expired`] sweeps entries for users who never came
//! back. The runtime drives the sweep on an interval. There is no per-entry
//! timer and no manual reset.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Usage ceiling for one command: at most `usages` accepted calls per user
/// within `duration` of that user's first accepted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Accepted calls allowed per window.
    pub usages: u32,
    /// Window length, measured from the first accepted call.
    pub duration: Duration,
}

impl ThrottlePolicy {
    /// Creates a policy of `usages` calls per `secs` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `usages` or `secs` is zero. A zero-use or zero-length
    /// window is a configuration bug caught at startup, not a runtime
    /// condition.
    pub fn per_seconds(usages: u32, secs: u64) -> Self {
        assert!(usages > 0, "throttle policy requires usages > 0");
        assert!(secs > 0, "throttle policy requires a non-zero window");
        Self {
            usages,
            duration: Duration::from_secs(secs),
        }
    }
}

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The call is admitted and has been counted against the window.
    Allowed,
    /// The ceiling is reached. The window has `remaining` left to run; the
    /// rejected call was not counted.
    Rejected {
        /// Time until the user's window expires.
        remaining: Duration,
    },
}

#[derive(Debug, Clone, Copy)]
struct ThrottleEntry {
    window_start: Instant,
    usages: u32,
}

/// Sliding-window throttle state for a single command.
#[derive(Debug)]
pub struct ThrottleGate {
    policy: ThrottlePolicy,
    entries: Mutex<HashMap<String, ThrottleEntry>>,
}

impl ThrottleGate {
    /// Creates an empty gate enforcing `policy`.
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The policy this gate enforces.
    pub fn policy(&self) -> ThrottlePolicy {
        self.policy
    }

    /// Checks whether `user_id` may make another call right now and, if
    /// admitted, counts it.
    pub fn check_and_consume(&self, user_id: &str) -> ThrottleDecision {
        self.check_and_consume_at(user_id, Instant::now())
    }

    /// Clock-injected variant of [`check_and_consume`](Self::check_and_consume).
    pub fn check_and_consume_at(&self, user_id: &str, now: Instant) -> ThrottleDecision {
        let mut entries = self.entries.lock();
        let entry = entries.entry(user_id.to_string()).or_insert(ThrottleEntry {
            window_start: now,
            usages: 0,
        });

        // A window that has run out is replaced, not refused: this call is
        // the first call of a fresh window.
        if now >= entry.window_start + self.policy.duration {
            *entry = ThrottleEntry {
                window_start: now,
                usages: 0,
            };
        }

        if entry.usages + 1 > self.policy.usages {
            let remaining =
                (entry.window_start + self.policy.duration).saturating_duration_since(now);
            return ThrottleDecision::Rejected { remaining };
        }

        entry.usages += 1;
        ThrottleDecision::Allowed
    }

    /// Drops every entry whose window has elapsed.
    ///
    /// Users with a live window keep their counters; users who stopped
    /// calling stop occupying memory.
    pub fn purge_expired(&self) {
        self.purge_expired_at(Instant::now());
    }

    /// Clock-injected variant of [`purge_expired`](Self::purge_expired).
    pub fn purge_expired_at(&self, now: Instant) {
        let duration = self.policy.duration;
        self.entries
            .lock()
            .retain(|_, entry| now < entry.window_start + duration);
    }

    /// Number of users currently holding an entry, swept or not.
    pub fn tracked_users(&self) -> usize {
        self.entries.lock().len()
    }
}
