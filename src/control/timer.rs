//! Countdown state machine owned by the admin view.
//!
//! The timer never talks to the network itself. Every transition that must be
//! persisted hands back a [`SyncWrite`]; the caller decides how to deliver it.

use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::{clock::MatchClock, dao::models::MatchId, dto::matches::UpdateMatchRequest};

/// Where the countdown currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Stopped, showing the last known clock.
    Idle,
    /// Counting down once per tick.
    Running,
    /// Final whistle: the match was marked as no longer live.
    Ended,
}

/// Update the timer wants persisted for its match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWrite {
    pub match_id: MatchId,
    pub time: MatchClock,
    /// `Some` when the live flag changes with this write.
    pub is_live: Option<bool>,
    /// Forced flushes come from explicit actions and bypass the throttle.
    pub forced: bool,
}

impl SyncWrite {
    /// Partial update carrying only the fields this write changes.
    pub fn to_request(&self) -> UpdateMatchRequest {
        match self.is_live {
            Some(is_live) => UpdateMatchRequest::time_and_live(self.time, is_live),
            None => UpdateMatchRequest::time(self.time),
        }
    }
}

/// Countdown for the match currently on screen.
#[derive(Debug, Clone)]
pub struct MatchTimer {
    match_id: Option<MatchId>,
    seconds: u32,
    phase: TimerPhase,
    reset_to: MatchClock,
    throttle: Duration,
    last_sync: Option<Instant>,
}

impl MatchTimer {
    /// Timer with no match attached yet.
    pub fn new(reset_to: MatchClock, throttle: Duration) -> Self {
        Self {
            match_id: None,
            seconds: 0,
            phase: TimerPhase::Idle,
            reset_to,
            throttle,
            last_sync: None,
        }
    }

    pub fn match_id(&self) -> Option<MatchId> {
        self.match_id
    }

    /// Local countdown value.
    pub fn clock(&self) -> MatchClock {
        MatchClock::from_seconds(self.seconds)
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Feed the latest server view of the current match.
    ///
    /// Only a change of identifier resynchronises the countdown from `time`;
    /// repeated observations of the same match are ignored so the server never
    /// overwrites a countdown with a value the timer itself wrote. Returns
    /// whether the timer was resynchronised.
    pub fn observe(&mut self, current: Option<(MatchId, &str)>) -> bool {
        let observed_id = current.map(|(id, _)| id);
        if observed_id == self.match_id {
            return false;
        }

        self.match_id = observed_id;
        self.phase = TimerPhase::Idle;
        self.last_sync = None;
        self.seconds = match current {
            Some((id, time)) => match time.parse::<MatchClock>() {
                Ok(clock) => clock.seconds(),
                Err(err) => {
                    warn!(match_id = id, %time, error = %err, "stored clock unreadable; starting from 00:00");
                    0
                }
            },
            None => 0,
        };
        true
    }

    /// Idle → Running. Ignored while running, after the end, at 00:00 or without a match.
    pub fn start(&mut self) -> bool {
        if self.match_id.is_none() || self.phase != TimerPhase::Idle || self.seconds == 0 {
            return false;
        }
        self.phase = TimerPhase::Running;
        true
    }

    /// One elapsed second. Emits a throttled write, or a forced one when the clock runs out.
    pub fn tick(&mut self, now: Instant) -> Option<SyncWrite> {
        if self.phase != TimerPhase::Running {
            return None;
        }

        self.seconds = self.seconds.saturating_sub(1);
        if self.seconds == 0 {
            self.phase = TimerPhase::Idle;
            return self.flush(now, None);
        }

        let due = self
            .last_sync
            .is_none_or(|last| now.saturating_duration_since(last) >= self.throttle);
        if !due {
            return None;
        }
        self.last_sync = Some(now);
        self.match_id.map(|match_id| SyncWrite {
            match_id,
            time: self.clock(),
            is_live: None,
            forced: false,
        })
    }

    /// Running → Idle, flushing the exact local clock.
    pub fn pause(&mut self, now: Instant) -> Option<SyncWrite> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.phase = TimerPhase::Idle;
        self.flush(now, None)
    }

    /// Any phase → Running from the regulation clock, marking the match live again.
    pub fn reset(&mut self, now: Instant) -> Option<SyncWrite> {
        self.match_id?;
        self.seconds = self.reset_to.seconds();
        self.phase = TimerPhase::Running;
        self.flush(now, Some(true))
    }

    /// Any phase → Ended, marking the match final at the current clock.
    pub fn end(&mut self, now: Instant) -> Option<SyncWrite> {
        self.match_id?;
        self.phase = TimerPhase::Ended;
        self.flush(now, Some(false))
    }

    fn flush(&mut self, now: Instant, is_live: Option<bool>) -> Option<SyncWrite> {
        let match_id = self.match_id?;
        self.last_sync = Some(now);
        Some(SyncWrite {
            match_id,
            time: self.clock(),
            is_live,
            forced: true,
        })
    }
}
