//! Async owner of a [`MatchTimer`]: ticks it, delivers its writes and reports back.
//!
//! Throttled writes are spawned and never awaited so a slow server cannot hold
//! up the countdown. Forced flushes (pause, reset, end, reaching 00:00) are
//! awaited before the next command is handled.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior, interval_at},
};
use tracing::{debug, info, warn};

use super::timer::{MatchTimer, SyncWrite, TimerPhase};
use crate::{
    client::MatchApi,
    clock::MatchClock,
    dao::models::MatchId,
    dto::matches::MatchDto,
};

const COMMAND_CAPACITY: usize = 32;

/// Operator actions and server observations fed to the driver.
#[derive(Debug, Clone)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    End,
    /// Latest server view of the current match (`None` when there is none).
    Observe(Option<MatchDto>),
}

/// What the admin view renders for the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub match_id: Option<MatchId>,
    pub clock: MatchClock,
    pub phase: TimerPhase,
}

/// Transient messages for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerNotice {
    /// A write did not reach the server; the local countdown keeps going.
    SyncFailed { match_id: MatchId, message: String },
    /// The end-of-match write was stored.
    MatchEnded { match_id: MatchId, time: MatchClock },
}

/// Cadence settings for a [`TimerDriver`].
#[derive(Debug, Clone, Copy)]
pub struct TimerSettings {
    pub reset_to: MatchClock,
    pub sync_throttle: Duration,
    pub tick_interval: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            reset_to: MatchClock::regulation(),
            sync_throttle: Duration::from_millis(250),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Handle to a running driver. Dropping it stops the countdown task.
pub struct TimerHandle {
    commands: mpsc::Sender<TimerCommand>,
    snapshot: watch::Receiver<TimerSnapshot>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Queue a command. Returns `false` once the driver has stopped.
    pub async fn send(&self, command: TimerCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Watch countdown snapshots.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot.clone()
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.snapshot.borrow()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Runs the countdown for the admin view.
pub struct TimerDriver {
    timer: MatchTimer,
    api: Arc<dyn MatchApi>,
    tick_interval: Duration,
    ticker: Option<Interval>,
    snapshot: watch::Sender<TimerSnapshot>,
    notices: mpsc::UnboundedSender<TimerNotice>,
}

impl TimerDriver {
    /// Spawn the driver task; notices arrive on the returned receiver.
    pub fn spawn(
        api: Arc<dyn MatchApi>,
        settings: TimerSettings,
    ) -> (TimerHandle, mpsc::UnboundedReceiver<TimerNotice>) {
        let timer = MatchTimer::new(settings.reset_to, settings.sync_throttle);
        let (snapshot, snapshot_rx) = watch::channel(snapshot_of(&timer));
        let (notices, notices_rx) = mpsc::unbounded_channel();
        let (commands, commands_rx) = mpsc::channel(COMMAND_CAPACITY);

        let driver = Self {
            timer,
            api,
            tick_interval: settings.tick_interval,
            ticker: None,
            snapshot,
            notices,
        };
        let task = tokio::spawn(driver.run(commands_rx));

        let handle = TimerHandle {
            commands,
            snapshot: snapshot_rx,
            task,
        };
        (handle, notices_rx)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<TimerCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                now = next_tick(&mut self.ticker) => self.on_tick(now).await,
            }

            self.sync_ticker();
            self.snapshot.send_if_modified(|current| {
                let next = snapshot_of(&self.timer);
                if *current == next {
                    return false;
                }
                *current = next;
                true
            });
        }
        debug!("timer driver stopped");
    }

    async fn handle(&mut self, command: TimerCommand) {
        let now = Instant::now();
        match command {
            TimerCommand::Start => {
                if self.timer.start() {
                    info!(match_id = ?self.timer.match_id(), clock = %self.timer.clock(), "timer started");
                }
            }
            TimerCommand::Pause => {
                if let Some(write) = self.timer.pause(now) {
                    info!(match_id = write.match_id, clock = %write.time, "timer paused");
                    self.flush(write).await;
                }
            }
            TimerCommand::Reset => {
                if let Some(write) = self.timer.reset(now) {
                    info!(match_id = write.match_id, "timer reset");
                    // Restart the cadence so the first second after a reset is a full one.
                    self.ticker = None;
                    self.flush(write).await;
                }
            }
            TimerCommand::End => {
                if let Some(write) = self.timer.end(now) {
                    info!(match_id = write.match_id, clock = %write.time, "match ended");
                    if self.flush(write.clone()).await {
                        let _ = self.notices.send(TimerNotice::MatchEnded {
                            match_id: write.match_id,
                            time: write.time,
                        });
                    }
                }
            }
            TimerCommand::Observe(current) => {
                let observed = current.as_ref().map(|dto| (dto.id, dto.time.as_str()));
                if self.timer.observe(observed) {
                    info!(match_id = ?self.timer.match_id(), clock = %self.timer.clock(), "timer attached to match");
                }
            }
        }
    }

    async fn on_tick(&mut self, now: Instant) {
        let Some(write) = self.timer.tick(now) else {
            return;
        };

        if write.forced {
            info!(match_id = write.match_id, "clock ran out");
            self.flush(write).await;
        } else {
            let api = self.api.clone();
            let notices = self.notices.clone();
            tokio::spawn(async move {
                deliver(api.as_ref(), &write, &notices).await;
            });
        }
    }

    /// Awaited write for explicit stop points.
    async fn flush(&self, write: SyncWrite) -> bool {
        deliver(self.api.as_ref(), &write, &self.notices).await
    }

    fn sync_ticker(&mut self) {
        let running = self.timer.phase() == TimerPhase::Running;
        match (running, self.ticker.is_some()) {
            (true, false) => {
                let mut ticker =
                    interval_at(Instant::now() + self.tick_interval, self.tick_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending().await,
    }
}

async fn deliver(
    api: &dyn MatchApi,
    write: &SyncWrite,
    notices: &mpsc::UnboundedSender<TimerNotice>,
) -> bool {
    match api.update(write.match_id, write.to_request()).await {
        Ok(_) => true,
        Err(err) => {
            warn!(
                match_id = write.match_id,
                clock = %write.time,
                forced = write.forced,
                error = %err,
                "timer sync failed"
            );
            let _ = notices.send(TimerNotice::SyncFailed {
                match_id: write.match_id,
                message: err.to_string(),
            });
            false
        }
    }
}

fn snapshot_of(timer: &MatchTimer) -> TimerSnapshot {
    TimerSnapshot {
        match_id: timer.match_id(),
        clock: timer.clock(),
        phase: timer.phase(),
    }
}
