//! Operator console: drives the countdown and the score buttons over HTTP.

use std::sync::Arc;

use anyhow::Context;
use live_scoreboard::{
    client::{HttpMatchApi, MatchApi, MatchPoller, poller::PollTarget},
    config::AppConfig,
    control::{
        Side, TimerCommand, TimerDriver, TimerHandle, TimerNotice, TimerSettings, adjust_score,
        console::{AdminCommand, HELP},
    },
    display::{render_scoreboard, render_timer},
    dto::matches::MatchDto,
    logging,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Console state: the last known match and the countdown driving it.
struct Console {
    api: Arc<dyn MatchApi>,
    timer: TimerHandle,
    current: Option<MatchDto>,
}

impl Console {
    /// Adopt a fresher view of the match on screen and let the timer resync if its id changed.
    async fn observe(&mut self, current: Option<MatchDto>) {
        self.current = current.clone();
        self.timer.send(TimerCommand::Observe(current)).await;
    }

    async fn run(&mut self, command: AdminCommand) {
        match command {
            AdminCommand::Timer(command) => {
                self.timer.send(command).await;
            }
            AdminCommand::Score { side, delta } => {
                let Some(current) = self.current.clone() else {
                    println!("no match on screen");
                    return;
                };
                match adjust_score(self.api.as_ref(), &current, side, delta).await {
                    Ok(updated) => {
                        let score = match side {
                            Side::Home => updated.home_score,
                            Side::Away => updated.away_score,
                        };
                        println!("{side} score: {score}");
                        self.observe(Some(updated)).await;
                    }
                    Err(err) => println!("failed to update score: {err}"),
                }
            }
            AdminCommand::New(request) => match self.api.create(request).await {
                Ok(created) => {
                    println!("match #{} created", created.id);
                    self.observe(Some(created)).await;
                }
                Err(err) => println!("failed to create match: {err}"),
            },
            AdminCommand::Clear => {
                let Some(current) = self.current.clone() else {
                    println!("no match on screen");
                    return;
                };
                match self.api.delete(current.id).await {
                    Ok(()) => {
                        println!("match #{} removed", current.id);
                        self.observe(None).await;
                    }
                    Err(err) => println!("failed to remove match: {err}"),
                }
            }
            AdminCommand::Show => {
                print!("{}", render_scoreboard(self.current.as_ref()));
                println!("{}", render_timer(&self.timer.snapshot()));
            }
            AdminCommand::Help => println!("{HELP}"),
            AdminCommand::Quit => {}
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing(logging::CONSOLE_FILTER);
    let config = AppConfig::load();

    let api: Arc<dyn MatchApi> =
        Arc::new(HttpMatchApi::new(&config.api_url).context("building API client")?);
    let poller = MatchPoller::spawn(api.clone(), PollTarget::List, config.poll_interval());
    let (timer, mut notices) = TimerDriver::spawn(
        api.clone(),
        TimerSettings {
            reset_to: config.reset_clock(),
            sync_throttle: config.sync_throttle(),
            tick_interval: config.tick_interval(),
        },
    );
    info!(api = %config.api_url, "admin console ready");

    let mut console = Console {
        api,
        timer,
        current: None,
    };
    let mut matches = poller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match AdminCommand::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(AdminCommand::Quit)) => break,
                    Ok(Some(command)) => console.run(command).await,
                    Err(err) => println!("{err}\n{HELP}"),
                }
            }
            changed = matches.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = matches
                    .borrow_and_update()
                    .as_ref()
                    .and_then(|list| list.first().cloned());
                console.observe(current).await;
            }
            Some(notice) = notices.recv() => match notice {
                TimerNotice::SyncFailed { match_id, message } => {
                    println!("sync failed for match #{match_id}: {message}");
                }
                TimerNotice::MatchEnded { match_id, time } => {
                    println!("match #{match_id} ended at {time}");
                }
            },
        }
    }

    Ok(())
}
