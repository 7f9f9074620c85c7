//! Broadcast view: polls the API and redraws the match on screen.
//!
//! Usage: `scoreboard-display [MATCH_ID]`. Without an id the first listed match is shown.

use std::sync::Arc;

use anyhow::Context;
use live_scoreboard::{
    client::{HttpMatchApi, MatchPoller, poller::PollTarget},
    config::AppConfig,
    display::render_scoreboard,
    logging,
};
use tracing::info;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing(logging::CONSOLE_FILTER);
    let config = AppConfig::load();

    let target = match std::env::args().nth(1) {
        Some(raw) => PollTarget::Match(
            raw.parse()
                .with_context(|| format!("match id must be an integer (got `{raw}`)"))?,
        ),
        None => PollTarget::List,
    };

    let api = HttpMatchApi::new(&config.api_url).context("building API client")?;
    let poller = MatchPoller::spawn(Arc::new(api), target, config.poll_interval());
    info!(api = %config.api_url, ?target, "display polling");

    print!("{CLEAR_SCREEN}{}", render_scoreboard(None));
    let mut updates = poller.subscribe();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = {
                    let latest = updates.borrow_and_update();
                    render_scoreboard(latest.as_ref().and_then(|matches| matches.first()))
                };
                print!("{CLEAR_SCREEN}{frame}");
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
