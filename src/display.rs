//! Plain-text rendering of the broadcast scoreboard.

use std::fmt::Write;

use crate::{
    control::{TimerPhase, TimerSnapshot},
    dto::matches::MatchDto,
};

/// Shown when the API has no match.
pub const EMPTY_SCREEN: &str = "No match on screen";

/// Full scoreboard frame for the current match.
pub fn render_scoreboard(current: Option<&MatchDto>) -> String {
    let Some(dto) = current else {
        return format!("{EMPTY_SCREEN}\n");
    };

    let width = dto.home_team.chars().count().max(dto.away_team.chars().count());
    let status = if dto.is_live { "LIVE" } else { "FINAL" };

    let mut frame = String::new();
    let _ = writeln!(frame, "{status}  |  Week {}  |  {}", dto.week, dto.stadium);
    let _ = writeln!(frame, "{:<width$}  {:>3}", dto.home_team, dto.home_score);
    let _ = writeln!(frame, "{:<width$}  {:>3}", dto.away_team, dto.away_score);
    let _ = writeln!(frame, "Clock {}", dto.time);
    if !dto.home_players.is_empty() {
        let _ = writeln!(frame, "{}: {}", dto.home_team, dto.home_players.join(", "));
    }
    if !dto.away_players.is_empty() {
        let _ = writeln!(frame, "{}: {}", dto.away_team, dto.away_players.join(", "));
    }
    frame
}

/// One-line countdown status for the admin console.
pub fn render_timer(snapshot: &TimerSnapshot) -> String {
    let phase = match snapshot.phase {
        TimerPhase::Idle => "paused",
        TimerPhase::Running => "running",
        TimerPhase::Ended => "ended",
    };
    match snapshot.match_id {
        Some(id) => format!("match #{id}  {}  ({phase})", snapshot.clock),
        None => format!("{EMPTY_SCREEN}  ({phase})"),
    }
}
