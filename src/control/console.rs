//! Line commands understood by the admin console.

use thiserror::Error;

use super::{TimerCommand, score::Side};
use crate::dto::matches::CreateMatchRequest;

/// Help text printed by `help` and on unknown input.
pub const HELP: &str = "commands: start | pause | reset | end | home +N | home -N | away +N | away -N \
     | new <home> vs <away> @ <stadium> / <week> | clear | show | quit";

/// One parsed console line.
#[derive(Debug, Clone)]
pub enum AdminCommand {
    /// Forwarded to the timer driver.
    Timer(TimerCommand),
    Score { side: Side, delta: i32 },
    /// Create a match, replacing the current one.
    New(CreateMatchRequest),
    /// Delete the match on screen.
    Clear,
    Show,
    Help,
    Quit,
}

/// Why a console line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("score change must be a signed integer such as +1 or -2 (got `{0}`)")]
    BadDelta(String),
    #[error("usage: new <home> vs <away> @ <stadium> / <week>")]
    BadNew,
}

impl AdminCommand {
    /// Parse one trimmed line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "start" => AdminCommand::Timer(TimerCommand::Start),
            "pause" => AdminCommand::Timer(TimerCommand::Pause),
            "reset" => AdminCommand::Timer(TimerCommand::Reset),
            "end" => AdminCommand::Timer(TimerCommand::End),
            "home" => AdminCommand::Score {
                side: Side::Home,
                delta: parse_delta(rest)?,
            },
            "away" => AdminCommand::Score {
                side: Side::Away,
                delta: parse_delta(rest)?,
            },
            "new" => AdminCommand::New(parse_new(rest)?),
            "clear" => AdminCommand::Clear,
            "show" => AdminCommand::Show,
            "help" | "?" => AdminCommand::Help,
            "quit" | "exit" => AdminCommand::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(Some(command))
    }
}

fn parse_delta(raw: &str) -> Result<i32, CommandError> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    digits
        .parse::<i32>()
        .map_err(|_| CommandError::BadDelta(raw.to_owned()))
}

fn parse_new(raw: &str) -> Result<CreateMatchRequest, CommandError> {
    let (teams, venue) = raw.split_once('@').ok_or(CommandError::BadNew)?;
    let (home, away) = teams.split_once(" vs ").ok_or(CommandError::BadNew)?;
    let (stadium, week) = venue.split_once('/').ok_or(CommandError::BadNew)?;

    let parts = [home.trim(), away.trim(), stadium.trim(), week.trim()];
    if parts.iter().any(|part| part.is_empty()) {
        return Err(CommandError::BadNew);
    }
    let [home, away, stadium, week] = parts;
    Ok(CreateMatchRequest::new(home, away, stadium, week))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_commands() {
        assert!(matches!(
            AdminCommand::parse(" Pause "),
            Ok(Some(AdminCommand::Timer(TimerCommand::Pause)))
        ));
        assert!(matches!(AdminCommand::parse(""), Ok(None)));
    }

    #[test]
    fn score_commands_accept_signed_deltas() {
        assert!(matches!(
            AdminCommand::parse("home +3"),
            Ok(Some(AdminCommand::Score { side: Side::Home, delta: 3 }))
        ));
        assert!(matches!(
            AdminCommand::parse("away -1"),
            Ok(Some(AdminCommand::Score { side: Side::Away, delta: -1 }))
        ));
        assert_eq!(
            AdminCommand::parse("away lots").unwrap_err(),
            CommandError::BadDelta("lots".into())
        );
    }

    #[test]
    fn new_match_command() {
        let Ok(Some(AdminCommand::New(request))) =
            AdminCommand::parse("new Red Lions vs Blue Tigers @ City Arena / 7")
        else {
            panic!("expected a new match command");
        };
        assert_eq!(request.home_team, "Red Lions");
        assert_eq!(request.away_team, "Blue Tigers");
        assert_eq!(request.stadium, "City Arena");
        assert_eq!(request.week, "7");
        assert_eq!(request.time, "00:00");
        assert!(request.is_live);
    }

    #[test]
    fn malformed_new_match_command() {
        assert_eq!(
            AdminCommand::parse("new Lions @ Arena / 1").unwrap_err(),
            CommandError::BadNew
        );
        assert_eq!(
            AdminCommand::parse("new Lions vs  @ Arena / 1").unwrap_err(),
            CommandError::BadNew
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            AdminCommand::parse("dance").unwrap_err(),
            CommandError::Unknown("dance".into())
        );
    }
}
