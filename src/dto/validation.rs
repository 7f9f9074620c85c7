//! Validation helpers for DTOs.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{clock::MatchClock, error::AppError};

/// Match fields in declaration order, used to pick the first violation deterministically.
const MATCH_FIELD_ORDER: [&str; 10] = [
    "home_team",
    "away_team",
    "home_players",
    "away_players",
    "home_score",
    "away_score",
    "time",
    "stadium",
    "week",
    "is_live",
];

/// Validates that a clock string is `MM:SS` with seconds in `00..=59`.
///
/// # Examples
///
/// ```ignore
/// validate_clock("12:00") // Ok
/// validate_clock("12:60") // Err - seconds out of range
/// validate_clock("1200")  // Err - no colon
/// ```
pub fn validate_clock(value: &str) -> Result<(), ValidationError> {
    value.parse::<MatchClock>().map(|_| ()).map_err(|err| {
        let mut error = ValidationError::new("clock_format");
        error.message = Some(err.to_string().into());
        error
    })
}

/// Rejects names made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// First violation in field declaration order, as `(camelCaseField, message)`.
pub fn first_violation(errors: &ValidationErrors) -> (String, String) {
    let field_errors = errors.field_errors();
    let mut fields: Vec<(&str, &Vec<ValidationError>)> = field_errors
        .iter()
        .map(|(name, violations)| (name.as_ref(), *violations))
        .collect();
    fields.sort_by_key(|(name, _)| {
        let rank = MATCH_FIELD_ORDER
            .iter()
            .position(|known| known == name)
            .unwrap_or(MATCH_FIELD_ORDER.len());
        (rank, name.to_string())
    });

    let Some((name, violations)) = fields.first() else {
        return ("body".into(), "invalid request body".into());
    };
    let field = to_camel_case(name);
    let message = violations
        .first()
        .and_then(|violation| violation.message.as_ref())
        .map(|message| format!("{field}: {message}"))
        .unwrap_or_else(|| format!("{field} is invalid"));
    (field, message)
}

/// JSON body extractor that also runs [`Validate`], answering 400 `{message, field}`.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    let field = match &rejection {
        JsonRejection::JsonDataError(_) => field_from_decode_error(&message),
        _ => None,
    };
    AppError::BadRequest { message, field }
}

/// Pull the offending field out of a serde decode message.
///
/// Handles `homeScore: invalid type ...` (path prefix) and ``missing field `homeTeam` ``.
fn field_from_decode_error(message: &str) -> Option<String> {
    let detail = message
        .split_once("target type: ")
        .map(|(_, detail)| detail)
        .unwrap_or(message);

    if let Some((path, _)) = detail.split_once(": ") {
        let field: String = path
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if !field.is_empty() && !path.contains(' ') {
            return Some(field);
        }
    }

    let (_, rest) = detail.split_once('`')?;
    let (field, _) = rest.split_once('`')?;
    Some(field.to_owned())
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
