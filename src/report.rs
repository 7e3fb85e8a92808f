//! Result reporting: hands the terminal result of a session to an external sink.
//!
//! The game core performs no I/O. [`ReportingObserver`] subscribes to a
//! session and forwards the one terminal result, together with the player's
//! entry-form details, to a [`ResultReporter`].

use std::io::Write;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::games::scratch::{Outcome, SessionObserver, SessionResult};

/// Player details collected by the entry form.
#[derive(Debug, Clone, PartialEq, Eq, new, Getters, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Display name.
    name: String,
    /// Contact email.
    email: String,
    /// Contact phone.
    phone: String,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            email: UNKNOWN.to_string(),
            phone: UNKNOWN.to_string(),
        }
    }
}

const UNKNOWN: &str = "Unknown";

/// One reported session, as written to the result sink.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Player name.
    name: String,
    /// Player email.
    email: String,
    /// Player phone.
    phone: String,
    /// `"Win"` or `"Lose"`.
    game_result: String,
    /// Matched prize id, or `"None"` on a loss.
    prize_won: String,
}

impl ResultRecord {
    /// Builds the record for a finished session.
    ///
    /// Returns `None` for a result that is still `InProgress`; only terminal
    /// results are reportable.
    #[instrument(skip(profile, result), fields(outcome = %result.outcome()))]
    pub fn from_result(profile: &PlayerProfile, result: &SessionResult) -> Option<Self> {
        let game_result = match result.outcome() {
            Outcome::Won => "Win",
            Outcome::Lost => "Lose",
            Outcome::InProgress => {
                warn!("Result of an unfinished session is not reportable");
                return None;
            }
        };
        let prize_won = result
            .matched_prize()
            .as_ref()
            .map(|prize| prize.to_string())
            .unwrap_or_else(|| "None".to_string());

        Some(Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            game_result: game_result.to_string(),
            prize_won,
        })
    }
}

/// Reporting error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Report error: {} at {}:{}", message, file, line)]
pub struct ReportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ReportError {
    /// Creates a new report error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ReportError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for ReportError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Serialization error: {}", err))
    }
}

/// Destination for session results.
pub trait ResultReporter {
    /// Persists or transmits one record.
    fn report(&mut self, record: &ResultRecord) -> Result<(), ReportError>;
}

/// Writes each record as one JSON line.
#[derive(Debug)]
pub struct JsonLinesReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesReporter<W> {
    /// Creates a reporter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultReporter for JsonLinesReporter<W> {
    #[instrument(skip(self, record), fields(result = %record.game_result))]
    fn report(&mut self, record: &ResultRecord) -> Result<(), ReportError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        info!("Result reported");
        Ok(())
    }
}

/// Session observer that reports the terminal result at most once.
#[derive(Debug)]
pub struct ReportingObserver<R: ResultReporter> {
    reporter: R,
    profile: PlayerProfile,
    sent: bool,
}

impl<R: ResultReporter> ReportingObserver<R> {
    /// Creates an observer for `profile`, reporting through `reporter`.
    pub fn new(reporter: R, profile: PlayerProfile) -> Self {
        Self {
            reporter,
            profile,
            sent: false,
        }
    }

    /// Returns true once a result has been handed to the reporter.
    pub fn is_sent(&self) -> bool {
        self.sent
    }
}

impl<R: ResultReporter> SessionObserver for ReportingObserver<R> {
    fn on_finished(&mut self, result: &SessionResult) {
        if self.sent {
            warn!("Result already reported; ignoring");
            return;
        }
        let Some(record) = ResultRecord::from_result(&self.profile, result) else {
            return;
        };
        self.sent = true;

        if let Err(e) = self.reporter.report(&record) {
            warn!(error = %e, "Failed to report session result");
        }
    }
}
