//! Per-form request state and the form/result view toggle.

use crate::chart::Chart;
use crate::client::{ReadingError, ReadingSource};
use crate::form::{prepare_submission, SubmitBlocked, Submission};
use crate::models::{BirthInput, Coordinates, DisplayInfo, ReadingResult};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

/// Lifecycle of one fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Result,
}

/// A completed reading as shown on the result view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub display: DisplayInfo,
    pub result: ReadingResult,
    pub chart: Chart,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Blocked(#[from] SubmitBlocked),
    #[error("failed to fetch reading: {0}")]
    Fetch(#[from] ReadingError),
}

/// Owns the request state for a single intake form.
///
/// At most one request is in flight: [`ReadingSession::begin`] refuses while
/// the state is `Loading`. A failed fetch drops any previous result so the
/// view falls back to the form.
pub struct ReadingSession<S> {
    source: S,
    state: RequestState<Reading>,
    pending: Option<DisplayInfo>,
}

impl<S: ReadingSource> ReadingSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RequestState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> &RequestState<Reading> {
        &self.state
    }

    pub fn view(&self) -> View {
        match self.state {
            RequestState::Success(_) => View::Result,
            _ => View::Form,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Validate the form and move to `Loading`.
    pub fn begin(
        &mut self,
        input: &BirthInput,
        coordinates: Option<Coordinates>,
    ) -> Result<Submission, SubmitBlocked> {
        if self.state.is_loading() {
            return Err(SubmitBlocked::InFlight);
        }
        let submission = prepare_submission(input, coordinates)?;
        self.pending = Some(submission.display.clone());
        self.state = RequestState::Loading;
        Ok(submission)
    }

    /// Record the outcome of the request started by [`ReadingSession::begin`].
    pub fn complete(
        &mut self,
        outcome: Result<ReadingResult, ReadingError>,
    ) -> &RequestState<Reading> {
        let display = self.pending.take();
        self.state = match (outcome, display) {
            (Ok(result), Some(display)) => {
                let chart = Chart::from_result(&result);
                info!("Reading ready with {} rows", chart.len());
                RequestState::Success(Reading {
                    display,
                    result,
                    chart,
                })
            }
            (Ok(_), None) => RequestState::Idle,
            (Err(e), _) => {
                error!("Failed to get reading: {}", e);
                RequestState::Error(e.to_string())
            }
        };
        &self.state
    }

    /// Validate, fetch once, and store the outcome.
    pub async fn submit(
        &mut self,
        input: &BirthInput,
        coordinates: Option<Coordinates>,
    ) -> Result<&Reading, SessionError> {
        let submission = self.begin(input, coordinates)?;
        let outcome = self.source.fetch_reading(&submission.request).await;
        let fetch_error = outcome.as_ref().err().cloned();
        self.complete(outcome);
        if let Some(e) = fetch_error {
            return Err(SessionError::Fetch(e));
        }
        self.state.value().ok_or_else(|| {
            SessionError::Fetch(ReadingError::Decode("no result stored".to_string()))
        })
    }

    /// Back to an empty form
    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
        self.pending = None;
    }
}
