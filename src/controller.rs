//! Application state controller
//!
//! Owns the analysis lifecycle: `Idle -> InFlight -> Succeeded | Failed`,
//! and back to `Idle` on reset. Transitions are published through a
//! `watch` channel so a presentation layer can follow them.

use crate::analysis::{AnalysisRequest, AnalysisResult, Analyzer};
use crate::error::{Result, ResumeAtsError};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Default minimum length of each text before submission is allowed.
///
/// Inclusive: a text of exactly this many trimmed characters is admitted.
pub const DEFAULT_MIN_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    InFlight,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl AnalysisState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, AnalysisState::InFlight)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Minimum-length gate applied before a submission is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub min_chars: usize,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self { min_chars: DEFAULT_MIN_CHARS }
    }
}

impl AdmissionPolicy {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Character count after trimming surrounding whitespace.
    pub fn measure(text: &str) -> usize {
        text.trim().chars().count()
    }

    pub fn permits(&self, resume_text: &str, job_description_text: &str) -> bool {
        self.check(resume_text, job_description_text).is_ok()
    }

    pub fn check(&self, resume_text: &str, job_description_text: &str) -> Result<()> {
        for (label, text) in [("Job description", job_description_text), ("Resume", resume_text)] {
            let length = Self::measure(text);
            if length < self.min_chars {
                return Err(ResumeAtsError::InvalidInput(format!(
                    "{} needs at least {} characters (has {})",
                    label, self.min_chars, length
                )));
            }
        }
        Ok(())
    }
}

pub struct AnalysisController<A> {
    analyzer: A,
    admission: AdmissionPolicy,
    state: watch::Sender<AnalysisState>,
    // Bumped on every submit and reset, always under the watch lock.
    generation: AtomicU64,
}

impl<A: Analyzer> AnalysisController<A> {
    pub fn new(analyzer: A, admission: AdmissionPolicy) -> Self {
        let (state, _) = watch::channel(AnalysisState::Idle);
        Self {
            analyzer,
            admission,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state.subscribe()
    }

    pub fn admission(&self) -> AdmissionPolicy {
        self.admission
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Whether a submit with these texts would be accepted right now.
    pub fn can_submit(&self, resume_text: &str, job_description_text: &str) -> bool {
        self.admission.permits(resume_text, job_description_text)
            && matches!(*self.state.borrow(), AnalysisState::Idle | AnalysisState::Failed(_))
    }

    /// Run one analysis and return the state it settled in.
    ///
    /// Accepted only from `Idle` or `Failed`. If `reset` is called while the
    /// request is in flight, its outcome is dropped and the state stays `Idle`.
    pub async fn submit(&self, resume_text: &str, job_description_text: &str) -> Result<AnalysisState> {
        self.admission.check(resume_text, job_description_text)?;

        let mut rejection = None;
        let mut generation = 0;
        self.state.send_if_modified(|state| match state {
            AnalysisState::InFlight => {
                rejection = Some(ResumeAtsError::AnalysisInProgress);
                false
            }
            AnalysisState::Succeeded(_) => {
                rejection = Some(ResumeAtsError::InvalidInput(
                    "A result is already displayed; reset before starting a new analysis".to_string(),
                ));
                false
            }
            AnalysisState::Idle | AnalysisState::Failed(_) => {
                generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                *state = AnalysisState::InFlight;
                true
            }
        });
        if let Some(err) = rejection {
            warn!("Submit rejected: {}", err);
            return Err(err);
        }
        debug!("Analysis #{} in flight", generation);

        // Returns the state to `Idle` if this future is dropped before settling.
        let guard = InFlightGuard {
            state: &self.state,
            generation: &self.generation,
            id: generation,
            settled: false,
        };

        let request = AnalysisRequest::new(resume_text, job_description_text);
        let next = match self.analyzer.analyze(&request).await {
            Ok(result) => {
                info!("Analysis #{} succeeded with score {}", generation, result.score);
                AnalysisState::Succeeded(result)
            }
            Err(err) => {
                error!("Analysis #{} failed: {}", generation, err);
                AnalysisState::Failed(err.user_message())
            }
        };

        if !guard.settle(next) {
            debug!("Analysis #{} settled after a reset; outcome discarded", generation);
        }

        Ok(self.state())
    }

    /// Return to `Idle` from any state, discarding any result or error.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = AnalysisState::Idle;
        });
        debug!("Analysis state reset");
    }
}

struct InFlightGuard<'a> {
    state: &'a watch::Sender<AnalysisState>,
    generation: &'a AtomicU64,
    id: u64,
    settled: bool,
}

impl InFlightGuard<'_> {
    /// Publish `next` if no reset happened since this request started.
    fn settle(mut self, next: AnalysisState) -> bool {
        self.settled = true;
        self.replace_if_current(next)
    }

    fn replace_if_current(&self, next: AnalysisState) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) == self.id && state.is_in_flight() {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled && self.replace_if_current(AnalysisState::Idle) {
            warn!("Analysis #{} was cancelled before it settled", self.id);
        }
    }
}
