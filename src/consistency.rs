//! Simulated LinkedIn profile consistency check.
//!
//! This is a demo placeholder, not an analysis. The score is drawn at random
//! from [`SIMULATED_RANGE`] and is unrelated to the profile text and to any
//! compatibility result. Every rendering of it must carry the
//! [`SIMULATION_LABEL`].

use crate::error::{Result, ResumeAtsError};
use rand::Rng;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const SIMULATED_RANGE: RangeInclusive<u8> = 60..=95;

pub const SIMULATION_LABEL: &str = "SIMULATED - illustrative score, no real comparison performed";

/// Delay used by the CLI to mimic a check in progress.
pub const SIMULATED_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulatedConsistency {
    pub score: u8,
}

impl SimulatedConsistency {
    pub fn label(&self) -> &'static str {
        SIMULATION_LABEL
    }
}

/// Draw a simulated score. Only checks that some profile text was given.
pub fn simulate<R: Rng + ?Sized>(profile_text: &str, rng: &mut R) -> Result<SimulatedConsistency> {
    if profile_text.trim().is_empty() {
        return Err(ResumeAtsError::InvalidInput(
            "Paste your LinkedIn About or experience section first".to_string(),
        ));
    }
    Ok(SimulatedConsistency {
        score: rng.gen_range(SIMULATED_RANGE),
    })
}

/// Wait `delay`, then draw a score from the thread-local generator.
pub async fn run_simulated_check(profile_text: &str, delay: Duration) -> Result<SimulatedConsistency> {
    tokio::time::sleep(delay).await;
    let mut rng = rand::thread_rng();
    simulate(profile_text, &mut rng)
}
