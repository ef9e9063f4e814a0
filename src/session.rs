//! Interactive session: the terminal counterpart of the input form,
//! loading indicator, error banner and results dashboard.

use crate::analysis::Analyzer;
use crate::consistency;
use crate::controller::{AdmissionPolicy, AnalysisController, AnalysisState};
use crate::error::{Result, ResumeAtsError};
use crate::input::InputManager;
use crate::output::ConsoleFormatter;
use std::path::PathBuf;
use std::time::Duration;

pub const HELP: &str = "\
Commands:
  resume <path>        load the resume from a .txt or .pdf file
  job <path>           load the job description from a .txt or .pdf file
  paste resume|job     paste text, finish with a line containing only '.'
  status               show input lengths and the current state
  analyze              run the compatibility analysis
  consistency          simulated LinkedIn consistency check (after a result)
  reset                discard the result and start over
  help                 show this help
  quit                 leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Resume,
    Job,
}

impl Field {
    fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "resume" | "cv" => Some(Field::Resume),
            "job" | "jd" => Some(Field::Job),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Field::Resume => "Resume",
            Field::Job => "Job description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Load(Field, PathBuf),
    Paste(Field),
    Status,
    Analyze,
    Consistency,
    Reset,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match head.to_lowercase().as_str() {
        "resume" | "job" => {
            if rest.is_empty() {
                return Err(ResumeAtsError::InvalidInput(format!(
                    "Usage: {} <path>",
                    head.to_lowercase()
                )));
            }
            let field = Field::parse(head).unwrap_or(Field::Resume);
            SessionCommand::Load(field, PathBuf::from(rest))
        }
        "paste" => match Field::parse(rest) {
            Some(field) => SessionCommand::Paste(field),
            None => {
                return Err(ResumeAtsError::InvalidInput(
                    "Usage: paste resume|job".to_string(),
                ))
            }
        },
        "status" => SessionCommand::Status,
        "analyze" | "analyse" => SessionCommand::Analyze,
        "consistency" => SessionCommand::Consistency,
        "reset" | "new" => SessionCommand::Reset,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => {
            return Err(ResumeAtsError::InvalidInput(format!(
                "Unknown command '{}'. Type 'help' for the list of commands.",
                other
            )))
        }
    };
    Ok(Some(command))
}

pub struct InteractiveSession<A> {
    controller: AnalysisController<A>,
    inputs: InputManager,
    console: ConsoleFormatter,
    resume_text: String,
    job_text: String,
    consistency_delay: Duration,
}

impl<A: Analyzer> InteractiveSession<A> {
    pub fn new(
        analyzer: A,
        admission: AdmissionPolicy,
        inputs: InputManager,
        console: ConsoleFormatter,
    ) -> Self {
        Self {
            controller: AnalysisController::new(analyzer, admission),
            inputs,
            console,
            resume_text: String::new(),
            job_text: String::new(),
            consistency_delay: consistency::SIMULATED_DELAY,
        }
    }

    pub fn with_consistency_delay(mut self, delay: Duration) -> Self {
        self.consistency_delay = delay;
        self
    }

    pub fn controller(&self) -> &AnalysisController<A> {
        &self.controller
    }

    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Resume => &self.resume_text,
            Field::Job => &self.job_text,
        }
    }

    /// Replace one of the two texts and describe its admission status.
    pub fn set_text(&mut self, field: Field, text: String) -> String {
        let length = AdmissionPolicy::measure(&text);
        match field {
            Field::Resume => self.resume_text = text,
            Field::Job => self.job_text = text,
        }
        self.describe_length(field, length)
    }

    fn describe_length(&self, field: Field, length: usize) -> String {
        let min = self.controller.admission().min_chars;
        if length < min {
            format!("{}: {} characters (minimum {})", field.label(), length, min)
        } else {
            format!("{}: {} characters", field.label(), length)
        }
    }

    /// Paste for a field is only meaningful while the form is shown.
    pub fn accepts_input(&self) -> bool {
        !matches!(
            self.controller.state(),
            AnalysisState::InFlight | AnalysisState::Succeeded(_)
        )
    }

    /// Run a command and return the text to display.
    ///
    /// `Quit`, `Paste` and `Consistency` need more input and are driven by
    /// the caller's read loop.
    pub async fn execute(&mut self, command: SessionCommand) -> Result<String> {
        match command {
            SessionCommand::Load(field, path) => {
                if !self.accepts_input() {
                    return Err(ResumeAtsError::InvalidInput(
                        "Reset before loading new texts".to_string(),
                    ));
                }
                let text = self.inputs.extract_text(&path).await?;
                Ok(self.set_text(field, text))
            }
            SessionCommand::Status => {
                let mut output = String::new();
                output.push_str(&self.describe_length(Field::Resume, AdmissionPolicy::measure(&self.resume_text)));
                output.push('\n');
                output.push_str(&self.describe_length(Field::Job, AdmissionPolicy::measure(&self.job_text)));
                output.push('\n');
                output.push_str(&format!(
                    "Ready to analyze: {}\n",
                    if self.controller.can_submit(&self.resume_text, &self.job_text) { "yes" } else { "no" }
                ));
                output.push_str(&self.console.render_state(&self.controller.state()));
                Ok(output)
            }
            SessionCommand::Analyze => {
                let state = self
                    .controller
                    .submit(&self.resume_text, &self.job_text)
                    .await?;
                Ok(self.console.render_state(&state))
            }
            SessionCommand::Reset => {
                self.controller.reset();
                self.inputs.clear_cache();
                self.resume_text.clear();
                self.job_text.clear();
                Ok(self.console.render_state(&AnalysisState::Idle))
            }
            SessionCommand::Help => Ok(HELP.to_string()),
            SessionCommand::Paste(_) | SessionCommand::Consistency | SessionCommand::Quit => {
                Ok(String::new())
            }
        }
    }

    pub fn has_result(&self) -> bool {
        self.controller.state().result().is_some()
    }

    /// Simulated consistency widget shown next to a result.
    pub async fn check_consistency(&self, profile_text: &str) -> Result<String> {
        if !self.has_result() {
            return Err(ResumeAtsError::InvalidInput(
                "The consistency check is available once an analysis result is shown".to_string(),
            ));
        }
        let check = consistency::run_simulated_check(profile_text, self.consistency_delay).await?;
        Ok(self.console.format_consistency(&check))
    }
}
