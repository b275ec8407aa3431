use crate::errors::ANALYSIS_FAILED_MESSAGE;
use crate::gemini_client::AnalysisError;
use crate::models::FootprintData;
use crate::validation::{check_input, check_submission, InputCheck, SubmitRejection};

/// Bio preloaded by the "Sample" action.
pub const SAMPLE_BIO: &str = "Alex Rivera | Senior Cloud Architect @ DataFlow Systems | Seattle. 8 years in distributed systems. AWS Certified. Regular speaker at CloudCon. Passionate about open-source security. Active contributor to Kubernetes. Often posts about serverless architecture and remote work culture on LinkedIn.";

/// Proof that an analysis was started, tied to the session generation it
/// was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

/// UI state for one user session: the input box, the in-flight flag, the
/// last error and the current result.
///
/// At most one analysis runs at a time. A reset does not cancel a running
/// call; it bumps the generation so the late result is dropped on arrival.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    input: String,
    in_flight: bool,
    error: Option<String>,
    result: Option<FootprintData>,
    generation: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(text: impl Into<String>) -> Self {
        Self {
            input: text.into(),
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn load_sample(&mut self) {
        self.input = SAMPLE_BIO.to_string();
        self.error = None;
    }

    pub fn validation(&self) -> InputCheck {
        check_input(&self.input)
    }

    /// Whether the analyze action is enabled right now.
    pub fn can_analyze(&self) -> bool {
        !self.in_flight && self.validation().permits_analysis()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&FootprintData> {
        self.result.as_ref()
    }

    /// Starts an analysis of the current input.
    ///
    /// A too-short input records the descriptive error; blank input is
    /// refused silently, as the action is simply unavailable.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, SubmitRejection> {
        if self.in_flight {
            return Err(SubmitRejection::InFlight);
        }
        if let Err(rejection) = check_submission(&self.input) {
            if rejection == SubmitRejection::TooShort {
                self.error = Some(rejection.message());
            }
            return Err(rejection);
        }

        self.in_flight = true;
        self.error = None;
        Ok(AnalysisTicket {
            generation: self.generation,
        })
    }

    /// Records the outcome of a started analysis. Returns `false` when the
    /// outcome was discarded because the session was reset meanwhile.
    pub fn complete(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<FootprintData, AnalysisError>,
    ) -> bool {
        self.in_flight = false;

        if ticket.generation != self.generation {
            tracing::debug!("Discarding analysis result from before a reset");
            return false;
        }

        match outcome {
            Ok(data) => {
                self.result = Some(data);
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Analysis failed: {}", e);
                self.error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// "Analyze new data": forget the result, the input and any error.
    pub fn reset(&mut self) {
        self.result = None;
        self.input.clear();
        self.error = None;
        self.generation += 1;
    }
}
