//! Input gating for the analyze action.
//!
//! Lengths are counted in Unicode scalar values, so a pasted emoji counts
//! once.

use crate::models::{ValidateResponse, ValidationWarningBody};

/// Minimum number of characters before analysis is allowed.
pub const MIN_CHAR_COUNT: usize = 40;
/// Length at which an advisory (non-blocking) warning is shown.
pub const SOFT_MAX_CHAR_COUNT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationWarning {
    TooShort { current: usize, required: usize },
    TooLong { current: usize },
}

impl ValidationWarning {
    /// Whether this warning keeps the analyze action disabled.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ValidationWarning::TooShort { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ValidationWarning::TooShort { .. } => "tooShort",
            ValidationWarning::TooLong { .. } => "tooLong",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationWarning::TooShort { current, required } => format!(
                "Input is too short ({}/{} chars). Analysis works best with full bios or multiple posts.",
                current, required
            ),
            ValidationWarning::TooLong { .. } => {
                "Input is very long. Results may be truncated for the summary.".to_string()
            }
        }
    }
}

/// Snapshot of the validation state for one input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCheck {
    pub char_count: usize,
    pub is_blank: bool,
    pub warning: Option<ValidationWarning>,
}

impl InputCheck {
    /// Whether the input alone permits analysis. The in-flight gate is
    /// layered on top by the session.
    pub fn permits_analysis(&self) -> bool {
        !self.is_blank && !self.warning.map(|w| w.is_blocking()).unwrap_or(false)
    }

    pub fn to_response(&self, in_flight: bool) -> ValidateResponse {
        ValidateResponse {
            char_count: self.char_count,
            min_chars: MIN_CHAR_COUNT,
            warning: self.warning.map(|w| ValidationWarningBody {
                kind: w.kind().to_string(),
                message: w.message(),
                blocking: w.is_blocking(),
            }),
            can_analyze: self.permits_analysis() && !in_flight,
        }
    }
}

pub fn check_input(text: &str) -> InputCheck {
    let char_count = text.chars().count();
    let warning = if char_count > 0 && char_count < MIN_CHAR_COUNT {
        Some(ValidationWarning::TooShort {
            current: char_count,
            required: MIN_CHAR_COUNT,
        })
    } else if char_count >= SOFT_MAX_CHAR_COUNT {
        Some(ValidationWarning::TooLong {
            current: char_count,
        })
    } else {
        None
    };

    InputCheck {
        char_count,
        is_blank: text.trim().is_empty(),
        warning,
    }
}

/// Reason a submission is refused before it reaches the inference client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    Blank,
    TooShort,
    InFlight,
}

impl SubmitRejection {
    pub fn message(&self) -> String {
        match self {
            SubmitRejection::Blank => "Please paste a bio or profile excerpt to analyze.".to_string(),
            SubmitRejection::TooShort => format!(
                "Please provide more detail. At least {} characters are needed.",
                MIN_CHAR_COUNT
            ),
            SubmitRejection::InFlight => "An analysis is already in progress.".to_string(),
        }
    }
}

/// Gate applied when the user actually submits.
pub fn check_submission(text: &str) -> Result<(), SubmitRejection> {
    if text.trim().is_empty() {
        return Err(SubmitRejection::Blank);
    }
    if text.chars().count() < MIN_CHAR_COUNT {
        return Err(SubmitRejection::TooShort);
    }
    Ok(())
}
