//! IntakeSession: the synchronous core of the wizard.
//!
//! Holds the step cursor, the record being built, and the transcript. One
//! instance per user session; nothing is shared between sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{FieldUpdate, IntakeRecord};
use super::prompts;
use super::state::Step;

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Anna,
}

/// One line of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Where the session is relative to the generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Answering questions, or parked at the confirmation step.
    #[default]
    Collecting,
    /// Confirmed; the generation call is in flight and input is refused.
    Generating,
    /// Generation succeeded; the record is final.
    Complete,
}

/// What a single submission did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing happened: blank input, or the session is not accepting input.
    Ignored,
    /// The answer was stored and the cursor moved to `step`.
    Advanced {
        step: Step,
        prompt: Option<&'static str>,
    },
    /// Confirmation was not affirmative; still at the terminal step.
    Declined { reprompt: &'static str },
    /// Affirmative confirmation. The caller must run generation with this
    /// record and then call [`IntakeSession::finish_generation`].
    Confirmed(IntakeRecord),
}

#[derive(Debug, Clone)]
pub struct IntakeSession {
    id: Uuid,
    step: Step,
    record: IntakeRecord,
    status: SessionStatus,
    transcript: Vec<Turn>,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeSession {
    /// Fresh session at the first step with a default record.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::default(),
            record: IntakeRecord::default(),
            status: SessionStatus::default(),
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Process one user answer.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.status != SessionStatus::Collecting {
            debug!(session = %self.id, status = ?self.status, "Input refused");
            return SubmitOutcome::Ignored;
        }

        self.push_turn(Speaker::User, text);

        let entry = self.step.entry();
        let update = (entry.parse)(trimmed, &self.record);

        // Only the terminal step has no successor.
        let Some(next) = self.step.next() else {
            return self.confirm(update);
        };

        debug!(session = %self.id, step = %self.step, ?update, "Applying answer");
        self.record.apply(update);
        self.step = next;
        info!(session = %self.id, step = %next, "Intake advanced");

        let prompt = next.entry().prompt();
        if let Some(p) = prompt {
            self.push_turn(Speaker::Anna, p);
        }
        SubmitOutcome::Advanced { step: next, prompt }
    }

    fn confirm(&mut self, update: FieldUpdate) -> SubmitOutcome {
        if matches!(update, FieldUpdate::Confirm(true)) {
            self.status = SessionStatus::Generating;
            info!(session = %self.id, "Intake confirmed");
            SubmitOutcome::Confirmed(self.record.clone())
        } else {
            self.push_turn(Speaker::Anna, prompts::CONFIRM_AGAIN);
            SubmitOutcome::Declined {
                reprompt: prompts::CONFIRM_AGAIN,
            }
        }
    }

    /// Close out a generation started by [`SubmitOutcome::Confirmed`].
    ///
    /// On failure the session stays at the confirmation step so another
    /// affirmative answer retries.
    pub fn finish_generation(&mut self, succeeded: bool) {
        if self.status != SessionStatus::Generating {
            return;
        }
        self.status = if succeeded {
            SessionStatus::Complete
        } else {
            SessionStatus::Collecting
        };
        info!(session = %self.id, status = ?self.status, "Generation finished");
    }

    /// Record a line Anna said outside the step prompts.
    pub fn note(&mut self, text: &str) {
        self.push_turn(Speaker::Anna, text);
    }

    fn push_turn(&mut self, speaker: Speaker, text: &str) {
        self.transcript.push(Turn {
            speaker,
            text: text.to_string(),
            at: Utc::now(),
        });
    }
}
