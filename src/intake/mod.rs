//! Intake wizard: the question sequence that builds an `IntakeRecord`.
//!
//! Each answer is parsed by the parser for the current step, applied to the
//! record, and the cursor moves on. The last step asks for confirmation and
//! gates the call to the outfit service.

pub mod manager;
pub mod model;
pub mod parsers;
pub mod prompts;
pub mod session;
pub mod sizes;
pub mod state;

pub use manager::{IntakeController, Reply};
pub use model::{
    AccessibilityFlags, AccessibilityNeed, FieldUpdate, Gender, IntakeRecord, Sizes, Style,
    TopSize,
};
pub use session::{IntakeSession, SessionStatus, Speaker, SubmitOutcome, Turn};
pub use state::{Step, StepEntry};
