//! Guided submission machine - pure state transitions, no IO.
//!
//! One field per message, in [`GuidedStep::ORDER`]. The handler persists the
//! returned state and turns the transition into replies.

use crate::common::ImageRef;
use crate::domains::submissions::extraction::extract_link_lines;
use crate::domains::submissions::models::{GuidedStep, SessionState, SubmissionRecord};

/// Input for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedInput {
    Text(String),
    Image(ImageRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Text where an image was expected, or the other way round.
    WrongModality,
    /// Links step with no URL in the message.
    NoLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedTransition {
    /// Field stored, cursor moved on.
    Advanced {
        recorded: GuidedStep,
        next: GuidedStep,
        state: SessionState,
    },
    /// Input not accepted; state unchanged.
    Rejected {
        reason: RejectReason,
        state: SessionState,
    },
    /// Cover image received. The session goes back to `Idle`.
    Completed {
        record: SubmissionRecord,
        image: ImageRef,
    },
    /// The user is not in a guided flow.
    NotCollecting,
}

pub struct GuidedSubmissionMachine;

impl GuidedSubmissionMachine {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(&self, state: &SessionState, input: GuidedInput) -> GuidedTransition {
        let SessionState::Collecting { cursor, partial } = state else {
            return GuidedTransition::NotCollecting;
        };
        let cursor = *cursor;

        let reject = |reason| GuidedTransition::Rejected {
            reason,
            state: state.clone(),
        };

        match (cursor, input) {
            (GuidedStep::AwaitingImage, GuidedInput::Image(image)) => GuidedTransition::Completed {
                record: partial.clone(),
                image,
            },
            (GuidedStep::AwaitingImage, GuidedInput::Text(_)) => {
                reject(RejectReason::WrongModality)
            }
            (_, GuidedInput::Image(_)) => reject(RejectReason::WrongModality),
            (step, GuidedInput::Text(text)) => {
                let mut partial = partial.clone();
                if let Err(reason) = record_field(step, &text, &mut partial) {
                    return reject(reason);
                }

                let next = step.next().unwrap_or(GuidedStep::AwaitingImage);
                GuidedTransition::Advanced {
                    recorded: step,
                    next,
                    state: SessionState::Collecting {
                        cursor: next,
                        partial,
                    },
                }
            }
        }
    }
}

fn record_field(
    step: GuidedStep,
    text: &str,
    partial: &mut SubmissionRecord,
) -> Result<(), RejectReason> {
    match step {
        GuidedStep::Name => partial.name = text.trim().to_string(),
        GuidedStep::Description => partial.description = text.trim().to_string(),
        GuidedStep::Links => {
            let links = extract_link_lines(text);
            if links.is_empty() {
                return Err(RejectReason::NoLinks);
            }
            partial.links = links;
        }
        GuidedStep::Size => partial.size = text.trim().to_string(),
        GuidedStep::Tags => partial.tags = text.trim().to_string(),
        GuidedStep::AwaitingImage => return Err(RejectReason::WrongModality),
    }
    Ok(())
}

impl Default for GuidedSubmissionMachine {
    fn default() -> Self {
        Self::new()
    }
}
