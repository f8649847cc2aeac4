use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::common::{ImageRef, UserId};
use crate::domains::submissions::actions::{accept_caption, complete_guided};
use crate::domains::submissions::effects::publish_drafts;
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::events::{BotCommand, CallbackAction, InboundEvent};
use crate::domains::submissions::machines::{
    GuidedInput, GuidedSubmissionMachine, GuidedTransition, RejectReason,
};
use crate::domains::submissions::messages;
use crate::domains::submissions::models::{GuidedStep, PendingDraft, SessionState};
use crate::kernel::{Outbound, OutboundContent, ServerDeps};

/// Replies to one inbound event and the session state it left behind.
///
/// Channel posts made while confirming are delivered inside `handle` and are
/// not part of the directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome {
    pub directives: Vec<Outbound>,
    /// Session state after the event.
    pub state: SessionState,
}

/// Routes one user's events through the submission flows.
///
/// Callers must not run two events for the same user concurrently.
pub struct SubmissionHandler {
    deps: Arc<ServerDeps>,
    machine: GuidedSubmissionMachine,
}

impl SubmissionHandler {
    pub fn new(deps: Arc<ServerDeps>) -> Self {
        Self {
            deps,
            machine: GuidedSubmissionMachine::new(),
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    pub async fn handle(&self, user_id: UserId, event: InboundEvent) -> HandlerOutcome {
        let replies = match event {
            InboundEvent::Command(BotCommand::Start) => vec![messages::main_menu()],
            InboundEvent::Callback(action) => self.on_callback(user_id, action).await,
            InboundEvent::Text(text) => self.on_text(user_id, text).await,
            InboundEvent::Photo { image, caption } => self.on_photo(user_id, image, caption).await,
        };

        HandlerOutcome {
            directives: replies
                .into_iter()
                .map(|content| Outbound::to_user(user_id, content))
                .collect(),
            state: self.deps.sessions.state(user_id).await,
        }
    }

    async fn on_callback(&self, user_id: UserId, action: CallbackAction) -> Vec<OutboundContent> {
        let sessions = &self.deps.sessions;
        debug!(user_id, action = action.as_data(), "callback");

        match action {
            CallbackAction::QuickPost => vec![messages::quick_post_template()],
            CallbackAction::PostInfo => vec![messages::post_info()],
            CallbackAction::BackToMain => vec![messages::main_menu()],
            CallbackAction::StepPost => {
                sessions
                    .set_state(user_id, SessionState::start_collecting())
                    .await;
                vec![messages::guided_started()]
            }
            CallbackAction::MyPosts => vec![messages::my_posts(&sessions.drafts(user_id).await)],
            CallbackAction::ClearPosts => {
                sessions.clear_drafts(user_id).await;
                vec![
                    OutboundContent::text(messages::POSTS_CLEARED),
                    messages::main_menu(),
                ]
            }
            CallbackAction::EditPost => {
                sessions.clear_drafts(user_id).await;
                vec![OutboundContent::text(messages::EDIT_POST)]
            }
            CallbackAction::CancelPost => {
                sessions.clear_drafts(user_id).await;
                vec![
                    OutboundContent::text(messages::POST_CANCELLED),
                    messages::main_menu(),
                ]
            }
            CallbackAction::CancelStepPost => {
                sessions.set_state(user_id, SessionState::Idle).await;
                vec![
                    OutboundContent::text(messages::GUIDED_CANCELLED),
                    messages::main_menu(),
                ]
            }
            CallbackAction::ConfirmPost => self.confirm(user_id).await,
        }
    }

    async fn confirm(&self, user_id: UserId) -> Vec<OutboundContent> {
        let sessions = &self.deps.sessions;
        let drafts = sessions.drafts(user_id).await;
        if drafts.is_empty() {
            return vec![OutboundContent::text(messages::NO_DRAFTS_TO_PUBLISH)];
        }

        let report = publish_drafts(user_id, &drafts, &self.deps).await;
        sessions.remove_drafts(user_id, report.processed).await;

        let summary = OutboundContent::text(messages::publish_summary(
            report.delivered,
            report.failure_count(),
            &report.unrecognized,
        ));

        match report.aborted {
            Some(error) if report.processed == 0 => vec![OutboundContent::text(error.user_message())],
            Some(error) => vec![summary, OutboundContent::text(error.user_message())],
            None => vec![summary, messages::main_menu()],
        }
    }

    async fn on_text(&self, user_id: UserId, text: String) -> Vec<OutboundContent> {
        let state = self.deps.sessions.state(user_id).await;
        match self.machine.decide(&state, GuidedInput::Text(text)) {
            GuidedTransition::NotCollecting => vec![messages::malformed_caption()],
            transition => self.apply_guided(user_id, &state, transition).await,
        }
    }

    async fn on_photo(
        &self,
        user_id: UserId,
        image: ImageRef,
        caption: Option<String>,
    ) -> Vec<OutboundContent> {
        let state = self.deps.sessions.state(user_id).await;
        if !state.is_idle() {
            let transition = self.machine.decide(&state, GuidedInput::Image(image));
            return self.apply_guided(user_id, &state, transition).await;
        }

        let caption = match caption.filter(|c| !c.trim().is_empty()) {
            Some(caption) => caption,
            None => return vec![messages::malformed_caption()],
        };

        match accept_caption(&caption, &self.deps.policy) {
            Ok(canonical) => self.store_draft(user_id, image, canonical).await,
            Err(e) => {
                warn!(user_id, error = %e, "caption rejected");
                vec![rejection(&e)]
            }
        }
    }

    async fn apply_guided(
        &self,
        user_id: UserId,
        state: &SessionState,
        transition: GuidedTransition,
    ) -> Vec<OutboundContent> {
        let sessions = &self.deps.sessions;

        match transition {
            GuidedTransition::Advanced {
                recorded,
                next,
                state,
            } => {
                debug!(user_id, step = %recorded, "guided step recorded");
                sessions.set_state(user_id, state).await;
                vec![messages::guided_step_recorded(recorded, next)]
            }
            GuidedTransition::Rejected { reason, .. } => {
                let cursor = state.cursor().unwrap_or(GuidedStep::Name);
                match (reason, cursor) {
                    (RejectReason::WrongModality, GuidedStep::AwaitingImage) => {
                        vec![OutboundContent::text(messages::PHOTO_REQUIRED)]
                    }
                    (RejectReason::WrongModality, step) => {
                        vec![messages::guided_reprompt(step.prompt())]
                    }
                    (RejectReason::NoLinks, _) => {
                        vec![messages::guided_reprompt(messages::NO_LINKS_IN_STEP)]
                    }
                }
            }
            GuidedTransition::Completed { record, image } => {
                sessions.set_state(user_id, SessionState::Idle).await;
                match complete_guided(&record, &self.deps.policy) {
                    Ok(caption) => self.store_draft(user_id, image, caption).await,
                    Err(e) => {
                        warn!(user_id, error = %e, "guided submission rejected");
                        vec![rejection(&e)]
                    }
                }
            }
            GuidedTransition::NotCollecting => vec![messages::malformed_caption()],
        }
    }

    async fn store_draft(
        &self,
        user_id: UserId,
        image: ImageRef,
        caption: String,
    ) -> Vec<OutboundContent> {
        let sessions = &self.deps.sessions;
        sessions
            .push_draft(user_id, PendingDraft::new(image, caption))
            .await;
        let drafts = sessions.drafts(user_id).await;
        info!(user_id, pending = drafts.len(), "draft accepted");
        vec![messages::draft_preview(&drafts)]
    }
}

fn rejection(error: &SubmissionError) -> OutboundContent {
    match error {
        SubmissionError::MalformedCaption => messages::malformed_caption(),
        other => OutboundContent::text(other.user_message()),
    }
}
