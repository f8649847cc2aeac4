use crate::common::ImageRef;

/// Inbound chat events, already stripped of transport details.
///
/// The poller translates Telegram updates into these; the handler never sees
/// raw updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Command(BotCommand),
    /// Plain text message.
    Text(String),
    /// Photo message; the caption is whatever text the submitter attached.
    Photo {
        image: ImageRef,
        caption: Option<String>,
    },
    /// Inline keyboard button press.
    Callback(CallbackAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
}

impl BotCommand {
    /// `/start` and `/start@botname`, optionally followed by a payload.
    pub fn parse(text: &str) -> Option<Self> {
        let command = text.split_whitespace().next()?;
        let command = command.split('@').next()?;
        match command {
            "/start" => Some(BotCommand::Start),
            _ => None,
        }
    }
}

/// Inline keyboard actions. The wire form is the button's callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    QuickPost,
    StepPost,
    PostInfo,
    MyPosts,
    ClearPosts,
    BackToMain,
    EditPost,
    ConfirmPost,
    CancelPost,
    CancelStepPost,
}

impl CallbackAction {
    pub const ALL: [CallbackAction; 10] = [
        CallbackAction::QuickPost,
        CallbackAction::StepPost,
        CallbackAction::PostInfo,
        CallbackAction::MyPosts,
        CallbackAction::ClearPosts,
        CallbackAction::BackToMain,
        CallbackAction::EditPost,
        CallbackAction::ConfirmPost,
        CallbackAction::CancelPost,
        CallbackAction::CancelStepPost,
    ];

    pub fn as_data(self) -> &'static str {
        match self {
            CallbackAction::QuickPost => "quick_post",
            CallbackAction::StepPost => "step_post",
            CallbackAction::PostInfo => "post_info",
            CallbackAction::MyPosts => "my_posts",
            CallbackAction::ClearPosts => "clear_posts",
            CallbackAction::BackToMain => "back_to_main",
            CallbackAction::EditPost => "edit_post",
            CallbackAction::ConfirmPost => "confirm_post",
            CallbackAction::CancelPost => "cancel_post",
            CallbackAction::CancelStepPost => "cancel_step_post",
        }
    }

    pub fn from_data(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_data() == data)
    }
}
