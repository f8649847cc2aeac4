use std::fmt;

use crate::domains::submissions::models::SubmissionRecord;

/// Cursor of the guided flow: the field the next message fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidedStep {
    Name,
    Description,
    Links,
    Size,
    Tags,
    /// All text fields collected; waiting for the cover image.
    AwaitingImage,
}

impl GuidedStep {
    pub const ORDER: [GuidedStep; 6] = [
        GuidedStep::Name,
        GuidedStep::Description,
        GuidedStep::Links,
        GuidedStep::Size,
        GuidedStep::Tags,
        GuidedStep::AwaitingImage,
    ];

    pub fn next(self) -> Option<GuidedStep> {
        match self {
            GuidedStep::Name => Some(GuidedStep::Description),
            GuidedStep::Description => Some(GuidedStep::Links),
            GuidedStep::Links => Some(GuidedStep::Size),
            GuidedStep::Size => Some(GuidedStep::Tags),
            GuidedStep::Tags => Some(GuidedStep::AwaitingImage),
            GuidedStep::AwaitingImage => None,
        }
    }

    /// Every step but the last takes a text message.
    pub fn expects_text(self) -> bool {
        !matches!(self, GuidedStep::AwaitingImage)
    }

    /// Field label shown back to the submitter.
    pub fn label(self) -> &'static str {
        match self {
            GuidedStep::Name => "名称",
            GuidedStep::Description => "描述",
            GuidedStep::Links => "链接",
            GuidedStep::Size => "大小",
            GuidedStep::Tags => "标签",
            GuidedStep::AwaitingImage => "封面图片",
        }
    }

    /// Prompt asking for this step's input.
    pub fn prompt(self) -> &'static str {
        match self {
            GuidedStep::Name => "请输入资源名称",
            GuidedStep::Description => "请输入资源描述",
            GuidedStep::Links => "请输入网盘链接（每行一个链接）",
            GuidedStep::Size => "请输入资源大小",
            GuidedStep::Tags => "请输入标签（用空格分隔）",
            GuidedStep::AwaitingImage => "请发送封面图片",
        }
    }
}

impl fmt::Display for GuidedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-user conversation state.
///
/// Pending drafts are tracked separately by the session store; a user can be
/// `Idle` and still have drafts awaiting confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Collecting {
        cursor: GuidedStep,
        partial: SubmissionRecord,
    },
}

impl SessionState {
    /// Fresh guided flow, cursor on the first field.
    pub fn start_collecting() -> Self {
        SessionState::Collecting {
            cursor: GuidedStep::Name,
            partial: SubmissionRecord::default(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn cursor(&self) -> Option<GuidedStep> {
        match self {
            SessionState::Idle => None,
            SessionState::Collecting { cursor, .. } => Some(*cursor),
        }
    }
}
