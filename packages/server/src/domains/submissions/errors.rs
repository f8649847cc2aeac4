use thiserror::Error;

use crate::domains::submissions::classifier::Provider;
use crate::domains::submissions::messages;

/// Rejections a submission can hit between intake and delivery.
///
/// Every variant is recoverable: the submitter can edit and resubmit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Name or description contains a copyright/solicitation keyword.
    #[error("内容包含禁止关键词: {0}")]
    PolicyViolation(String),

    /// Ad keyword in the description, or a suspicious non-provider link.
    #[error("caption flagged as advertising")]
    AdContent,

    /// None of the caption's links belong to a known provider.
    #[error("no recognized provider links ({} unrecognized)", .unrecognized.len())]
    NoRecognizedLinks { unrecognized: Vec<String> },

    #[error("unrecognized link type: {}", .0.join(", "))]
    UnrecognizedLinkType(Vec<String>),

    /// Neither the template pattern nor repair produced a valid caption.
    #[error("caption does not match the submission template")]
    MalformedCaption,

    #[error("delivery to {channel_id} failed: {cause}")]
    DeliveryFailure { channel_id: String, cause: String },
}

impl SubmissionError {
    /// Text shown to the submitter.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::PolicyViolation(_) => format!("投稿被拒绝：{}", self),
            SubmissionError::AdContent => "检测到您的投稿可能包含广告内容，无法发布。\n\
                 请确保投稿内容符合规范，仅包含网盘资源链接。"
                .to_string(),
            SubmissionError::NoRecognizedLinks { unrecognized } if !unrecognized.is_empty() => {
                unrecognized_links_message(unrecognized)
            }
            SubmissionError::NoRecognizedLinks { .. } => format!(
                "发布失败：未识别到任何有效链接，请检查链接格式。\n\n{}",
                accepted_prefixes_hint()
            ),
            SubmissionError::UnrecognizedLinkType(urls) => unrecognized_links_message(urls),
            SubmissionError::MalformedCaption => messages::MALFORMED_CAPTION.to_string(),
            SubmissionError::DeliveryFailure { channel_id, .. } => {
                format!("发送到频道 {} 失败。", channel_id)
            }
        }
    }
}

fn unrecognized_links_message(urls: &[String]) -> String {
    format!(
        "发布失败：发现未识别的链接类型。\n\n未识别的链接：\n{}\n\n{}",
        urls.join("\n"),
        accepted_prefixes_hint()
    )
}

fn accepted_prefixes_hint() -> String {
    let prefixes: Vec<String> = Provider::ALL
        .iter()
        .map(|p| format!("- {}", p.url_prefix()))
        .collect();
    format!(
        "链接应以以下格式之一开头：\n{}\n\n请编辑或重新投稿。",
        prefixes.join("\n")
    )
}
