//! Submitter-facing texts and keyboards.

use crate::common::utils::truncate_preview;
use crate::domains::submissions::events::CallbackAction;
use crate::domains::submissions::models::{GuidedStep, PendingDraft};
use crate::kernel::{Button, OutboundContent};

pub const MAIN_MENU: &str = "欢迎使用投稿机器人！\n\n请选择投稿方式：";

pub const QUICK_POST_TEMPLATE: &str = "请按照以下格式投稿：\n\n\
图片\n\n\
名称：资源名称\n\
描述：资源描述\n\
链接：网盘链接1\n\
链接：网盘链接2\n\
...\n\n\
📁 大小：资源大小\n\
🏷 标签：标签1 标签2 ...\n\n\
请发送带有图片和说明的投稿内容。";

pub const POST_INFO: &str = "投稿格式说明：\n\n\
1. 发送一张图片作为封面\n\
2. 在图片说明中按格式填写信息：\n\
\u{20}  - 名称：资源名称\n\
\u{20}  - 描述：资源简介\n\
\u{20}  - 链接：每行一个网盘链接（支持夸克、百度、UC、迅雷等）\n\
\u{20}  - 大小：资源大小\n\
\u{20}  - 标签：相关标签（用空格分隔）\n\n\
示例：\n\
名称：我在顶峰等你(2025)\n\
描述：上一世，顾雪茭曾因恋爱脑而高考失利...\n\
链接：https://pan.quark.cn/s/635e08a47100\n\
链接：https://pan.baidu.com/s/1YFLphV9s8sKIFSchRq0UAA?pwd=pyxh\n\
📁 大小：NG\n\
🏷 标签：#国剧 #剧情 #爱情 #奇幻";

pub const MALFORMED_CAPTION: &str = "投稿格式不正确，请按照模板重新投稿。\n\n\
请按照以下格式投稿：\n\n\
图片\n\n\
名称：\n\n描述：\n\n链接：\n链接：\n...\n\n\
📁 大小：\n🏷 标签：";

pub const NO_POSTS: &str = "您还没有投稿记录。";
pub const POSTS_CLEARED: &str = "投稿记录已清空。";
pub const EDIT_POST: &str = "请重新发送新的投稿内容，格式与之前相同。";
pub const POST_CANCELLED: &str = "投稿已取消。";
pub const GUIDED_CANCELLED: &str = "分步投稿已取消。";
pub const PHOTO_REQUIRED: &str = "请发送一张图片作为封面！";
pub const NO_DRAFTS_TO_PUBLISH: &str = "找不到您的投稿内容，无法发送到频道。";
pub const NO_LINKS_IN_STEP: &str = "未识别到链接，请重新输入网盘链接（每行一个链接）";

const MY_POSTS_PREVIEW_CHARS: usize = 100;

fn button(text: &str, action: CallbackAction) -> Vec<Button> {
    vec![Button::new(text, action.as_data())]
}

fn back_button() -> Vec<Button> {
    button("◀️ 返回", CallbackAction::BackToMain)
}

fn cancel_guided_keyboard() -> Vec<Vec<Button>> {
    vec![button("❌ 取消投稿", CallbackAction::CancelStepPost)]
}

pub fn main_menu() -> OutboundContent {
    OutboundContent::with_keyboard(
        MAIN_MENU,
        vec![
            button("📝 快速投稿", CallbackAction::QuickPost),
            button("📋 分步投稿", CallbackAction::StepPost),
            button("ℹ️ 投稿说明", CallbackAction::PostInfo),
            button("📂 我的投稿", CallbackAction::MyPosts),
        ],
    )
}

pub fn quick_post_template() -> OutboundContent {
    OutboundContent::with_keyboard(QUICK_POST_TEMPLATE, vec![back_button()])
}

pub fn post_info() -> OutboundContent {
    OutboundContent::with_keyboard(POST_INFO, vec![back_button()])
}

pub fn malformed_caption() -> OutboundContent {
    OutboundContent::with_keyboard(
        MALFORMED_CAPTION,
        vec![
            button("ℹ️ 查看详细说明", CallbackAction::PostInfo),
            button("◀️ 返回主菜单", CallbackAction::BackToMain),
        ],
    )
}

pub fn guided_started() -> OutboundContent {
    OutboundContent::with_keyboard(
        format!("开始分步投稿流程：\n\n{}", GuidedStep::Name.prompt()),
        cancel_guided_keyboard(),
    )
}

/// Acknowledge `recorded` and prompt for `next`. The image prompt goes out
/// on its own.
pub fn guided_step_recorded(recorded: GuidedStep, next: GuidedStep) -> OutboundContent {
    let text = if next == GuidedStep::AwaitingImage {
        next.prompt().to_string()
    } else {
        format!("已记录{}。\n\n{}", recorded.label(), next.prompt())
    };
    OutboundContent::with_keyboard(text, cancel_guided_keyboard())
}

pub fn guided_reprompt(text: &str) -> OutboundContent {
    OutboundContent::with_keyboard(text, cancel_guided_keyboard())
}

fn numbered(drafts: &[PendingDraft], preview: impl Fn(&str) -> String) -> String {
    drafts
        .iter()
        .enumerate()
        .map(|(i, d)| format!("#{} 投稿内容：\n{}", i + 1, preview(&d.caption)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Every pending draft in full, with the edit/confirm/cancel keyboard.
pub fn draft_preview(drafts: &[PendingDraft]) -> OutboundContent {
    OutboundContent::with_keyboard(
        format!(
            "感谢您的投稿！以下是您的所有投稿内容：\n\n{}\n\n您可以选择以下操作：",
            numbered(drafts, |c| c.to_string())
        ),
        vec![
            button("✏️ 编辑", CallbackAction::EditPost),
            button("✅ 确认发布", CallbackAction::ConfirmPost),
            button("❌ 取消", CallbackAction::CancelPost),
        ],
    )
}

pub fn my_posts(drafts: &[PendingDraft]) -> OutboundContent {
    if drafts.is_empty() {
        return OutboundContent::with_keyboard(
            NO_POSTS,
            vec![
                button("📝 开始投稿", CallbackAction::QuickPost),
                back_button(),
            ],
        );
    }

    OutboundContent::with_keyboard(
        format!(
            "您的投稿记录：\n\n{}",
            numbered(drafts, |c| truncate_preview(c, MY_POSTS_PREVIEW_CHARS))
        ),
        vec![
            button("➕ 继续投稿", CallbackAction::QuickPost),
            button("🗑 清空投稿", CallbackAction::ClearPosts),
            back_button(),
        ],
    )
}

pub fn publish_summary(delivered: usize, failed: usize, unrecognized: &[String]) -> String {
    let mut summary = if failed == 0 {
        format!(
            "您的投稿已成功发布到所有频道（共{}条）。\n感谢您的支持！",
            delivered
        )
    } else {
        format!(
            "您的投稿发布完成：\n成功：{}条\n失败：{}条\n感谢您的支持！",
            delivered, failed
        )
    };

    if !unrecognized.is_empty() {
        summary.push_str("\n\n以下链接未能识别，仅发布到综合频道：\n");
        summary.push_str(&unrecognized.join("\n"));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ImageRef;

    fn callbacks(content: &OutboundContent) -> Vec<String> {
        match content {
            OutboundContent::Text { keyboard, .. } => keyboard
                .iter()
                .flatten()
                .map(|b| b.callback_data.clone())
                .collect(),
            OutboundContent::Photo { .. } => vec![],
        }
    }

    #[test]
    fn test_main_menu_buttons() {
        assert_eq!(
            callbacks(&main_menu()),
            vec!["quick_post", "step_post", "post_info", "my_posts"]
        );
    }

    #[test]
    fn test_step_ack_uses_field_label() {
        let content = guided_step_recorded(GuidedStep::Name, GuidedStep::Description);
        assert_eq!(content.body(), "已记录名称。\n\n请输入资源描述");

        let content = guided_step_recorded(GuidedStep::Tags, GuidedStep::AwaitingImage);
        assert_eq!(content.body(), "请发送封面图片");
    }

    #[test]
    fn test_my_posts_truncates_long_captions() {
        let long = "长".repeat(150);
        let drafts = vec![PendingDraft::new(ImageRef::new("img"), long)];
        let content = my_posts(&drafts);

        assert!(content.body().contains(&format!("#1 投稿内容：\n{}...", "长".repeat(100))));
        assert_eq!(
            callbacks(&content),
            vec!["quick_post", "clear_posts", "back_to_main"]
        );
    }

    #[test]
    fn test_my_posts_empty_state() {
        let content = my_posts(&[]);
        assert_eq!(content.body(), NO_POSTS);
        assert_eq!(callbacks(&content), vec!["quick_post", "back_to_main"]);
    }

    #[test]
    fn test_publish_summary_variants() {
        assert_eq!(
            publish_summary(3, 0, &[]),
            "您的投稿已成功发布到所有频道（共3条）。\n感谢您的支持！"
        );
        assert_eq!(
            publish_summary(2, 1, &[]),
            "您的投稿发布完成：\n成功：2条\n失败：1条\n感谢您的支持！"
        );
        assert!(publish_summary(3, 0, &["https://example.com/x".to_string()])
            .ends_with("https://example.com/x"));
    }
}
