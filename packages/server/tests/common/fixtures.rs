//! Captions and helpers shared by the integration tests.

use panshare_core::common::ImageRef;
use panshare_core::domains::submissions::{CallbackAction, InboundEvent};
use panshare_core::kernel::{Outbound, OutboundContent};

/// Well-formed single-provider caption.
pub const QUARK_CAPTION: &str = "名称：测试\n\n描述：测试描述\n\n链接：https://pan.quark.cn/s/abc\n\n📁 大小：1GB\n🏷 标签：#test";

/// Same caption after rendering.
pub const QUARK_RENDERED: &str = "名称：测试\n\n描述：测试描述\n\n链接：https://pan.quark.cn/s/abc\n\n📁 大小：1GB\n🏷 标签：#test #鹏摇星海";

pub fn photo(caption: &str) -> InboundEvent {
    InboundEvent::Photo {
        image: ImageRef::new("cover-file-id"),
        caption: Some(caption.to_string()),
    }
}

pub fn text(body: &str) -> InboundEvent {
    InboundEvent::Text(body.to_string())
}

pub fn callback(action: CallbackAction) -> InboundEvent {
    InboundEvent::Callback(action)
}

/// Text of every reply, in order.
pub fn bodies(directives: &[Outbound]) -> Vec<String> {
    directives
        .iter()
        .map(|d| d.content.body().to_string())
        .collect()
}

/// Callback data of the buttons on the last reply.
pub fn last_keyboard(directives: &[Outbound]) -> Vec<String> {
    match directives.last().map(|d| &d.content) {
        Some(OutboundContent::Text { keyboard, .. }) => keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.clone())
            .collect(),
        _ => Vec::new(),
    }
}
