//! Integration tests for the guided (step-by-step) submission flow.

mod common;

use crate::common::*;
use panshare_core::common::ImageRef;
use panshare_core::domains::submissions::messages;
use panshare_core::domains::submissions::normalizer::render;
use panshare_core::domains::submissions::{
    CallbackAction, ContentPolicy, GuidedStep, InboundEvent, SessionState, SubmissionRecord,
};
use test_context::test_context;

fn cover() -> InboundEvent {
    InboundEvent::Photo {
        image: ImageRef::new("guided-cover"),
        caption: None,
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn step_post_starts_at_name(ctx: &TestHarness) {
    let outcome = ctx.send(callback(CallbackAction::StepPost)).await;

    assert_eq!(outcome.state.cursor(), Some(GuidedStep::Name));
    assert_eq!(
        bodies(&outcome.directives),
        vec!["开始分步投稿流程：\n\n请输入资源名称"]
    );
    assert_eq!(last_keyboard(&outcome.directives), vec!["cancel_step_post"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn five_texts_and_image_produce_rendered_draft(ctx: &TestHarness) {
    ctx.send(callback(CallbackAction::StepPost)).await;

    let replies = vec![
        ctx.send(text("测试")).await,
        ctx.send(text("测试描述")).await,
        ctx.send(text("https://pan.quark.cn/s/abc")).await,
        ctx.send(text("1GB")).await,
        ctx.send(text("#test")).await,
    ];
    assert_eq!(bodies(&replies[0].directives), vec!["已记录名称。\n\n请输入资源描述"]);
    assert_eq!(bodies(&replies[4].directives), vec!["请发送封面图片"]);
    assert_eq!(replies[4].state.cursor(), Some(GuidedStep::AwaitingImage));

    let outcome = ctx.send(cover()).await;

    let expected = render(
        &SubmissionRecord {
            name: "测试".to_string(),
            description: "测试描述".to_string(),
            links: vec!["https://pan.quark.cn/s/abc".to_string()],
            size: "1GB".to_string(),
            tags: "#test".to_string(),
        },
        &ContentPolicy::default(),
    )
    .unwrap();

    let drafts = ctx.handler.deps().sessions.drafts(USER).await;
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].caption, expected);
    assert_eq!(drafts[0].image.as_str(), "guided-cover");
    assert_eq!(outcome.state, SessionState::Idle);
    assert_eq!(
        last_keyboard(&outcome.directives),
        vec!["edit_post", "confirm_post", "cancel_post"]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn image_during_text_step_reprompts(ctx: &TestHarness) {
    ctx.send(callback(CallbackAction::StepPost)).await;
    ctx.send(text("测试")).await;

    let outcome = ctx.send(cover()).await;

    assert_eq!(outcome.state.cursor(), Some(GuidedStep::Description));
    assert_eq!(bodies(&outcome.directives), vec!["请输入资源描述"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn text_at_image_step_asks_for_photo(ctx: &TestHarness) {
    ctx.send_all(vec![
        callback(CallbackAction::StepPost),
        text("测试"),
        text("测试描述"),
        text("https://pan.quark.cn/s/abc"),
        text("1GB"),
        text("#test"),
    ])
    .await;

    let outcome = ctx.send(text("这不是图片")).await;

    assert_eq!(bodies(&outcome.directives), vec![messages::PHOTO_REQUIRED]);
    assert_eq!(outcome.state.cursor(), Some(GuidedStep::AwaitingImage));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn links_step_without_url_reprompts(ctx: &TestHarness) {
    ctx.send_all(vec![
        callback(CallbackAction::StepPost),
        text("测试"),
        text("测试描述"),
    ])
    .await;

    let outcome = ctx.send(text("稍后补充")).await;

    assert_eq!(bodies(&outcome.directives), vec![messages::NO_LINKS_IN_STEP]);
    assert_eq!(outcome.state.cursor(), Some(GuidedStep::Links));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cancel_returns_to_idle(ctx: &TestHarness) {
    ctx.send_all(vec![callback(CallbackAction::StepPost), text("测试")])
        .await;

    let outcome = ctx.send(callback(CallbackAction::CancelStepPost)).await;

    assert!(outcome.state.is_idle());
    assert_eq!(
        bodies(&outcome.directives),
        vec![messages::GUIDED_CANCELLED, messages::MAIN_MENU]
    );

    // Back to the single-message flow
    let after = ctx.send(text("测试描述")).await;
    assert_eq!(bodies(&after.directives), vec![messages::MALFORMED_CAPTION]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ad_in_guided_description_rejected_at_final_step(ctx: &TestHarness) {
    ctx.send_all(vec![
        callback(CallbackAction::StepPost),
        text("测试"),
        text("招聘兼职"),
        text("https://pan.quark.cn/s/abc"),
        text("1GB"),
        text("#test"),
    ])
    .await;

    let outcome = ctx.send(cover()).await;

    assert!(outcome.state.is_idle());
    assert_eq!(
        bodies(&outcome.directives)[0],
        "投稿被拒绝：内容包含禁止关键词: 兼职"
    );
    assert!(ctx.handler.deps().sessions.drafts(USER).await.is_empty());
}
