use tracing::{info, warn};

use crate::common::UserId;
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::models::PendingDraft;
use crate::kernel::{
    BaseChatTransport, DeliveryError, DeliverySettings, Outbound, OutboundContent, ServerDeps,
    Target,
};

/// Outcome of one confirm: counts plus the reason publishing stopped, if it did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Channel messages that went through.
    pub delivered: usize,
    /// Channel messages that failed after the retry.
    pub failed: usize,
    /// Drafts dropped by the policy filter.
    pub rejected_drafts: usize,
    /// Drafts fully handled (delivered, failed or rejected). Always a prefix
    /// of the pending list.
    pub processed: usize,
    /// Links no provider claimed, across all processed drafts.
    pub unrecognized: Vec<String>,
    /// Set when a draft could not be routed; it and later drafts stay pending.
    pub aborted: Option<SubmissionError>,
}

impl PublishReport {
    /// Failures as reported to the submitter: failed deliveries plus
    /// rejected drafts.
    pub fn failure_count(&self) -> usize {
        self.failed + self.rejected_drafts
    }
}

/// Publish the pending drafts in order.
///
/// A draft flagged by the policy filter is skipped. A draft without any
/// recognized provider link stops the run; drafts before it stay published.
pub async fn publish_drafts(
    user_id: UserId,
    drafts: &[PendingDraft],
    deps: &ServerDeps,
) -> PublishReport {
    let mut report = PublishReport::default();

    for draft in drafts {
        if deps.policy.is_disallowed(&draft.caption) {
            warn!(user_id, "draft rejected by content policy at publish");
            report.rejected_drafts += 1;
            report.processed += 1;
            continue;
        }

        let plan = match deps.resolver.resolve(&draft.caption) {
            Ok(plan) => plan,
            Err(SubmissionError::NoRecognizedLinks { unrecognized }) if !unrecognized.is_empty() => {
                warn!(user_id, count = unrecognized.len(), "draft has only unrecognized links");
                report.aborted = Some(SubmissionError::UnrecognizedLinkType(unrecognized));
                break;
            }
            Err(e) => {
                warn!(user_id, error = %e, "draft could not be routed");
                report.aborted = Some(e);
                break;
            }
        };

        for assignment in &plan.assignments {
            let message = Outbound::to_channel(
                assignment.channel_id.clone(),
                OutboundContent::Photo {
                    image: draft.image.clone(),
                    caption: assignment.caption.clone(),
                },
            );
            match deliver_with_retry(deps.transport.as_ref(), &message, &deps.delivery).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(user_id, channel_id = %assignment.channel_id, error = %e, "delivery failed");
                    report.failed += 1;
                }
            }
        }

        report.unrecognized.extend(plan.unrecognized);
        report.processed += 1;
    }

    info!(
        user_id,
        delivered = report.delivered,
        failed = report.failed,
        rejected = report.rejected_drafts,
        processed = report.processed,
        "publish finished"
    );
    report
}

/// Deliver once; on a rate limit or timeout wait and try exactly once more.
pub async fn deliver_with_retry(
    transport: &dyn BaseChatTransport,
    message: &Outbound,
    settings: &DeliverySettings,
) -> Result<(), SubmissionError> {
    let backoff = match transport.deliver(message).await {
        Ok(()) => return Ok(()),
        Err(DeliveryError::RateLimited { retry_after }) => retry_after,
        Err(DeliveryError::TimedOut) => settings.timeout_backoff,
        Err(DeliveryError::Fatal(cause)) => return Err(delivery_failure(message, cause)),
    };

    tokio::time::sleep(backoff).await;
    transport
        .deliver(message)
        .await
        .map_err(|e| delivery_failure(message, e.to_string()))
}

fn delivery_failure(message: &Outbound, cause: String) -> SubmissionError {
    let channel_id = match &message.target {
        Target::Channel(id) => id.clone(),
        Target::User(id) => id.to_string(),
    };
    SubmissionError::DeliveryFailure { channel_id, cause }
}
