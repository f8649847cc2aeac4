use crate::common::ImageRef;
use crate::domains::submissions::models::CanonicalCaption;

/// Image + caption pair waiting for the submitter to confirm publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDraft {
    pub image: ImageRef,
    pub caption: CanonicalCaption,
}

impl PendingDraft {
    pub fn new(image: ImageRef, caption: impl Into<CanonicalCaption>) -> Self {
        Self {
            image,
            caption: caption.into(),
        }
    }
}
