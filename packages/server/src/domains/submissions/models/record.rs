/// Canonical caption text: the normalized, labeled block for one submission.
///
/// ```text
/// 名称：<name>
///
/// 描述：<description>
///
/// 链接：<url>
/// 链接：<url>
///
/// 📁 大小：<size>
/// 🏷 标签：<tags>
/// ```
pub type CanonicalCaption = String;

/// Structured submission, produced by the parser or the guided flow.
///
/// Short-lived: it is rendered once into a [`CanonicalCaption`] and the
/// caption is what gets stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub name: String,
    pub description: String,
    /// Share URLs, duplicates removed, first-seen order.
    pub links: Vec<String>,
    pub size: String,
    pub tags: String,
}

impl SubmissionRecord {
    /// Append a link unless it is already present.
    pub fn push_link(&mut self, link: impl Into<String>) {
        let link = link.into();
        if !self.links.contains(&link) {
            self.links.push(link);
        }
    }

    /// Name and description both present: enough to skip repair. Missing
    /// links are filled in by rendering.
    pub fn has_name_and_description(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }
}
