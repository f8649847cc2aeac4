/// Content policy: advertising and copyright screening for captions.
///
/// # Checks
///
/// - **Ad keywords**: solicitation/job-scam terms in the extracted description
/// - **Suspicious links**: `链接：` URLs outside the four providers that point
///   at e-commerce, payment or messaging domains
/// - **Copyright keywords**: channel/DMCA boilerplate copied into the name or
///   description (checked by `render`, before a caption exists)
///
/// Non-provider links that are not suspicious are allowed through; the fan-out
/// reports them as unrecognized instead.
///
/// # Examples
///
/// ```rust
/// use panshare_core::domains::submissions::policy::ContentPolicy;
///
/// let policy = ContentPolicy::default();
/// let caption = "名称：a\n\n描述：招聘兼职\n\n链接：https://pan.quark.cn/s/x";
///
/// assert!(policy.is_disallowed(caption));
/// ```

pub mod detector;

pub use detector::{ContentPolicy, PolicyConfig, PolicyFindings, PolicyMatch, ViolationKind};
