//! Safe content renderer
//!
//! Turns a [`ContentPayload`] into exactly one container element:
//!
//! ```text
//! payload ─┬─ blank ──────────────────────────────► fallback container
//!          ├─ trusted ────────────────────────────► container(raw)
//!          └─ untrusted ─► Sanitizer ─► safety check ─► container(safe_html)
//!                              └──── any failure ───► fallback container + hook
//! ```

use crate::error::SanitizeError;
use crate::markup;
use crate::options::RenderOptions;
use crate::payload::{ContentPayload, SanitizationResult};
use crate::sanitizer::{AmmoniaSanitizer, Sanitizer};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Side channel for sanitization failures
pub type SanitizeErrorHook = Arc<dyn Fn(&SanitizeError) + Send + Sync>;

/// How a render arrived at its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Value was absent or blank
    Fallback,
    /// Value was vetted upstream and emitted verbatim
    Trusted,
    /// Value went through the sanitizer
    Sanitized {
        /// Whether the sanitizer changed anything
        was_modified: bool,
    },
    /// Sanitization failed and the fallback was emitted instead
    Recovered,
}

impl RenderOutcome {
    /// Whether the fallback text is what the user sees
    #[inline]
    #[must_use]
    pub fn shows_fallback(self) -> bool {
        matches!(self, Self::Fallback | Self::Recovered)
    }
}

/// One rendered container element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    html: String,
    outcome: RenderOutcome,
    sanitization: Option<SanitizationResult>,
}

impl RenderedContent {
    fn fallback(options: &RenderOptions, outcome: RenderOutcome) -> Self {
        Self {
            html: markup::container(
                options.effective_aria_label(),
                &markup::escape_text(&options.fallback_text),
            ),
            outcome,
            sanitization: None,
        }
    }

    /// Rendered markup
    #[inline]
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume into markup
    #[inline]
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    /// Path taken by the render
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> RenderOutcome {
        self.outcome
    }

    /// Sanitizer result, when the sanitizer ran successfully
    #[inline]
    #[must_use]
    pub fn sanitization(&self) -> Option<&SanitizationResult> {
        self.sanitization.as_ref()
    }
}

impl fmt::Display for RenderedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Sanitize-then-render component
///
/// Rendering never fails and never panics through to the caller. Failures
/// degrade to the fallback text and are reported once per render through
/// the hook registered with [`SafeContentRenderer::on_sanitize_error`].
#[derive(Clone)]
pub struct SafeContentRenderer<S = AmmoniaSanitizer> {
    sanitizer: S,
    on_sanitize_error: Option<SanitizeErrorHook>,
}

impl SafeContentRenderer<AmmoniaSanitizer> {
    /// Create renderer backed by the ammonia sanitizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_sanitizer(AmmoniaSanitizer)
    }
}

impl Default for SafeContentRenderer<AmmoniaSanitizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sanitizer> SafeContentRenderer<S> {
    /// Create renderer with a custom sanitizer
    #[inline]
    #[must_use]
    pub fn with_sanitizer(sanitizer: S) -> Self {
        Self {
            sanitizer,
            on_sanitize_error: None,
        }
    }

    /// Register the sanitization failure hook
    #[must_use]
    pub fn on_sanitize_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SanitizeError) + Send + Sync + 'static,
    {
        self.on_sanitize_error = Some(Arc::new(hook));
        self
    }

    /// Register an already shared hook
    #[must_use]
    pub fn with_error_hook(mut self, hook: SanitizeErrorHook) -> Self {
        self.on_sanitize_error = Some(hook);
        self
    }

    /// Render payload into one container element
    ///
    /// Same payload and options always give byte-identical output.
    pub fn render(&self, payload: &ContentPayload, options: &RenderOptions) -> RenderedContent {
        let Some(raw) = payload.non_blank() else {
            tracing::trace!("content absent, rendering fallback");
            return RenderedContent::fallback(options, RenderOutcome::Fallback);
        };

        if payload.is_trusted_html {
            return RenderedContent {
                html: markup::container(options.effective_aria_label(), raw),
                outcome: RenderOutcome::Trusted,
                sanitization: None,
            };
        }

        match self.sanitize_checked(payload, raw, options) {
            Ok(result) => RenderedContent {
                html: markup::container(options.effective_aria_label(), &result.safe_html),
                outcome: RenderOutcome::Sanitized {
                    was_modified: result.was_modified,
                },
                sanitization: Some(result),
            },
            Err(error) => {
                tracing::warn!(
                    kind = error.kind(),
                    input_bytes = raw.len(),
                    "sanitization failed, rendering fallback"
                );
                if let Some(hook) = &self.on_sanitize_error {
                    hook(&error);
                }
                RenderedContent::fallback(options, RenderOutcome::Recovered)
            }
        }
    }

    /// Sanitize without rendering
    ///
    /// Returns `Ok(None)` for blank or trusted payloads, which never reach
    /// the sanitizer. Does not call the hook.
    ///
    /// # Errors
    /// Any [`SanitizeError`] the render path would have recovered from
    pub fn sanitize(
        &self,
        payload: &ContentPayload,
        options: &RenderOptions,
    ) -> Result<Option<SanitizationResult>, SanitizeError> {
        match payload.non_blank() {
            Some(raw) if !payload.is_trusted_html => {
                self.sanitize_checked(payload, raw, options).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn sanitize_checked(
        &self,
        payload: &ContentPayload,
        raw: &str,
        options: &RenderOptions,
    ) -> Result<SanitizationResult, SanitizeError> {
        if let Some(reason) = payload.encoding_error() {
            return Err(SanitizeError::InvalidEncoding(reason.to_string()));
        }
        if raw.len() > options.max_input_bytes {
            return Err(SanitizeError::InputTooLarge {
                size: raw.len(),
                max: options.max_input_bytes,
            });
        }

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.sanitizer.sanitize(raw, options)
        }));
        let safe_html = attempt.map_err(|p| SanitizeError::Panicked(panic_message(&*p)))??;

        markup::check_executable(&safe_html)?;

        let result = SanitizationResult::compare(raw, safe_html);
        if result.was_modified {
            tracing::debug!(
                input_bytes = raw.len(),
                output_bytes = result.safe_html.len(),
                "sanitizer modified content"
            );
        }
        Ok(result)
    }
}

impl<S> fmt::Debug for SafeContentRenderer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeContentRenderer")
            .field("sanitizer", &std::any::type_name::<S>())
            .field("has_error_hook", &self.on_sanitize_error.is_some())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::MockSanitizer;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_hook() -> (Arc<AtomicUsize>, impl Fn(&SanitizeError) + Send + Sync + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        (calls, move |_: &SanitizeError| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn keeps_allowed_bold_and_drops_script() {
        let renderer = SafeContentRenderer::new();
        let options = RenderOptions::new().with_allowed_tags(["b"]);
        let out = renderer.render(
            &ContentPayload::untrusted("<b>Hi</b><script>alert(1)</script>"),
            &options,
        );

        assert!(out.html().contains("<b>Hi</b>"));
        assert!(!out.html().contains("script"));
        assert_eq!(out.outcome(), RenderOutcome::Sanitized { was_modified: true });
    }

    #[test]
    fn absent_value_renders_fallback_exactly() {
        let renderer = SafeContentRenderer::new();
        let options = RenderOptions::new().with_fallback_text("No content");
        let out = renderer.render(&ContentPayload::empty(), &options);

        assert_eq!(
            out.html(),
            r#"<div role="region" aria-label="content">No content</div>"#
        );
        assert_eq!(out.outcome(), RenderOutcome::Fallback);
    }

    #[test]
    fn blank_input_never_reaches_sanitizer() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize().never();
        let renderer = SafeContentRenderer::with_sanitizer(mock);
        let options = RenderOptions::new();

        for payload in [
            ContentPayload::empty(),
            ContentPayload::untrusted(""),
            ContentPayload::untrusted("   "),
        ] {
            assert_eq!(renderer.render(&payload, &options).outcome(), RenderOutcome::Fallback);
        }
    }

    #[test]
    fn trusted_html_skips_sanitizer() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize().never();
        let renderer = SafeContentRenderer::with_sanitizer(mock);

        let out = renderer.render(
            &ContentPayload::trusted(r#"<p class="lead">Vetted</p>"#),
            &RenderOptions::new().with_aria_label("Hero"),
        );
        assert_eq!(
            out.html(),
            r#"<div role="region" aria-label="Hero"><p class="lead">Vetted</p></div>"#
        );
        assert_eq!(out.outcome(), RenderOutcome::Trusted);
    }

    #[test]
    fn sanitizer_error_falls_back_and_reports_once() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize()
            .times(1)
            .returning(|_, _| Err(SanitizeError::rejected("pathological")));
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::with_sanitizer(mock).on_sanitize_error(hook);
        let options = RenderOptions::new().with_fallback_text("Unavailable");

        let out = renderer.render(&ContentPayload::untrusted("<<<>>>"), &options);

        assert_eq!(out.outcome(), RenderOutcome::Recovered);
        assert!(out.html().contains(">Unavailable<"));
        assert!(!out.html().contains("pathological"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct PanickingSanitizer;

    impl Sanitizer for PanickingSanitizer {
        fn sanitize(&self, _html: &str, _options: &RenderOptions) -> Result<String, SanitizeError> {
            panic!("parser blew up")
        }
    }

    #[test]
    fn sanitizer_panic_is_contained() {
        let reported = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = reported.clone();
        let renderer = SafeContentRenderer::with_sanitizer(PanickingSanitizer)
            .on_sanitize_error(move |e| sink.lock().unwrap().push(e.clone()));

        let out = renderer.render(&ContentPayload::untrusted("x"), &RenderOptions::new());

        assert_eq!(out.outcome(), RenderOutcome::Recovered);
        assert_eq!(
            *reported.lock().unwrap(),
            vec![SanitizeError::Panicked("parser blew up".to_string())]
        );
    }

    #[test]
    fn unsafe_sanitizer_output_is_rejected() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize()
            .returning(|html, _| Ok(html.to_string()));
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::with_sanitizer(mock).on_sanitize_error(hook);

        let out = renderer.render(
            &ContentPayload::untrusted("<img src=x onerror=alert(1)>"),
            &RenderOptions::new(),
        );

        assert_eq!(out.outcome(), RenderOutcome::Recovered);
        assert!(!out.html().contains("onerror"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn oversize_input_falls_back() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize().never();
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::with_sanitizer(mock).on_sanitize_error(hook);

        let out = renderer.render(
            &ContentPayload::untrusted("x".repeat(33)),
            &RenderOptions::new().with_max_input_bytes(32),
        );

        assert_eq!(out.outcome(), RenderOutcome::Recovered);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_bytes_fall_back() {
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::new().on_sanitize_error(hook);

        let out = renderer.render(&ContentPayload::from_bytes(&[0xc3, 0x28]), &RenderOptions::new());

        assert_eq!(out.outcome(), RenderOutcome::Recovered);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fallback_text_is_escaped() {
        let renderer = SafeContentRenderer::new();
        let options = RenderOptions::new().with_fallback_text("<img src=x onerror=y>");
        let out = renderer.render(&ContentPayload::empty(), &options);
        assert!(out.html().contains("&lt;img src=x onerror=y&gt;"));
    }

    #[test]
    fn plain_text_is_unmodified() {
        let renderer = SafeContentRenderer::new();
        let out = renderer.render(&ContentPayload::untrusted("Join our newsletter"), &RenderOptions::new());
        assert_eq!(out.outcome(), RenderOutcome::Sanitized { was_modified: false });
        assert_eq!(
            out.to_string(),
            r#"<div role="region" aria-label="content">Join our newsletter</div>"#
        );
    }

    #[test]
    fn allowed_attribute_with_equals_sign_survives() {
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::new().on_sanitize_error(hook);
        let options = RenderOptions::new()
            .with_allowed_tags(["b"])
            .with_allowed_attributes(["title"]);

        let out = renderer.render(
            &ContentPayload::untrusted(r#"<b title="Buy one = get one">Deal</b>"#),
            &options,
        );

        assert_eq!(out.outcome(), RenderOutcome::Sanitized { was_modified: false });
        assert_eq!(
            out.html(),
            r#"<div role="region" aria-label="content"><b title="Buy one = get one">Deal</b></div>"#
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_text_inside_attribute_value_is_not_unsafe() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize()
            .returning(|_, _| Ok(r#"<b title="x onclick=y">tip</b>"#.to_string()));
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::with_sanitizer(mock).on_sanitize_error(hook);

        let out = renderer.render(&ContentPayload::untrusted("tip"), &RenderOptions::new());

        assert!(matches!(out.outcome(), RenderOutcome::Sanitized { .. }));
        assert!(out.html().contains(r#"title="x onclick=y""#));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn real_handler_from_custom_sanitizer_is_recovered() {
        let mut mock = MockSanitizer::new();
        mock.expect_sanitize()
            .returning(|_, _| Ok(r#"<b title="ok" onclick="y">tip</b>"#.to_string()));
        let (calls, hook) = counting_hook();
        let renderer = SafeContentRenderer::with_sanitizer(mock).on_sanitize_error(hook);

        let out = renderer.render(&ContentPayload::untrusted("tip"), &RenderOptions::new());

        assert_eq!(out.outcome(), RenderOutcome::Recovered);
        assert!(!out.html().contains("onclick"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sanitize_skips_blank_and_trusted() {
        let renderer = SafeContentRenderer::new();
        let options = RenderOptions::new();
        assert_eq!(renderer.sanitize(&ContentPayload::empty(), &options), Ok(None));
        assert_eq!(renderer.sanitize(&ContentPayload::trusted("<i>x</i>"), &options), Ok(None));

        let result = renderer
            .sanitize(&ContentPayload::untrusted("<i>x</i>"), &options)
            .unwrap()
            .unwrap();
        assert_eq!(result.safe_html, "x");
        assert!(result.was_modified);
    }
}
