//! Configuration for the renderers.

use bon::Builder;

/// Options for the HTML renderer.
///
/// ```rust
/// use rendown::HtmlOptions;
///
/// let options = HtmlOptions::builder().standalone(true).head_ids(true).build();
/// assert!(options.standalone);
/// ```
#[derive(Default, Debug, Clone, Builder)]
pub struct HtmlOptions {
    /// Frame the output as a complete document: `<!DOCTYPE html>…</html>`,
    /// with a `<head>` assembled from the metadata queue.
    #[builder(default)]
    pub standalone: bool,

    /// Drop raw HTML blocks and inlines from the output.
    #[builder(default)]
    pub skip_html: bool,

    /// Escape raw HTML instead of passing it through.
    #[builder(default)]
    pub escape: bool,

    /// Render newlines inside paragraphs as `<br/>`.
    #[builder(default)]
    pub hard_wrap: bool,

    /// Emit an `id` attribute on headings, unique per document.
    #[builder(default)]
    pub head_ids: bool,

    /// Use the extended OWASP escape set for body text.
    #[builder(default)]
    pub owasp: bool,

    /// Prefer numeric character references over named entities.
    #[builder(default)]
    pub numeric_entities: bool,
}

/// Options for the Gemini renderer.
///
/// `link_inline` and `link_at_end` are mutually exclusive; if both are set,
/// `link_inline` is ignored.
#[derive(Default, Debug, Clone, Builder)]
pub struct GeminiOptions {
    /// Emit metadata entries as leading `Key: value` lines.
    #[builder(default)]
    pub metadata: bool,

    /// Frame the output as a standalone document (blank lines after the
    /// document header).
    #[builder(default)]
    pub standalone: bool,

    /// Place each link line next to the text that referenced it, instead
    /// of flushing queued links after each block.
    #[builder(default)]
    pub link_inline: bool,

    /// Accumulate all links and flush once at end of document.
    #[builder(default)]
    pub link_at_end: bool,

    /// Suppress the `[a]`/`[ii]` back-reference tokens on link lines.
    #[builder(default)]
    pub link_noref: bool,

    /// Format link ordinals as lowercase Roman numerals instead of letter
    /// sequences.
    #[builder(default)]
    pub link_roman: bool,
}

/// Options for the ANSI terminal renderer.
///
/// ```rust
/// use rendown::TermOptions;
///
/// let options = TermOptions::builder().cols(72).hmargin(2).build();
/// assert_eq!(options.cols, 72);
/// ```
#[derive(Default, Debug, Clone, Builder)]
pub struct TermOptions {
    /// The soft wrap column; 0 means the default of 80.
    #[builder(default)]
    pub cols: usize,

    /// Columns of left margin before all content.
    #[builder(default)]
    pub hmargin: usize,

    /// Blank lines before and after the document; this is the whole of the
    /// standalone framing for terminal output.
    #[builder(default)]
    pub vmargin: usize,

    /// Suppress URLs after link labels and in image boxes.
    #[builder(default)]
    pub nolink: bool,

    /// Display URLs in elided `scheme://host/.../tail` form.
    #[builder(default)]
    pub shortlink: bool,
}
