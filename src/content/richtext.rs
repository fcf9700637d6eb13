//! Structured rich text as delivered by the content API
//!
//! A post body is a sequence of blocks (paragraphs, headings, list items,
//! images, embeds). Text blocks carry inline spans that mark ranges of their
//! text as strong, emphasized, linked or labelled. Span offsets count UTF-16
//! code units, the way the API's editor produces them.

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// One block of rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RichTextBlock {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    Heading4(TextBlock),
    Heading5(TextBlock),
    Heading6(TextBlock),
    Preformatted(TextBlock),
    ListItem(TextBlock),
    OListItem(TextBlock),
    Image(ImageBlock),
    Embed(EmbedBlock),
    /// Block types this renderer does not know; rendered as nothing
    #[serde(other)]
    Unsupported,
}

/// Text with inline formatting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub oembed: Oembed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Oembed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// An inline formatting range over a text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

impl RichTextBlock {
    /// The block's text, if it is a text-bearing block
    pub fn text(&self) -> Option<&str> {
        self.text_block().map(|b| b.text.as_str())
    }

    fn text_block(&self) -> Option<&TextBlock> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::Heading4(b)
            | Self::Heading5(b)
            | Self::Heading6(b)
            | Self::Preformatted(b)
            | Self::ListItem(b)
            | Self::OListItem(b) => Some(b),
            Self::Image(_) | Self::Embed(_) | Self::Unsupported => None,
        }
    }

    fn list_tag(&self) -> Option<&'static str> {
        match self {
            Self::ListItem(_) => Some("ul"),
            Self::OListItem(_) => Some("ol"),
            _ => None,
        }
    }
}

/// Plain text of a block sequence, blocks joined by a single space
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .filter_map(RichTextBlock::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a block sequence to HTML
///
/// All text and attribute values are escaped. Consecutive list items are
/// grouped under a single `<ul>` or `<ol>`.
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = block.list_tag();
        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }
        html.push_str(&render_block(block));
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

fn render_block(block: &RichTextBlock) -> String {
    use RichTextBlock::*;

    let tag = match block {
        Paragraph(_) => "p",
        Heading1(_) => "h1",
        Heading2(_) => "h2",
        Heading3(_) => "h3",
        Heading4(_) => "h4",
        Heading5(_) => "h5",
        Heading6(_) => "h6",
        Preformatted(_) => "pre",
        ListItem(_) | OListItem(_) => "li",
        Image(image) => {
            return format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                html_escape(&image.url),
                html_escape(image.alt.as_deref().unwrap_or(""))
            );
        }
        // oEmbed markup is produced by the provider and passed through as-is
        Embed(embed) => {
            return format!(
                r#"<div data-oembed="{}" data-oembed-type="{}">{}</div>"#,
                html_escape(embed.oembed.embed_url.as_deref().unwrap_or("")),
                html_escape(embed.oembed.kind.as_deref().unwrap_or("")),
                embed.oembed.html.as_deref().unwrap_or("")
            );
        }
        Unsupported => return String::new(),
    };

    let text = block
        .text_block()
        .map(|b| render_spans(&b.text, &b.spans))
        .unwrap_or_default();
    format!("<{tag}>{text}</{tag}>")
}

/// Render text with its inline spans
///
/// The text is cut at every span boundary; each segment is wrapped in the
/// tags of every span covering it, so overlapping spans still produce
/// well-formed markup.
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();

    let mut unit_offsets = Vec::with_capacity(chars.len() + 1);
    let mut units = 0;
    for c in &chars {
        unit_offsets.push(units);
        units += c.len_utf16();
    }
    unit_offsets.push(units);
    // offsets past the end of the text land on its end
    let to_char_index =
        |offset: usize| unit_offsets.partition_point(|&u| u < offset).min(chars.len());

    let ranges: Vec<(usize, usize, &Span)> = spans
        .iter()
        .filter(|s| s.kind != SpanKind::Unsupported)
        .map(|s| (to_char_index(s.start), to_char_index(s.end), s))
        .filter(|(start, end, _)| start < end)
        .collect();

    let mut cuts = vec![0, chars.len()];
    for (start, end, _) in &ranges {
        cuts.push(*start);
        cuts.push(*end);
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut out = String::with_capacity(text.len());
    for window in cuts.windows(2) {
        let (from, to) = (window[0], window[1]);
        let segment: String = chars[from..to].iter().collect();
        let mut piece = html_escape(&segment).replace('\n', "<br />");

        // the first declared span ends up outermost
        for (start, end, span) in ranges.iter().rev() {
            if *start <= from && to <= *end {
                piece = wrap_span(span, piece);
            }
        }
        out.push_str(&piece);
    }

    out
}

fn wrap_span(span: &Span, inner: String) -> String {
    let data = span.data.as_ref();
    match span.kind {
        SpanKind::Strong => format!("<strong>{}</strong>", inner),
        SpanKind::Em => format!("<em>{}</em>", inner),
        SpanKind::Hyperlink => match data.and_then(|d| d.url.as_deref()).and_then(safe_href) {
            Some(href) => {
                let blank = data.and_then(|d| d.target.as_deref()) == Some("_blank");
                if blank {
                    format!(
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                        html_escape(href),
                        inner
                    )
                } else {
                    format!(r#"<a href="{}">{}</a>"#, html_escape(href), inner)
                }
            }
            None => inner,
        },
        SpanKind::Label => match data.and_then(|d| d.label.as_deref()) {
            Some(label) => format!(r#"<span class="{}">{}</span>"#, html_escape(label), inner),
            None => inner,
        },
        SpanKind::Unsupported => inner,
    }
}

/// Only let through link targets that cannot execute script
fn safe_href(url: &str) -> Option<&str> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|prefix| lower.starts_with(prefix));
    allowed.then_some(url)
}
