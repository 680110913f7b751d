//! Markdown rendering with sanitization and syntax highlighting
//!
//! Article bodies may come from untrusted contributors, so the renderer never
//! passes author-written HTML through: raw HTML is emitted as escaped text,
//! comments are dropped and script-capable link schemes are replaced.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::SiteConfig;

/// URL schemes that can execute code when followed or loaded
const BLOCKED_SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];

/// Result of rendering one body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Set when the body was rendered as plain text instead of markdown
    pub degradation: Option<String>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
    max_nesting: usize,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::from_config(&SiteConfig::default())
    }

    /// Create with the site's highlight and render settings
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.highlight.theme.clone(),
            highlight: config.highlight.enable,
            line_numbers: config.highlight.line_number,
            max_nesting: config.render.max_nesting,
        }
    }

    /// Render markdown to sanitized HTML.
    ///
    /// Never fails: a body that cannot be rendered as markdown comes back as
    /// escaped plain text with `degradation` set.
    pub fn render(&self, markdown: &str) -> Rendered {
        match self.render_markdown(markdown) {
            Ok(html) => Rendered {
                html,
                degradation: None,
            },
            Err(reason) => Rendered {
                html: render_plain_text(markdown),
                degradation: Some(reason),
            },
        }
    }

    fn render_markdown(&self, markdown: &str) -> Result<String, String> {
        // YAML metadata blocks stay off, front-matter is split off beforehand
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) while inside a code block
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => code_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Html(raw) | Event::InlineHtml(raw) => {
                    if !is_html_comment(&raw) {
                        events.push(Event::Text(raw));
                    }
                }
                Event::Start(tag) => {
                    depth += 1;
                    if depth > self.max_nesting {
                        return Err(format!(
                            "nesting deeper than {} levels",
                            self.max_nesting
                        ));
                    }
                    events.push(Event::Start(sanitize_tag(tag)));
                }
                Event::End(tag) => {
                    depth = depth.saturating_sub(1);
                    events.push(Event::End(tag));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        if !self.highlight {
            return plain_code_block(code, lang);
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        {
            Some(theme) => theme,
            None => return plain_code_block(code, lang),
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Ok(highlighted) => highlighted,
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace script-capable destinations on links and images and drop
/// free-form heading attributes; only `#id` and `.class` survive
fn sanitize_tag(tag: Tag<'_>) -> Tag<'_> {
    match tag {
        Tag::Heading {
            level, id, classes, ..
        } => Tag::Heading {
            level,
            id,
            classes,
            attrs: Vec::new(),
        },
        Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        } => Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        },
        Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        } => Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        },
        other => other,
    }
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_blocked_url(&url) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Browsers ignore whitespace and control characters inside the scheme
fn is_blocked_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|s| normalized.starts_with(s))
}

fn is_html_comment(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.starts_with("<!--") && trimmed.ends_with("-->")
}

/// First word of a fence info string, restricted to characters safe in a class name
fn code_language(info: &str) -> Option<String> {
    let lang: String = info
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
        .collect();
    if lang.is_empty() {
        None
    } else {
        Some(lang)
    }
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        lang,
        html_escape(code)
    )
}

/// Degraded rendering: escaped paragraphs split on blank lines
pub fn render_plain_text(text: &str) -> String {
    let mut output = String::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !paragraph.is_empty() {
                output.push_str("<p>");
                output.push_str(&html_escape(&paragraph.join("\n")));
                output.push_str("</p>\n");
                paragraph.clear();
            }
        } else {
            paragraph.push(line);
        }
    }

    output
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
