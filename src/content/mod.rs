//! Content module - article files, front-matter and markdown rendering

mod article;
mod frontmatter;
pub mod loader;
mod markdown;

pub use article::{is_valid_slug, slug_from_path, Article, ArticleSummary};
pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use loader::{ContentLoader, RawFile};
pub use markdown::{render_plain_text, MarkdownRenderer, Rendered};
