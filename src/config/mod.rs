//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::RenderConfig;
pub use site::SiteConfig;
pub use site::CONFIG_FILE;
