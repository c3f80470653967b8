pub mod analytics;
pub mod butler;
pub mod config;
pub mod link;
pub mod scaffold;
pub mod site;
pub mod store;
pub mod template;

// Re-export main types
pub use config::Config;
pub use site::{BuildError, Quill, VERSION};
pub use store::{Page, Post};
pub use template::{TemplateError, TemplateRenderer};
