//! Content module - post models, rich text and reading time

mod post;
pub mod reading_time;
pub mod richtext;

pub use post::{ContentBlock, PostDetail, PostPage, PostSummary};
pub use reading_time::reading_time;
pub use richtext::{as_html, as_text, RichTextBlock};
