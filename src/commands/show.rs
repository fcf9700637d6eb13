//! Show a single post

use anyhow::{bail, Result};

use crate::content::{as_text, PostDetail};
use crate::detail::{fetch_post, Resolution};
use crate::helpers::Helpers;
use crate::Spacetraveling;

/// Print a post with its reading time
pub async fn run(app: &Spacetraveling, slug: &str) -> Result<()> {
    let store = app.store()?;

    match fetch_post(store.as_ref(), slug).await? {
        Resolution::Resolved(post) => {
            print!("{}", describe(&post, &Helpers::new(&app.config)));
            Ok(())
        }
        Resolution::NotFound | Resolution::Pending => bail!("No post with slug '{}'", slug),
    }
}

/// Plain-text rendering of a post
pub fn describe(post: &PostDetail, helpers: &Helpers) -> String {
    let mut out = format!("{}\n", post.title);
    if !post.subtitle.is_empty() {
        out.push_str(&format!("{}\n", post.subtitle));
    }
    out.push_str(&format!(
        "{} | {} | {} min\n",
        helpers.date(post.first_publication_date.as_ref()),
        post.author,
        post.reading_time()
    ));

    for block in &post.content {
        out.push('\n');
        if !block.heading.is_empty() {
            out.push_str(&format!("## {}\n", block.heading));
        }
        let text = as_text(&block.body);
        if !text.trim().is_empty() {
            out.push_str(&format!("{}\n", text));
        }
    }

    out
}
