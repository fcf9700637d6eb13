//! Reading time estimation

use super::post::ContentBlock;
use super::richtext::as_text;

/// Assumed reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated minutes needed to read a post body
///
/// Each block is rounded up to whole minutes on its own and the results are
/// summed. A block without words contributes nothing.
pub fn reading_time(content: &[ContentBlock]) -> usize {
    content.iter().map(block_minutes).sum()
}

fn block_minutes(block: &ContentBlock) -> usize {
    count_words(&as_text(&block.body)).div_ceil(WORDS_PER_MINUTE)
}

/// Whitespace-separated word count
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
