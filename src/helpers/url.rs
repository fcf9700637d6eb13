//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path of a post's detail page
///
/// # Examples
/// ```ignore
/// post_url("como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_url(uid: &str) -> String {
    format!("/post/{}", encode_segment(uid))
}

/// Path of the listing showing `pages` accumulated pages
///
/// # Examples
/// ```ignore
/// listing_url(1) // -> "/"
/// listing_url(3) // -> "/?pages=3"
/// ```
pub fn listing_url(pages: usize) -> String {
    if pages <= 1 {
        "/".to_string()
    } else {
        format!("/?pages={}", pages)
    }
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
