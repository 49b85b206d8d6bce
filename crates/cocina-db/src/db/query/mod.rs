//! Query functions, one module per table. Each takes a pooled connection and
//! returns `diesel::QueryResult`; callers convert into `DbError`.

pub mod comment;
pub mod favorite;
pub mod media;
pub mod recipe;
pub mod user;

/// ## Summary
/// Escapes `LIKE` metacharacters so user input matches literally.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
