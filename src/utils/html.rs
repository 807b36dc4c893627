use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe formatting tags (like <b>, <p>) survive while
/// <script>, <iframe> and event-handler attributes are stripped.
/// Plain text passes through with `<`, `>` and `&` escaped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
