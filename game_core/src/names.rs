//! Player name identity and display escaping

use unicode_normalization::UnicodeNormalization;

/// Trim whitespace and byte-order marks from both ends
pub fn trim_name(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Canonical identity key for a player name: NFKC (folds full-width and
/// half-width forms), trimmed, lowercased.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name.nfkc().collect();
    trim_name(&folded).to_lowercase()
}

/// Escape the characters that are unsafe inside HTML text or attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_html`] for the five entities it produces
pub fn unescape_html(s: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Identity key of a name as stored (escaped) in the leaderboard
pub fn stored_identity(stored_name: &str) -> String {
    normalize_name(&unescape_html(stored_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_width_and_case() {
        assert_eq!(normalize_name("ＳＡＫＥ"), "sake");
        assert_eq!(normalize_name("Sake"), "sake");
        assert_eq!(normalize_name("ｻｹ"), normalize_name("サケ"));
        assert_eq!(normalize_name("　Ｔａｒｏ　"), "taro", "Full-width spaces trimmed");
    }

    #[test]
    fn test_byte_order_mark_is_trimmed() {
        assert_eq!(trim_name("\u{feff} sake \u{feff}"), "sake");
        assert_eq!(normalize_name("\u{feff}"), "");
    }

    #[test]
    fn test_normalize_keeps_distinct_names_distinct() {
        assert_ne!(normalize_name("sake"), normalize_name("saké"));
        assert_ne!(normalize_name("酒"), normalize_name("洒"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("ささがね"), "ささがね");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for raw in ["a&b", "<script>", "it's \"fine\"", "&amp; literal", "plain", "&"] {
            assert_eq!(unescape_html(&escape_html(raw)), raw);
        }
        assert_eq!(unescape_html("AT&T &unknown;"), "AT&T &unknown;");
    }

    #[test]
    fn test_stored_identity_matches_typed_name() {
        let stored = escape_html("Ａ&Ｂ");
        assert_eq!(stored_identity(&stored), normalize_name("a&b"));
    }
}
