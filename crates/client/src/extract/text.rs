//! Text cleanup for extracted attribute values.

/// Entities decoded in extracted values, in replacement order.
const ENTITIES: [(&str, &str); 5] = [("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">"), ("&quot;", "\""), ("&#39;", "'")];

/// Decode the five common HTML entities in a single left-to-right pass.
///
/// A single pass means `&amp;lt;` becomes `&lt;`, not `<`.
pub fn unescape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, replacement)) => {
                out.push_str(replacement);
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

/// Unescape and trim an extracted value.
pub fn clean(s: &str) -> String {
    unescape_html(s).trim().to_string()
}
