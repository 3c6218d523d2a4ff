use btcore_variant::Variant;

/// Layout for [`encode`].
#[derive(Copy, Clone, Debug)]
pub enum Style {
    /// No whitespace at all.
    Compact,
    /// Human-readable, indented by `indent` spaces per nesting level.
    Pretty { indent: usize },
}

impl Style {
    #[must_use]
    pub fn pretty() -> Self {
        Self::Pretty { indent: 4 }
    }
}

/// Encodes `variant` as JSON text in the given [`Style`].
///
/// Object keys are always emitted sorted by byte order, regardless of
/// insertion order, so two variants with the same entries serialize
/// identically.
#[must_use]
pub fn encode(variant: &Variant<'_>, style: Style) -> String {
    let mut out = String::new();
    encode_into(variant, style, 0, &mut out);
    out
}

#[must_use]
pub fn compact(variant: &Variant<'_>) -> String {
    encode(variant, Style::Compact)
}

#[must_use]
pub fn pretty(variant: &Variant<'_>) -> String {
    encode(variant, Style::pretty())
}

fn encode_into(variant: &Variant<'_>, style: Style, depth: usize, out: &mut String) {
    match variant {
        Variant::None | Variant::Null => out.push_str("null"),
        Variant::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Variant::Int(n) => out.push_str(&n.to_string()),
        Variant::Double(d) => out.push_str(&format_double(*d)),
        Variant::String(s) => encode_string(s.as_bytes(), out),
        Variant::Vector(items) => encode_array(items, style, depth, out),
        Variant::Map(map) => {
            let entries = map.sorted_entries();
            encode_object(&entries, style, depth, out);
        }
    }
}

fn format_double(d: f64) -> String {
    if d.is_finite() {
        let s = d.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{s}.0")
        }
    } else {
        "null".to_string()
    }
}

fn encode_array(items: &[Variant<'_>], style: Style, depth: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(style, depth + 1, out);
        encode_into(item, style, depth + 1, out);
    }
    newline_indent(style, depth, out);
    out.push(']');
}

fn encode_object(entries: &[(btcore_quarks::Quark, &Variant<'_>)], style: Style, depth: usize, out: &mut String) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(style, depth + 1, out);
        encode_string(key.as_bytes(), out);
        out.push(':');
        if matches!(style, Style::Pretty { .. }) {
            out.push(' ');
        }
        encode_into(value, style, depth + 1, out);
    }
    newline_indent(style, depth, out);
    out.push('}');
}

fn newline_indent(style: Style, depth: usize, out: &mut String) {
    if let Style::Pretty { indent } = style {
        out.push('\n');
        out.push_str(&" ".repeat(indent * depth));
    }
}

fn encode_string(bytes: &[u8], out: &mut String) {
    out.push('"');
    let text = String::from_utf8_lossy(bytes);
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcore_quarks::keys;
    use btcore_variant::VMap;

    #[test]
    fn compact_has_no_whitespace() {
        let mut map = VMap::new();
        map.insert_or_assign(keys::NAME, Variant::unmanaged_string(b"x"));
        let v = Variant::Map(map);
        assert_eq!(compact(&v), r#"{"name":"x"}"#);
    }

    #[test]
    fn pretty_indents_with_four_spaces() {
        let v = Variant::Vector(vec![Variant::Int(1), Variant::Int(2)]);
        assert_eq!(pretty(&v), "[\n    1,\n    2\n]");
    }

    #[test]
    fn object_keys_are_sorted_regardless_of_insertion_order() {
        let mut map = VMap::new();
        map.insert_or_assign(keys::SOURCE, Variant::Int(1));
        map.insert_or_assign(keys::COMMENT, Variant::Int(2));
        let v = Variant::Map(map);
        assert_eq!(compact(&v), r#"{"comment":2,"source":1}"#);
    }

    #[test]
    fn escapes_control_characters() {
        let v = Variant::unmanaged_string(b"a\nb\"c");
        assert_eq!(compact(&v), r#""a\nb\"c""#);
    }

    #[test]
    fn round_trips_through_decode() {
        let original = br#"{"a":[1,2,3],"b":"x"}"#;
        let decoded = crate::decode(original, crate::ParseMode::InPlace).unwrap();
        assert_eq!(compact(&decoded), std::str::from_utf8(original).unwrap());
    }
}
