use btcore_variant::Variant;

/// Encodes `variant` as bencode.
///
/// This is a pure function of the variant: it never fails. A `None` or
/// `Null` variant encodes as an empty byte string, since bencode has no
/// concept of an absent or null value.
#[must_use]
pub fn encode(variant: &Variant<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(variant, &mut out);
    out
}

fn encode_into(variant: &Variant<'_>, out: &mut Vec<u8>) {
    match variant {
        Variant::None | Variant::Null => encode_bytes(b"", out),
        Variant::Bool(b) => encode_int(i64::from(*b), out),
        Variant::Int(n) => encode_int(*n, out),
        Variant::Double(d) => encode_bytes(d.to_string().as_bytes(), out),
        Variant::String(s) => encode_bytes(s.as_bytes(), out),
        Variant::Vector(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        Variant::Map(map) => {
            out.push(b'd');
            for (key, value) in map.sorted_entries() {
                encode_bytes(key.as_bytes(), out);
                encode_into(value, out);
            }
            out.push(b'e');
        }
    }
}

fn encode_int(value: i64, out: &mut Vec<u8>) {
    out.push(b'i');
    out.extend_from_slice(value.to_string().as_bytes());
    out.push(b'e');
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcore_quarks::keys;
    use btcore_variant::VMap;

    #[test]
    fn encodes_ints_and_strings() {
        assert_eq!(encode(&Variant::Int(500)), b"i500e");
        assert_eq!(encode(&Variant::Int(-500)), b"i-500e");
        assert_eq!(encode(&Variant::unmanaged_string(b"spam")), b"4:spam");
    }

    #[test]
    fn encodes_lists_in_document_order() {
        let v = Variant::Vector(vec![Variant::Int(1), Variant::unmanaged_string(b"two")]);
        assert_eq!(encode(&v), b"li1e3:twoe");
    }

    #[test]
    fn encodes_dicts_with_sorted_keys() {
        let mut map = VMap::new();
        map.insert_or_assign(keys::SOURCE, Variant::unmanaged_string(b"z"));
        map.insert_or_assign(keys::COMMENT, Variant::unmanaged_string(b"y"));
        map.insert_or_assign(keys::NAME, Variant::unmanaged_string(b"x"));
        let v = Variant::Map(map);
        assert_eq!(encode(&v), b"d7:comment1:y4:name1:x6:source1:ze");
    }

    #[test]
    fn decode_then_encode_is_byte_identical_for_canonical_input() {
        let original: &[u8] = b"d7:comment1:y4:name1:xe";
        let (decoded, _) = crate::decode(original, crate::BDecodeOpts::default(), crate::ParseMode::InPlace).unwrap();
        assert_eq!(encode(&decoded), original);
    }
}
