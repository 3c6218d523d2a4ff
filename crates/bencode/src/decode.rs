use btcore_variant::{VMap, Variant, VString};

use crate::error::{BencodeError, BencodeErrorKind};
use crate::options::BDecodeOpts;

/// Whether decoded strings copy their bytes or borrow from the input buffer.
///
/// [`ParseMode::InPlace`] avoids a copy per string at the cost of tying the
/// returned [`Variant`] to the lifetime of `bytes`; callers that need to
/// outlive the buffer (or mutate it afterwards) should use
/// [`ParseMode::Owned`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Owned,
    InPlace,
}

const BEN_END: u8 = b'e';
const INT_START: u8 = b'i';
const LIST_START: u8 = b'l';
const DICT_START: u8 = b'd';
const BYTE_LEN_LOW: u8 = b'0';
const BYTE_LEN_HIGH: u8 = b'9';
const BYTE_LEN_END: u8 = b':';

/// Decodes a single bencoded value starting at the front of `bytes`.
///
/// Returns the decoded value and the position of the first byte past it. If
/// `opts.enforce_full_decode()` is set, that position must equal
/// `bytes.len()` or the call fails with [`crate::BencodeErrorKind::TrailingBytes`].
///
/// # Errors
///
/// Returns a [`BencodeError`] describing the first grammar violation found,
/// located at the offending byte.
pub fn decode(bytes: &[u8], opts: BDecodeOpts, mode: ParseMode) -> Result<(Variant<'_>, usize), BencodeError> {
    let (value, pos) = decode_value(bytes, 0, opts, mode, 0)?;
    if opts.enforce_full_decode() && pos != bytes.len() {
        return Err(BencodeError::new(pos, BencodeErrorKind::TrailingBytes));
    }
    Ok((value, pos))
}

fn decode_value<'a>(
    bytes: &'a [u8],
    pos: usize,
    opts: BDecodeOpts,
    mode: ParseMode,
    depth: usize,
) -> Result<(Variant<'a>, usize), BencodeError> {
    if depth >= opts.max_recursion() {
        return Err(BencodeError::new(
            pos,
            BencodeErrorKind::TooDeep { max: opts.max_recursion() },
        ));
    }

    match peek_byte(bytes, pos)? {
        INT_START => {
            let (n, next_pos) = decode_int(bytes, pos + 1, BEN_END)?;
            Ok((Variant::Int(n), next_pos))
        }
        LIST_START => decode_list(bytes, pos + 1, opts, mode, depth),
        DICT_START => decode_dict(bytes, pos + 1, opts, mode, depth),
        BYTE_LEN_LOW..=BYTE_LEN_HIGH => {
            let (slice, next_pos) = decode_bytes(bytes, pos, opts)?;
            let s = match mode {
                ParseMode::Owned => VString::owned(slice.to_vec()),
                ParseMode::InPlace => VString::unmanaged(slice),
            };
            Ok((Variant::String(s), next_pos))
        }
        _ => Err(BencodeError::new(pos, BencodeErrorKind::InvalidByte)),
    }
}

fn decode_int(bytes: &[u8], pos: usize, delim: u8) -> Result<(i64, usize), BencodeError> {
    let rest = &bytes[pos..];
    let Some(rel_end) = rest.iter().position(|&b| b == delim) else {
        return Err(BencodeError::new(pos, BencodeErrorKind::IntNoDelimiter));
    };
    let digits = &rest[..rel_end];

    if digits.len() > 1 {
        if digits[0] == b'-' && digits[1] == b'0' {
            return Err(BencodeError::new(pos, BencodeErrorKind::IntNegativeZero));
        }
        if digits[0] == b'0' {
            return Err(BencodeError::new(pos, BencodeErrorKind::IntZeroPadding));
        }
    }

    let text = std::str::from_utf8(digits).map_err(|_| BencodeError::new(pos, BencodeErrorKind::IntParseError))?;
    let value = text.parse::<i64>().map_err(|_| BencodeError::new(pos, BencodeErrorKind::IntParseError))?;

    Ok((value, pos + rel_end + 1))
}

fn decode_bytes<'a>(bytes: &'a [u8], pos: usize, opts: BDecodeOpts) -> Result<(&'a [u8], usize), BencodeError> {
    let (len, start_pos) = decode_int(bytes, pos, BYTE_LEN_END)?;
    if len < 0 {
        return Err(BencodeError::new(pos, BencodeErrorKind::LengthNegative));
    }
    let len = len as usize;
    if len > opts.max_string_len() {
        return Err(BencodeError::new(
            pos,
            BencodeErrorKind::StringTooLong {
                len,
                cap: opts.max_string_len(),
            },
        ));
    }
    if len > bytes.len().saturating_sub(start_pos) {
        return Err(BencodeError::new(pos, BencodeErrorKind::LengthOverflow));
    }
    let next_pos = start_pos + len;
    Ok((&bytes[start_pos..next_pos], next_pos))
}

fn decode_list<'a>(
    bytes: &'a [u8],
    pos: usize,
    opts: BDecodeOpts,
    mode: ParseMode,
    depth: usize,
) -> Result<(Variant<'a>, usize), BencodeError> {
    let mut items = Vec::new();
    let mut curr = pos;
    while peek_byte(bytes, curr)? != BEN_END {
        let (value, next) = decode_value(bytes, curr, opts, mode, depth + 1)?;
        items.push(value);
        curr = next;
    }
    Ok((Variant::Vector(items), curr + 1))
}

fn decode_dict<'a>(
    bytes: &'a [u8],
    pos: usize,
    opts: BDecodeOpts,
    mode: ParseMode,
    depth: usize,
) -> Result<(Variant<'a>, usize), BencodeError> {
    let mut map = VMap::new();
    let mut last_key: Option<&'a [u8]> = None;
    let mut curr = pos;

    while peek_byte(bytes, curr)? != BEN_END {
        let (key_bytes, next) = decode_bytes(bytes, curr, opts)?;

        if opts.check_key_sort() {
            if let Some(last) = last_key {
                if key_bytes < last {
                    return Err(BencodeError::new(
                        curr,
                        BencodeErrorKind::KeyOrdering {
                            key: key_bytes.to_vec(),
                        },
                    ));
                }
            }
        }
        last_key = Some(key_bytes);
        curr = next;

        let key = btcore_quarks::intern(key_bytes).map_err(|_| {
            BencodeError::new(
                curr,
                BencodeErrorKind::InternFailed {
                    key: key_bytes.to_vec(),
                },
            )
        })?;
        let (value, next) = decode_value(bytes, curr, opts, mode, depth + 1)?;
        curr = next;

        if map.contains(key) {
            return Err(BencodeError::new(
                curr,
                BencodeErrorKind::KeyDuplicate {
                    key: key_bytes.to_vec(),
                },
            ));
        }
        map.insert_or_assign(key, value);
    }

    Ok((Variant::Map(map), curr + 1))
}

fn peek_byte(bytes: &[u8], pos: usize) -> Result<u8, BencodeError> {
    bytes.get(pos).copied().ok_or(BencodeError::new(pos, BencodeErrorKind::BytesEmpty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_default(bytes: &[u8]) -> Variant<'_> {
        decode(bytes, BDecodeOpts::default(), ParseMode::InPlace).unwrap().0
    }

    #[test]
    fn decodes_integers() {
        assert_eq!(decode_default(b"i500e").int(), Some(500));
        assert_eq!(decode_default(b"i-500e").int(), Some(-500));
        assert_eq!(decode_default(b"i0e").int(), Some(0));
    }

    #[test]
    fn rejects_leading_zero_and_negative_zero() {
        assert!(decode(b"i0500e", BDecodeOpts::default(), ParseMode::InPlace).is_err());
        assert!(decode(b"i-0e", BDecodeOpts::default(), ParseMode::InPlace).is_err());
    }

    #[test]
    fn decodes_strings_and_lists() {
        let v = decode_default(b"l10:test_bytesi500ee");
        let list = v.vector().unwrap();
        assert_eq!(list[0].str(), Some("test_bytes"));
        assert_eq!(list[1].int(), Some(500));
    }

    #[test]
    fn decodes_dict_with_general_fixture() {
        let bytes = b"d0:12:zero_len_key8:location17:udp://test.com:8011:nested dictd4:listli-500500eee6:numberi500500ee";
        let v = decode_default(bytes);
        let map = v.map().unwrap();
        let empty_key = btcore_quarks::intern(b"").unwrap();
        let location_key = btcore_quarks::intern(b"location").unwrap();
        let number_key = btcore_quarks::intern(b"number").unwrap();
        assert_eq!(map.find(empty_key).unwrap().str(), Some("zero_len_key"));
        assert_eq!(map.find(location_key).unwrap().str(), Some("udp://test.com:80"));
        assert_eq!(map.find(number_key).unwrap().int(), Some(500_500));

        let nested_dict_key = btcore_quarks::intern(b"nested dict").unwrap();
        let nested_dict = map.find(nested_dict_key).unwrap().map().unwrap();
        let nested_list = nested_dict
            .find(btcore_quarks::intern(b"list").unwrap())
            .unwrap()
            .vector()
            .unwrap();
        assert_eq!(nested_list[0].int(), Some(-500_500));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = decode(b"d5:a_keyi0e5:a_keyi0ee", BDecodeOpts::default(), ParseMode::InPlace).unwrap_err();
        assert!(matches!(err.kind, BencodeErrorKind::KeyDuplicate { .. }));
    }

    #[test]
    fn permits_trailing_bytes_by_default() {
        let (_, pos) = decode(b"i0e_asd", BDecodeOpts::default(), ParseMode::InPlace).unwrap();
        assert_eq!(pos, 3);
    }

    #[test]
    fn enforce_full_decode_opts_in_to_rejecting_trailing_bytes() {
        let opts = BDecodeOpts::default().with_enforce_full_decode(true);
        let err = decode(b"i0e_asd", opts, ParseMode::InPlace).unwrap_err();
        assert!(matches!(err.kind, BencodeErrorKind::TrailingBytes));
    }

    #[test]
    fn owned_mode_copies_strings() {
        let bytes = b"5:hello".to_vec();
        let (v, _) = decode(&bytes, BDecodeOpts::default(), ParseMode::Owned).unwrap();
        assert!(match &v {
            Variant::String(s) => !s.is_borrowed(),
            _ => false,
        });
    }

    #[test]
    fn recursion_is_bounded() {
        let deep = "l".repeat(600) + &"e".repeat(600);
        let err = decode(deep.as_bytes(), BDecodeOpts::default(), ParseMode::InPlace).unwrap_err();
        assert!(matches!(err.kind, BencodeErrorKind::TooDeep { .. }));
    }
}
