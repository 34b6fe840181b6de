//! Subfield splitting for resolved tag-lines.
//!
//! A data field line is two indicator bytes, then subfields each
//! introduced by the delimiter byte and a one-character code, then the
//! field terminator. Codes repeat freely; order is meaningful and is
//! always preserved.

use indexmap::IndexMap;

use crate::charset::translate;
use crate::error::{MarcError, MarcResult};
use crate::SUBFIELD_DELIMITER;

/// Wrapped continuation lines are only recognized past this length.
/// Empirical bound from observed NACO exports, kept for compatibility
/// with known bad data.
pub const WRAP_LENGTH_THRESHOLD: usize = 500;

/// Marker closing every continuation line but the last: `++` then the
/// field terminator.
const CONTINUATION_SUFFIX: &[u8] = b"++\x1e";

/// The subfield region of a line: everything between the indicator
/// prefix and the trailing terminator.
fn inner(line: &[u8]) -> &[u8] {
    if line.len() < 4 {
        &[]
    } else {
        &line[3..line.len() - 1]
    }
}

/// Raw `(code, value)` pairs with no decoding, filtered by `want`.
pub fn raw_subfields<'a>(line: &'a [u8], want: &[char]) -> Vec<(char, &'a [u8])> {
    inner(line)
        .split(|&b| b == SUBFIELD_DELIMITER)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let code = part[0] as char;
            want.contains(&code).then(|| (code, &part[1..]))
        })
        .collect()
}

/// Every subfield, decoded.
pub fn all_subfields(line: &[u8], is_marc8: bool) -> Vec<(char, String)> {
    inner(line)
        .split(|&b| b == SUBFIELD_DELIMITER)
        .filter(|part| !part.is_empty())
        .map(|part| (part[0] as char, translate(&part[1..], is_marc8)))
        .collect()
}

/// Decoded subfields whose code is in `want`; order and duplicate codes
/// are preserved.
pub fn subfields(line: &[u8], want: &[char], is_marc8: bool) -> Vec<(char, String)> {
    inner(line)
        .split(|&b| b == SUBFIELD_DELIMITER)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let code = part[0] as char;
            want.contains(&code)
                .then(|| (code, translate(&part[1..], is_marc8)))
        })
        .collect()
}

/// Decoded values only, filtered by `want`.
pub fn subfield_values(line: &[u8], want: &[char], is_marc8: bool) -> Vec<String> {
    subfields(line, want, is_marc8)
        .into_iter()
        .map(|(_, v)| v)
        .collect()
}

/// Decoded subfields grouped by code, insertion-ordered.
pub fn contents(line: &[u8], want: &[char], is_marc8: bool) -> IndexMap<char, Vec<String>> {
    let mut map: IndexMap<char, Vec<String>> = IndexMap::new();
    for (code, value) in subfields(line, want, is_marc8) {
        map.entry(code).or_default().push(value);
    }
    map
}

/// Rejoin NACO-style wrapped fields before splitting.
///
/// A long field may be exported as several consecutive lines of the same
/// tag, each but the last ending in `++` before its terminator. The
/// logical field is the first line up to its continuation marker, the
/// inner content of each middle line (2-byte prefix and 3-byte marker
/// stripped), and the closing line sans its 2-byte prefix. Continuation
/// lines disagreeing on the tag is an integrity error, as is a run that
/// never closes.
pub fn rejoin_wrapped_lines(
    lines: Vec<(String, Vec<u8>)>,
) -> MarcResult<Vec<(String, Vec<u8>)>> {
    let mut out = Vec::with_capacity(lines.len());
    let mut pending: Option<(String, Vec<Vec<u8>>)> = None;

    for (tag, line) in lines {
        let continues =
            line.len() > WRAP_LENGTH_THRESHOLD && line.ends_with(CONTINUATION_SUFFIX);
        if continues {
            match pending.as_mut() {
                Some((held_tag, held)) => {
                    if *held_tag != tag {
                        return Err(MarcError::WrappedFieldMismatch {
                            expected: held_tag.clone(),
                            found: tag,
                        });
                    }
                    held.push(line);
                }
                None => pending = Some((tag, vec![line])),
            }
            continue;
        }
        if let Some((held_tag, held)) = pending.take() {
            let mut joined = held[0][..held[0].len() - 3].to_vec();
            for middle in &held[1..] {
                joined.extend_from_slice(&middle[2..middle.len() - 3]);
            }
            joined.extend_from_slice(line.get(2..).unwrap_or(&[]));
            out.push((held_tag, joined));
            continue;
        }
        out.push((tag, line));
    }

    if let Some((tag, _)) = pending {
        return Err(MarcError::UnterminatedWrappedField { tag });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FIELD_TERMINATOR, SUBFIELD_DELIMITER};

    fn line(subs: &[(char, &str)]) -> Vec<u8> {
        let mut l = vec![b' ', b' '];
        for (code, value) in subs {
            l.push(SUBFIELD_DELIMITER);
            l.push(*code as u8);
            l.extend_from_slice(value.as_bytes());
        }
        l.push(FIELD_TERMINATOR);
        l
    }

    #[test]
    fn splits_in_order_with_duplicates() {
        let l = line(&[('a', "Title"), ('b', "first"), ('b', "second")]);
        assert_eq!(
            all_subfields(&l, false),
            vec![
                ('a', "Title".to_string()),
                ('b', "first".to_string()),
                ('b', "second".to_string()),
            ]
        );
        assert_eq!(
            subfield_values(&l, &['b'], false),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn raw_subfields_pass_bytes_through() {
        let l = line(&[('a', "68-4897"), ('z', "noise")]);
        let raw = raw_subfields(&l, &['a']);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].0, 'a');
        assert_eq!(raw[0].1, b"68-4897");
    }

    #[test]
    fn split_then_rejoin_reproduces_line() {
        let l = line(&[('a', "Alpha"), ('q', "Beta"), ('a', "Gamma")]);
        let mut rebuilt = l[..2].to_vec();
        for (code, value) in all_subfields(&l, false) {
            rebuilt.push(SUBFIELD_DELIMITER);
            rebuilt.push(code as u8);
            rebuilt.extend_from_slice(value.as_bytes());
        }
        rebuilt.push(FIELD_TERMINATOR);
        assert_eq!(rebuilt, l);
    }

    #[test]
    fn contents_groups_by_code_in_order() {
        let l = line(&[('b', "one"), ('a', "main"), ('b', "two")]);
        let groups = contents(&l, &['a', 'b'], false);
        assert_eq!(groups.get_index(0).map(|(k, _)| *k), Some('b'));
        assert_eq!(groups[&'b'], vec!["one".to_string(), "two".to_string()]);
        assert_eq!(groups[&'a'], vec!["main".to_string()]);
    }

    #[test]
    fn short_line_has_no_subfields() {
        assert!(all_subfields(b"\x1e", false).is_empty());
        assert!(all_subfields(&[], false).is_empty());
    }

    fn continuation_line(fill: usize) -> Vec<u8> {
        let mut l = vec![b' ', b' ', SUBFIELD_DELIMITER, b'a'];
        l.resize(4 + fill, b'n');
        l.extend_from_slice(b"++\x1e");
        l
    }

    #[test]
    fn wrapped_lines_are_rejoined() {
        let first = continuation_line(600);
        let middle = continuation_line(580);
        let mut last = vec![b' ', b' '];
        last.extend_from_slice(b"tail");
        last.push(FIELD_TERMINATOR);

        let lines = vec![
            ("880".to_string(), first.clone()),
            ("880".to_string(), middle.clone()),
            ("880".to_string(), last.clone()),
        ];
        let joined = rejoin_wrapped_lines(lines).unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].0, "880");

        let mut expected = first[..first.len() - 3].to_vec();
        expected.extend_from_slice(&middle[2..middle.len() - 3]);
        expected.extend_from_slice(&last[2..]);
        assert_eq!(joined[0].1, expected);
        assert!(joined[0].1.ends_with(&[FIELD_TERMINATOR]));
    }

    #[test]
    fn ordinary_lines_pass_through_untouched() {
        let l = line(&[('a', "short")]);
        let lines = vec![("245".to_string(), l.clone())];
        assert_eq!(rejoin_wrapped_lines(lines).unwrap(), vec![("245".to_string(), l)]);
    }

    #[test]
    fn mismatched_continuation_tags_are_an_error() {
        let lines = vec![
            ("880".to_string(), continuation_line(600)),
            ("881".to_string(), continuation_line(600)),
        ];
        assert!(matches!(
            rejoin_wrapped_lines(lines),
            Err(MarcError::WrappedFieldMismatch { .. })
        ));
    }

    #[test]
    fn unterminated_continuation_is_an_error() {
        let lines = vec![("880".to_string(), continuation_line(600))];
        assert!(matches!(
            rejoin_wrapped_lines(lines),
            Err(MarcError::UnterminatedWrappedField { .. })
        ));
    }
}
