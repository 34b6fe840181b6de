//! Leader, directory, and tag-line resolution for one MARC record.
//!
//! A record is a 24-byte leader, a directory of 12-byte entries locating
//! each variable field, and the field data itself. Legacy producers get
//! the bookkeeping wrong often enough that both the directory and the
//! per-field offsets need recovery paths.

use crate::error::{MarcError, MarcResult};
use crate::FIELD_TERMINATOR;

/// Length of the fixed leader at the start of every record.
pub const LEADER_LENGTH: usize = 24;
/// Width of one directory entry: 3-byte tag, 4-byte length, 5-byte offset.
pub const DIRECTORY_ENTRY_WIDTH: usize = 12;

/// View over the fixed 24-byte record leader.
#[derive(Debug, Clone, Copy)]
pub struct Leader<'a> {
    bytes: &'a [u8],
}

impl<'a> Leader<'a> {
    /// `None` when the record is too short to hold a leader.
    pub fn new(record: &'a [u8]) -> Option<Self> {
        (record.len() >= LEADER_LENGTH).then(|| Self {
            bytes: &record[..LEADER_LENGTH],
        })
    }

    /// Record type and bibliographic level, bytes 6-7. `"am"` marks a
    /// monograph of language material, i.e. a book.
    pub fn is_book(&self) -> bool {
        &self.bytes[6..8] == b"am"
    }

    /// Byte 9 is `a` in Unicode records and blank in MARC8 records.
    pub fn is_marc8(&self) -> bool {
        self.bytes[9] != b'a'
    }
}

/// Location of one variable field, as stated by the directory.
///
/// `offset` is relative to the end of the directory, so the byte it
/// points at is the terminator closing the previous field. `length`
/// includes the field's own trailing terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub tag: String,
    pub length: usize,
    pub offset: usize,
}

/// Parse the record directory.
///
/// Returns the byte offset where the directory ends (the record's first
/// field terminator) and the entries in record order. A terminator
/// falling inside the leader leaves an empty directory. A
/// directory whose byte length is not a multiple of the entry width gets
/// one recovery attempt: some producers mistakenly emit multi-byte UTF-8
/// inside the leader or directory, so the span is re-measured in
/// characters. Still misaligned means [`MarcError::BadDictionary`].
pub fn read_directory(data: &[u8]) -> MarcResult<(usize, Vec<DirectoryEntry>)> {
    let dir_end = data
        .iter()
        .position(|&b| b == FIELD_TERMINATOR)
        .ok_or(MarcError::BadDictionary)?;
    // a terminator inside the leader leaves no directory at all; the
    // record then has no fields and gets rejected downstream
    let directory = if dir_end <= LEADER_LENGTH {
        &[][..]
    } else {
        &data[LEADER_LENGTH..dir_end]
    };
    if directory.len() % DIRECTORY_ENTRY_WIDTH == 0 {
        let entries = directory
            .chunks_exact(DIRECTORY_ENTRY_WIDTH)
            .map(parse_entry_bytes)
            .collect::<MarcResult<Vec<_>>>()?;
        return Ok((dir_end, entries));
    }

    tracing::debug!(
        len = directory.len(),
        "directory misaligned, re-measuring as UTF-8"
    );
    let decoded =
        std::str::from_utf8(&data[..dir_end]).map_err(|_| MarcError::BadDictionary)?;
    let chars: Vec<char> = decoded.chars().skip(LEADER_LENGTH).collect();
    if chars.len() % DIRECTORY_ENTRY_WIDTH != 0 {
        return Err(MarcError::BadDictionary);
    }
    let entries = chars
        .chunks_exact(DIRECTORY_ENTRY_WIDTH)
        .map(parse_entry_chars)
        .collect::<MarcResult<Vec<_>>>()?;
    Ok((dir_end, entries))
}

fn parse_entry_bytes(entry: &[u8]) -> MarcResult<DirectoryEntry> {
    Ok(DirectoryEntry {
        tag: String::from_utf8_lossy(&entry[..3]).into_owned(),
        length: ascii_number(&entry[3..7])?,
        offset: ascii_number(&entry[7..12])?,
    })
}

fn parse_entry_chars(entry: &[char]) -> MarcResult<DirectoryEntry> {
    let digits = |range: std::ops::Range<usize>| -> MarcResult<usize> {
        entry[range].iter().try_fold(0usize, |n, &c| {
            c.to_digit(10)
                .map(|d| n * 10 + d as usize)
                .ok_or(MarcError::BadDictionary)
        })
    };
    Ok(DirectoryEntry {
        tag: entry[..3].iter().collect(),
        length: digits(3..7)?,
        offset: digits(7..12)?,
    })
}

fn ascii_number(bytes: &[u8]) -> MarcResult<usize> {
    bytes.iter().try_fold(0usize, |n, &b| {
        b.is_ascii_digit()
            .then(|| n * 10 + (b - b'0') as usize)
            .ok_or(MarcError::BadDictionary)
    })
}

/// Resolve the raw bytes for one field occurrence.
///
/// `data` is the record sliced from the directory end, so a correct
/// entry offset points at the terminator closing the previous field.
/// Legacy export tools drift by a byte in the offset or the length;
/// either boundary not sitting on a terminator is re-anchored by
/// scanning forward for one. Boundaries past the end of the record
/// clamp, leaving a short (possibly empty) line for the caller to
/// disregard, never a fault.
pub fn tag_line(data: &[u8], entry: &DirectoryEntry) -> Vec<u8> {
    let mut offset = entry.offset;
    let mut length = entry.length;
    if let Some(&at_offset) = data.get(offset) {
        if at_offset != FIELD_TERMINATOR {
            if let Some(delta) = data[offset..]
                .iter()
                .position(|&b| b == FIELD_TERMINATOR)
            {
                offset += delta;
            }
        }
        let last = offset + length;
        if let Some(&at_last) = data.get(last) {
            if at_last != FIELD_TERMINATOR {
                if let Some(delta) =
                    data[last..].iter().position(|&b| b == FIELD_TERMINATOR)
                {
                    length += delta;
                }
            }
        }
    }
    let start = (offset + 1).min(data.len());
    let end = (offset + length + 1).min(data.len()).max(start);
    let line = data[start..end].to_vec();
    if entry.tag.starts_with("00") {
        line
    } else {
        fix_llig(line)
    }
}

/// A known legacy artifact: the `{llig}` mnemonic left verbatim between
/// the first indicator and the subfield delimiter. Replace it with the
/// combining ligature left half it stands for.
fn fix_llig(line: Vec<u8>) -> Vec<u8> {
    const MARKER: &[u8] = b"{llig}\x1f";
    if line.len() >= 8 && &line[1..8] == MARKER {
        let mut fixed = Vec::with_capacity(line.len());
        fixed.push(line[0]);
        let mut buf = [0u8; 4];
        fixed.extend_from_slice('\u{FE20}'.encode_utf8(&mut buf).as_bytes());
        fixed.extend_from_slice(&line[7..]);
        fixed
    } else {
        line
    }
}

/// Resolved lines for every directory entry whose tag is in `want`, in
/// directory order.
pub fn tag_lines(data: &[u8], want: &[&str]) -> MarcResult<Vec<(String, Vec<u8>)>> {
    let (dir_end, entries) = read_directory(data)?;
    let body = &data[dir_end..];
    Ok(entries
        .into_iter()
        .filter(|e| want.contains(&e.tag.as_str()))
        .map(|e| {
            let line = tag_line(body, &e);
            (e.tag, line)
        })
        .collect())
}
