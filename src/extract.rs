//! Per-tag extraction rules for wanted MARC fields.
//!
//! Each rule receives a resolved tag-line (raw bytes, terminator
//! included) and produces typed values. Identifier rules work on raw
//! bytes because legacy identifier fields carry high-byte noise that
//! must be filtered, not decoded; name and title rules decode first.

use once_cell::sync::Lazy;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use crate::edition::NameRecord;
use crate::isbn::tidy_isbn;
use crate::subfields::{contents, raw_subfields, subfield_values, subfields};
use crate::{FIELD_TERMINATOR, SUBFIELD_DELIMITER};

/// No monograph runs longer than this; larger integers in the extent
/// field are catalog or stock numbers, not page counts. Empirical bound
/// kept for compatibility with known bad data.
pub const MAX_NUMBER_OF_PAGES: u32 = 50_000;

/// Binding and paper vocabulary that marks a physical monograph.
static RE_REAL_BOOK: Lazy<BytesRegex> =
    Lazy::new(|| BytesRegex::new(r"(?i-u)(pbk|hardcover|alk[^a-z]paper|cloth)").unwrap());

/// All-question-mark LCCN placeholder.
static RE_QUESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\?+$").unwrap());

/// An LCCN: 3-character prefix then the digit run.
static RE_LCCN: Lazy<BytesRegex> = Lazy::new(|| BytesRegex::new(r"(?-u)(...\d+)").unwrap());

/// Multi-digit integers in extent text.
static RE_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{2,}").unwrap());

/// An ISBN token and its optional qualifying parenthetical.
static RE_ISBN: Lazy<BytesRegex> = Lazy::new(|| {
    BytesRegex::new(r"(?-u)^([^ ()]+[\dX])(?: \((?:v\. (\d+)(?: : )?)?(.*)\))?").unwrap()
});

/// An OCLC control number: the `(OCoLC)` prefix then digits, leading
/// zeros dropped.
static RE_OCLC: Lazy<BytesRegex> =
    Lazy::new(|| BytesRegex::new(r"(?-u)^\(OCoLC\).*?0*([1-9]\d*|0)").unwrap());

/// A bare date range misfiled under a name subfield.
static RE_DATES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?(\d+-\d*|\d*-\d+)\)?$").unwrap());

/// Punctuation trimmed off name, title, and publisher fragments.
const NAME_TRIM: &[char] = &[' ', '/', ',', ';', ':'];

/// Closed set of extraction rules, one per supported tag class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// 001: the whole field, verbatim.
    ControlNumber,
    /// 003: control number identifier, consulted for the OCoLC marker.
    ControlNumberId,
    /// 006: additional material characteristics (electronic marker).
    MaterialCharacteristics,
    /// 008: fixed-position date and country.
    FixedData,
    /// 010 $a.
    Lccn,
    /// 020 $a/$z, or positional when no delimiters survive.
    Isbn,
    /// 035 $a.
    Oclc,
    /// 100/700 $a-$d.
    PersonName,
    /// 110/710 $a/$b.
    OrgName,
    /// 111/711 $a/$b/$d/$n.
    EventName,
    /// 245 $a/$b/$c/$h.
    TitleStatement,
    /// 260 $b.
    Publisher,
    /// 300 $a.
    Extent,
}

/// Dispatch table from tag to rule. Tags outside this table are never
/// consulted during edition assembly.
pub fn rule_for(tag: &str) -> Option<TagRule> {
    Some(match tag {
        "001" => TagRule::ControlNumber,
        "003" => TagRule::ControlNumberId,
        "006" => TagRule::MaterialCharacteristics,
        "008" => TagRule::FixedData,
        "010" => TagRule::Lccn,
        "020" => TagRule::Isbn,
        "035" => TagRule::Oclc,
        "100" | "700" => TagRule::PersonName,
        "110" | "710" => TagRule::OrgName,
        "111" | "711" => TagRule::EventName,
        "245" => TagRule::TitleStatement,
        "260" => TagRule::Publisher,
        "300" => TagRule::Extent,
        _ => return None,
    })
}

/// Every tag the assembler asks the directory for.
pub const WANTED_TAGS: &[&str] = &[
    "001", "003", "006", "008", "010", "020", "035", "100", "110", "111", "245", "260",
    "300", "700", "710", "711",
];

/// Tag 001: the entire field sans terminator, verbatim.
pub fn read_control_number(line: &[u8]) -> Vec<String> {
    let body = line.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(line);
    vec![String::from_utf8_lossy(body).into_owned()]
}

/// Tag 010 $a: reject placeholder values, anchor on the prefix-plus-
/// digits shape, strip embedded letters and high-byte noise.
pub fn read_lccn(line: &[u8]) -> Vec<String> {
    let mut found = Vec::new();
    for (_, value) in raw_subfields(line, &['a']) {
        let lccn = value.trim_ascii();
        if let Ok(text) = std::str::from_utf8(lccn) {
            if RE_QUESTION.is_match(text) {
                continue;
            }
        }
        let Some(caps) = RE_LCCN.captures(lccn) else {
            continue;
        };
        let kept: Vec<u8> = caps[1]
            .iter()
            .copied()
            .filter(|&b| !b.is_ascii_alphabetic() && b < 0x80)
            .collect();
        let cleaned = String::from_utf8_lossy(&kept).trim().to_string();
        if !cleaned.is_empty() {
            found.push(cleaned);
        }
    }
    found
}

/// Tag 020: ISBN tokens from $a/$z, or from the field body when no
/// subfield delimiters survive. Matched tokens go through the
/// canonicalizer collaborator.
pub fn read_isbn(line: &[u8]) -> Vec<String> {
    let mut found = Vec::new();
    if line.contains(&SUBFIELD_DELIMITER) {
        for (_, value) in raw_subfields(line, &['a', 'z']) {
            if let Some(caps) = RE_ISBN.captures(value) {
                found.push(String::from_utf8_lossy(&caps[1]).into_owned());
            }
        }
    } else if line.len() >= 4 {
        if let Some(caps) = RE_ISBN.captures(&line[3..line.len() - 1]) {
            found.push(String::from_utf8_lossy(&caps[1]).into_owned());
        }
    }
    tidy_isbn(found)
}

/// Whether a 020 field carries binding vocabulary marking a genuine
/// physical monograph.
pub fn has_binding_signal(line: &[u8]) -> bool {
    RE_REAL_BOOK.is_match(line)
}

/// Tag 035 $a: only `(OCoLC)`-prefixed numbers count.
pub fn read_oclc(line: &[u8]) -> Vec<String> {
    let mut found = Vec::new();
    for (_, value) in raw_subfields(line, &['a']) {
        if let Some(caps) = RE_OCLC.captures(value) {
            found.push(String::from_utf8_lossy(&caps[1]).into_owned());
        }
    }
    found
}

/// Tags 100/700: display name from $a-$c, full name with dates from
/// $a-$d. A non-`d` subfield holding a bare date range is refiled as
/// dates. Nothing is emitted when no name subfield survives.
pub fn read_author_person(line: &[u8], is_marc8: bool) -> Vec<NameRecord> {
    let mut name: Vec<String> = Vec::new();
    let mut name_and_date: Vec<String> = Vec::new();
    for (code, value) in subfields(line, &['a', 'b', 'c', 'd'], is_marc8) {
        let is_date = code == 'd' || RE_DATES.is_match(value.trim());
        if is_date {
            name_and_date.push(value);
        } else {
            let trimmed = value.trim_matches(NAME_TRIM).to_string();
            name.push(trimmed.clone());
            name_and_date.push(trimmed);
        }
    }
    if name.is_empty() {
        return Vec::new();
    }
    vec![NameRecord {
        name: name.join(" "),
        db_name: name_and_date.join(" "),
    }]
}

/// Tags 110/710: space-joined trimmed $a/$b, used as both forms.
pub fn read_author_org(line: &[u8], is_marc8: bool) -> Vec<NameRecord> {
    joined_name(line, &['a', 'b'], is_marc8)
}

/// Tags 111/711: space-joined trimmed $a/$b/$d/$n, used as both forms.
pub fn read_author_event(line: &[u8], is_marc8: bool) -> Vec<NameRecord> {
    joined_name(line, &['a', 'b', 'd', 'n'], is_marc8)
}

fn joined_name(line: &[u8], want: &[char], is_marc8: bool) -> Vec<NameRecord> {
    let name = subfield_values(line, want, is_marc8)
        .iter()
        .map(|v| v.trim_matches(NAME_TRIM))
        .collect::<Vec<_>>()
        .join(" ");
    vec![NameRecord {
        name: name.clone(),
        db_name: name,
    }]
}

/// Tag 245: title from $a (else the first $b, which leaves the subtitle
/// pool), subtitle from the remaining $b values joined with `" : "`.
pub fn read_title_and_subtitle(
    line: &[u8],
    is_marc8: bool,
) -> (Option<String>, Option<String>) {
    let mut groups = contents(line, &['a', 'b', 'c', 'h'], is_marc8);
    let title = if let Some(a) = groups.get(&'a') {
        Some(
            a.iter()
                .map(|x| x.trim_matches(NAME_TRIM))
                .collect::<Vec<_>>()
                .join(" "),
        )
    } else if let Some(b) = groups.get_mut(&'b') {
        if b.is_empty() {
            None
        } else {
            Some(b.remove(0).trim_matches(NAME_TRIM).to_string())
        }
    } else {
        None
    };
    let subtitle = groups.get(&'b').filter(|b| !b.is_empty()).map(|b| {
        b.iter()
            .map(|x| x.trim_matches(NAME_TRIM))
            .collect::<Vec<_>>()
            .join(" : ")
    });
    (title, subtitle)
}

/// Tag 260 $b: trimmed, non-empty publisher names.
pub fn read_publisher(line: &[u8], is_marc8: bool) -> Vec<String> {
    subfield_values(line, &['b'], is_marc8)
        .into_iter()
        .map(|v| v.trim_matches(NAME_TRIM).to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Tag 300 $a: the largest plausible integer across repeated extent
/// subfields, or nothing when every integer is implausible.
pub fn read_number_of_pages(line: &[u8], is_marc8: bool) -> Option<u32> {
    let mut max_pages: Option<u32> = None;
    for value in subfield_values(line, &['a'], is_marc8) {
        let best = RE_INT
            .find_iter(&value)
            .filter_map(|m| m.as_str().parse::<u32>().ok())
            .filter(|&n| n < MAX_NUMBER_OF_PAGES)
            .max();
        if let Some(n) = best {
            max_pages = Some(max_pages.map_or(n, |m| m.max(n)));
        }
    }
    max_pages
}

/// Fixed-position values from the 008 field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FixedData {
    pub publish_date: Option<String>,
    pub publish_country: Option<String>,
}

/// Tag 008: a numeric 4-digit year at offset 7, the country code at
/// 15-18 unconditionally.
pub fn read_fixed_data(line: &[u8]) -> FixedData {
    let publish_date = line
        .get(7..11)
        .filter(|b| b.iter().all(u8::is_ascii_digit))
        .map(|b| String::from_utf8_lossy(b).into_owned());
    let publish_country = line
        .get(15..18)
        .map(|b| String::from_utf8_lossy(b).into_owned());
    FixedData {
        publish_date,
        publish_country,
    }
}
