//! Edition assembly and book classification over one record.
//!
//! Drives extraction across a record's wanted tags and applies the
//! book/non-book and electronic/physical heuristics. Classification
//! rejections are ordinary `Ok(None)` returns; only structural
//! corruption is an error.

use tracing::debug;

use crate::edition::Edition;
use crate::error::{MarcError, MarcResult};
use crate::extract::{
    has_binding_signal, read_author_event, read_author_org, read_author_person,
    read_control_number, read_fixed_data, read_isbn, read_lccn, read_number_of_pages,
    read_oclc, read_publisher, read_title_and_subtitle, rule_for, TagRule, WANTED_TAGS,
};
use crate::record::{tag_lines, Leader};
use crate::subfields::rejoin_wrapped_lines;

/// Raw marker inside a 260 field identifying a sound recording.
const SOUND_RECORDING_MARKER: &[u8] = b"\x1fh[sound";

/// Parse one framed record into an [`Edition`].
///
/// `Ok(None)` is a classification rejection: the record is structurally
/// sound but out of scope — not a book, an electronic resource with no
/// physical-binding signal (unless `accept_electronic`), a sound
/// recording, a duplicate or missing 008 field, or conflicting
/// author-role tags. Per-field resolution failures degrade by omitting
/// that field's contribution; directory corruption aborts the record
/// with an error.
pub fn read_edition(data: &[u8], accept_electronic: bool) -> MarcResult<Option<Edition>> {
    let leader = Leader::new(data).ok_or(MarcError::BadDictionary)?;
    if !leader.is_book() {
        debug!("rejecting record: leader type is not a book");
        return Ok(None);
    }
    let is_marc8 = leader.is_marc8();

    let fields = tag_lines(data, WANTED_TAGS)?;
    let fields = rejoin_wrapped_lines(fields)?;

    let mut edition = Edition::default();
    let mut control_number: Option<String> = None;
    let mut seen_008 = false;
    let mut oclc_001 = false;
    let mut says_electronic = false;
    let mut is_physical_book = false;
    let mut author_role_seen = false;

    for (tag, line) in &fields {
        let Some(rule) = rule_for(tag) else { continue };
        match rule {
            TagRule::ControlNumber => {
                // the first 001 is the record's own control number;
                // later occurrences never displace it
                if control_number.is_none() {
                    control_number = read_control_number(line).into_iter().next();
                }
            }
            TagRule::ControlNumberId => {
                if line.len() >= 5 && line[..5].eq_ignore_ascii_case(b"ocolc") {
                    oclc_001 = true;
                }
            }
            TagRule::MaterialCharacteristics => {
                if line.first() == Some(&b'm') {
                    says_electronic = true;
                }
            }
            TagRule::FixedData => {
                if seen_008 {
                    debug!("rejecting record: duplicate 008 field");
                    return Ok(None);
                }
                seen_008 = true;
                let fixed = read_fixed_data(line);
                edition.publish_date = fixed.publish_date;
                edition.publish_country = fixed.publish_country;
            }
            TagRule::Lccn => edition.lccn.extend(read_lccn(line)),
            TagRule::Isbn => {
                if has_binding_signal(line) {
                    is_physical_book = true;
                }
                edition.isbn.extend(read_isbn(line));
            }
            TagRule::Oclc => edition.oclc.extend(read_oclc(line)),
            TagRule::TitleStatement => {
                let (title, subtitle) = read_title_and_subtitle(line, is_marc8);
                edition.title = title;
                edition.subtitle = subtitle;
            }
            TagRule::Publisher => {
                if line
                    .windows(SOUND_RECORDING_MARKER.len())
                    .any(|w| w == SOUND_RECORDING_MARKER)
                {
                    debug!("rejecting record: 260 marks a sound recording");
                    return Ok(None);
                }
                edition.publishers.extend(read_publisher(line, is_marc8));
            }
            TagRule::Extent => {
                if let Some(pages) = read_number_of_pages(line, is_marc8) {
                    edition.number_of_pages =
                        Some(edition.number_of_pages.map_or(pages, |n| n.max(pages)));
                }
            }
            TagRule::PersonName | TagRule::OrgName | TagRule::EventName => {
                let names = match rule {
                    TagRule::PersonName => read_author_person(line, is_marc8),
                    TagRule::OrgName => read_author_org(line, is_marc8),
                    _ => read_author_event(line, is_marc8),
                };
                if matches!(tag.as_str(), "100" | "110" | "111") {
                    if author_role_seen {
                        debug!("rejecting record: conflicting author role tags");
                        return Ok(None);
                    }
                    author_role_seen = true;
                    edition.authors.extend(names);
                } else {
                    edition.contribs.extend(names);
                }
            }
        }
    }

    if !seen_008 {
        debug!("rejecting record: no 008 field, too incomplete to trust");
        return Ok(None);
    }
    if says_electronic && !is_physical_book && !accept_electronic {
        debug!("rejecting record: electronic resource without physical signal");
        return Ok(None);
    }
    if oclc_001 {
        if let Some(number) = control_number {
            if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) {
                edition.oclc.push(number);
            }
        }
    }
    Ok(Some(edition))
}
