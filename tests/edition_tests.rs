//! End-to-end tests over synthetic MARC binary records.

use std::io::Cursor;

use marcbin::{read_edition, MarcResult, RecordFramer};

const FIELD_TERMINATOR: u8 = 0x1E;
const RECORD_TERMINATOR: u8 = 0x1D;
const SUBFIELD_DELIMITER: u8 = 0x1F;

/// A data field: blank indicators, delimited subfields, terminator.
fn data_field(subs: &[(char, &str)]) -> Vec<u8> {
    let mut field = vec![b' ', b' '];
    for (code, value) in subs {
        field.push(SUBFIELD_DELIMITER);
        field.push(*code as u8);
        field.extend_from_slice(value.as_bytes());
    }
    field.push(FIELD_TERMINATOR);
    field
}

/// A control field: bare content plus terminator.
fn control_field(value: &str) -> Vec<u8> {
    let mut field = value.as_bytes().to_vec();
    field.push(FIELD_TERMINATOR);
    field
}

/// A 40-character 008 field with the given year and country in place.
fn fixed_field_008(year: &str, country: &str) -> Vec<u8> {
    let mut content = format!("850101s{year}    {country}");
    while content.len() < 40 {
        content.push(' ');
    }
    control_field(&content)
}

/// Assemble a structurally valid record: leader, directory, fields.
fn build_record(type_code: &str, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut body = Vec::new();
    for (tag, field) in fields {
        directory
            .extend_from_slice(format!("{}{:04}{:05}", tag, field.len(), body.len()).as_bytes());
        body.extend_from_slice(field);
    }
    let base = 24 + directory.len() + 1;
    let total = base + body.len() + 1;

    let mut record = format!("{total:05}").into_bytes();
    record.push(b'n'); // status
    record.extend_from_slice(type_code.as_bytes()); // type, bib level
    record.push(b' ');
    record.push(b'a'); // unicode
    record.extend_from_slice(b"22");
    record.extend_from_slice(format!("{base:05}").as_bytes());
    record.extend_from_slice(b"   4500");
    assert_eq!(record.len(), 24);

    record.extend_from_slice(&directory);
    record.push(FIELD_TERMINATOR);
    record.extend_from_slice(&body);
    record.push(RECORD_TERMINATOR);
    assert_eq!(record.len(), total);
    record
}

/// A plain book record: 008, title, author, publisher, extent.
fn book_record() -> Vec<u8> {
    build_record(
        "am",
        &[
            ("008", fixed_field_008("1985", "nyu")),
            ("100", data_field(&[('a', "Rhys, Jean,"), ('d', "1890-1979.")])),
            ("245", data_field(&[('a', "Wide Sargasso Sea :"), ('b', "a novel /")])),
            ("260", data_field(&[('a', "New York :"), ('b', "Norton,"), ('c', "1985.")])),
            ("300", data_field(&[('a', "xiv, 352 p. : ill. ; 24 cm")])),
        ],
    )
}

#[test]
fn framer_then_extractor_round_trip() {
    let records = [book_record(), book_record(), book_record()];
    let stream: Vec<u8> = records.concat();
    let framed: Vec<_> = RecordFramer::new(Cursor::new(stream))
        .collect::<MarcResult<Vec<_>>>()
        .unwrap();
    assert_eq!(framed.len(), 3);
    for (data, consumed) in framed {
        assert_eq!(consumed, data.len());
        assert_eq!(&data[..5], format!("{consumed:05}").as_bytes());
        assert!(read_edition(&data, false).unwrap().is_some());
    }
}

#[test]
fn full_edition_extraction() {
    let edition = read_edition(&book_record(), false).unwrap().unwrap();
    assert_eq!(edition.title.as_deref(), Some("Wide Sargasso Sea"));
    assert_eq!(edition.subtitle.as_deref(), Some("a novel"));
    assert_eq!(edition.authors.len(), 1);
    assert_eq!(edition.authors[0].name, "Rhys, Jean");
    assert_eq!(edition.authors[0].db_name, "Rhys, Jean 1890-1979.");
    assert_eq!(edition.publishers, vec!["Norton"]);
    assert_eq!(edition.number_of_pages, Some(352));
    assert_eq!(edition.publish_date.as_deref(), Some("1985"));
    assert_eq!(edition.publish_country.as_deref(), Some("nyu"));
}

#[test]
fn non_book_leader_is_rejected() {
    let record = build_record(
        "as",
        &[
            ("008", fixed_field_008("1985", "nyu")),
            ("245", data_field(&[('a', "A serial")])),
        ],
    );
    assert!(read_edition(&record, false).unwrap().is_none());
}

#[test]
fn missing_008_is_rejected() {
    let record = build_record("am", &[("245", data_field(&[('a', "No fixed field")]))]);
    assert!(read_edition(&record, false).unwrap().is_none());
}

#[test]
fn duplicate_008_is_rejected() {
    let record = build_record(
        "am",
        &[
            ("008", fixed_field_008("1985", "nyu")),
            ("008", fixed_field_008("1986", "enk")),
            ("245", data_field(&[('a', "Doubly fixed")])),
        ],
    );
    assert!(read_edition(&record, false).unwrap().is_none());
}

#[test]
fn electronic_without_binding_signal_is_rejected() {
    let electronic = |extra_fields: &[(&str, Vec<u8>)]| {
        let mut fields = vec![
            ("006", control_field("m        d        ")),
            ("008", fixed_field_008("2001", "cau")),
            ("245", data_field(&[('a', "An e-book")])),
        ];
        fields.extend_from_slice(extra_fields);
        build_record("am", &fields)
    };

    let bare = electronic(&[]);
    assert!(read_edition(&bare, false).unwrap().is_none());
    // the caller may opt in to electronic resources
    assert!(read_edition(&bare, true).unwrap().is_some());

    // a binding note on the 020 marks a genuine physical monograph
    let with_pbk = electronic(&[("020", data_field(&[('a', "0-1234-5678-9 (pbk.)")]))]);
    let edition = read_edition(&with_pbk, false).unwrap().unwrap();
    assert_eq!(edition.isbn, vec!["0123456789"]);
}

#[test]
fn sound_recording_is_rejected() {
    let record = build_record(
        "am",
        &[
            ("008", fixed_field_008("1975", "nyu")),
            ("245", data_field(&[('a', "Spoken word")])),
            ("260", data_field(&[('b', "Caedmon,"), ('h', "[sound recording]")])),
        ],
    );
    assert!(read_edition(&record, false).unwrap().is_none());
}

#[test]
fn conflicting_author_roles_are_rejected() {
    let record = build_record(
        "am",
        &[
            ("008", fixed_field_008("1990", "ilu")),
            ("100", data_field(&[('a', "Person, Some.")])),
            ("110", data_field(&[('a', "An Organization.")])),
            ("245", data_field(&[('a', "Contested authorship")])),
        ],
    );
    assert!(read_edition(&record, false).unwrap().is_none());
}

#[test]
fn contributors_do_not_conflict_with_authors() {
    let record = build_record(
        "am",
        &[
            ("008", fixed_field_008("1990", "ilu")),
            ("100", data_field(&[('a', "Author, Main.")])),
            ("700", data_field(&[('a', "Helper, First.")])),
            ("710", data_field(&[('a', "Helper Organization.")])),
            ("245", data_field(&[('a', "Many hands")])),
        ],
    );
    let edition = read_edition(&record, false).unwrap().unwrap();
    assert_eq!(edition.authors.len(), 1);
    assert_eq!(edition.contribs.len(), 2);
    assert_eq!(edition.contribs[0].name, "Helper, First.");
}

#[test]
fn control_number_promotes_to_oclc() {
    let record = build_record(
        "am",
        &[
            ("001", control_field("12345678")),
            ("003", control_field("OCoLC")),
            ("008", fixed_field_008("1999", "nyu")),
            ("245", data_field(&[('a', "With control number")])),
        ],
    );
    let edition = read_edition(&record, false).unwrap().unwrap();
    assert_eq!(edition.oclc, vec!["12345678"]);
}

#[test]
fn first_of_repeated_control_numbers_promotes() {
    let record = build_record(
        "am",
        &[
            ("001", control_field("12345678")),
            ("001", control_field("87654321")),
            ("003", control_field("OCoLC")),
            ("008", fixed_field_008("1999", "nyu")),
            ("245", data_field(&[('a', "Doubly numbered")])),
        ],
    );
    let edition = read_edition(&record, false).unwrap().unwrap();
    assert_eq!(edition.oclc, vec!["12345678"]);
}

#[test]
fn control_number_without_ocolc_marker_is_dropped() {
    let record = build_record(
        "am",
        &[
            ("001", control_field("12345678")),
            ("003", control_field("DLC")),
            ("008", fixed_field_008("1999", "nyu")),
            ("245", data_field(&[('a', "Foreign control number")])),
        ],
    );
    let edition = read_edition(&record, false).unwrap().unwrap();
    assert!(edition.oclc.is_empty());
}

#[test]
fn oclc_035_and_lccn_are_extracted() {
    let record = build_record(
        "am",
        &[
            ("008", fixed_field_008("1968", "nyu")),
            ("010", data_field(&[('a', "   68004897 ")])),
            ("035", data_field(&[('a', "(OCoLC)00099999")])),
            ("245", data_field(&[('a', "Identified")])),
        ],
    );
    let edition = read_edition(&record, false).unwrap().unwrap();
    assert_eq!(edition.lccn, vec!["68004897"]);
    assert_eq!(edition.oclc, vec!["99999"]);
}

#[test]
fn repeated_extent_fields_keep_running_maximum() {
    let record = build_record(
        "am",
        &[
            ("008", fixed_field_008("1980", "nyu")),
            ("245", data_field(&[('a', "Two volumes")])),
            ("300", data_field(&[('a', "v. 1 : 210 p.")])),
            ("300", data_field(&[('a', "v. 2 : 480 p.")])),
        ],
    );
    let edition = read_edition(&record, false).unwrap().unwrap();
    assert_eq!(edition.number_of_pages, Some(480));
}

#[test]
fn short_record_is_a_structural_error() {
    assert!(read_edition(b"0002", false).is_err());
}

#[test]
fn serialized_edition_skips_empty_members() {
    let edition = read_edition(&book_record(), false).unwrap().unwrap();
    let json = serde_json::to_value(&edition).unwrap();
    let object = json.as_object().unwrap();
    assert!(object.contains_key("title"));
    assert!(!object.contains_key("isbn"));
    assert!(!object.contains_key("oclc"));
}
