//! MARC8 (ANSEL) to Unicode conversion.
//!
//! A fixed mapping: ASCII passes through, 0xA1-0xC8 are spacing graphic
//! characters, 0xE0-0xFE are combining marks. MARC8 places a combining
//! mark before its base letter while Unicode places it after, so pending
//! marks are held and re-attached behind the next base character; NFC
//! normalization downstream then composes them.

/// Convert expanded MARC8 bytes to Unicode text.
pub fn to_unicode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut pending: Vec<char> = Vec::new();
    for &b in bytes {
        if (0xE0..=0xFE).contains(&b) {
            if let Some(mark) = marc8_char(b) {
                pending.push(mark);
            }
            continue;
        }
        let c = if b < 0x80 {
            b as char
        } else {
            marc8_char(b).unwrap_or(char::REPLACEMENT_CHARACTER)
        };
        out.push(c);
        out.extend(pending.drain(..));
    }
    // marks with no base letter trail the output as-is
    out.extend(pending);
    out
}

/// The fixed MARC8 high-range table.
fn marc8_char(b: u8) -> Option<char> {
    Some(match b {
        // spacing graphic characters
        0xA1 => 'Ł',
        0xA2 => 'Ø',
        0xA3 => 'Đ',
        0xA4 => 'Þ',
        0xA5 => 'Æ',
        0xA6 => 'Œ',
        0xA7 => '\u{02B9}', // prime / soft sign
        0xA8 => '·',
        0xA9 => '♭',
        0xAA => '®',
        0xAB => '±',
        0xAC => 'Ơ',
        0xAD => 'Ư',
        0xAE => '\u{02BC}', // alif
        0xB0 => '\u{02BB}', // ayn
        0xB1 => 'ł',
        0xB2 => 'ø',
        0xB3 => 'đ',
        0xB4 => 'þ',
        0xB5 => 'æ',
        0xB6 => 'œ',
        0xB7 => '\u{02BA}', // double prime / hard sign
        0xB8 => 'ı',
        0xB9 => '£',
        0xBA => 'ð',
        0xBC => 'ơ',
        0xBD => 'ư',
        0xC0 => '°',
        0xC1 => 'ℓ',
        0xC2 => '℗',
        0xC3 => '©',
        0xC4 => '♯',
        0xC5 => '¿',
        0xC6 => '¡',
        0xC7 => 'ß',
        0xC8 => '€',
        // combining marks
        0xE0 => '\u{0309}', // hook above
        0xE1 => '\u{0300}', // grave
        0xE2 => '\u{0301}', // acute
        0xE3 => '\u{0302}', // circumflex
        0xE4 => '\u{0303}', // tilde
        0xE5 => '\u{0304}', // macron
        0xE6 => '\u{0306}', // breve
        0xE7 => '\u{0307}', // dot above
        0xE8 => '\u{0308}', // diaeresis
        0xE9 => '\u{030C}', // caron
        0xEA => '\u{030A}', // ring above
        0xEB => '\u{FE20}', // ligature left half
        0xEC => '\u{FE21}', // ligature right half
        0xED => '\u{0315}', // comma above right
        0xEE => '\u{030B}', // double acute
        0xEF => '\u{0310}', // candrabindu
        0xF0 => '\u{0327}', // cedilla
        0xF1 => '\u{0328}', // ogonek
        0xF2 => '\u{0323}', // dot below
        0xF3 => '\u{0324}', // diaeresis below
        0xF4 => '\u{0325}', // ring below
        0xF5 => '\u{0333}', // double underscore
        0xF6 => '\u{0332}', // underscore
        0xF7 => '\u{0326}', // comma below
        0xF8 => '\u{031C}', // half ring below
        0xF9 => '\u{032E}', // breve below
        0xFA => '\u{FE22}', // double tilde left half
        0xFB => '\u{FE23}', // double tilde right half
        0xFE => '\u{0313}', // comma above
        _ => return None,
    })
}
