//! Character decoding for MARC field data.
//!
//! The leader's encoding byte says whether a record carries UTF-8 or the
//! legacy MARC8 8-bit encoding. MARC8 data additionally shows up with
//! `{mnemonic}` escapes left in by MARCMaker-era tools, so the legacy
//! path first expands those to their raw byte equivalents, then maps the
//! bytes through the fixed MARC8-to-Unicode table. Both paths normalize
//! to NFC so combining sequences compare equal to their precomposed
//! forms.

pub mod marc8;
pub mod mnemonics;

use unicode_normalization::UnicodeNormalization;

/// Decode raw field bytes to canonically composed Unicode text.
pub fn translate(bytes: &[u8], is_marc8: bool) -> String {
    let text = if is_marc8 {
        marc8::to_unicode(&mnemonics::expand(bytes))
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };
    text.nfc().collect()
}
