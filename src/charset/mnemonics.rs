//! MARCMaker mnemonic escape expansion.
//!
//! Legacy export tools emit `{name}` escapes for characters outside
//! ASCII, e.g. `{acute}` for the MARC8 combining acute byte. Expansion
//! runs before the MARC8-to-Unicode mapping, so each mnemonic maps to
//! the single MARC8 byte it stands for. Unknown escapes are left
//! verbatim.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Longest mnemonic name worth scanning for before giving up on a `{`.
const MAX_MNEMONIC_LEN: usize = 10;

static MNEMONICS: Lazy<HashMap<&'static [u8], u8>> = Lazy::new(|| {
    let pairs: &[(&[u8], u8)] = &[
        // escapes for ASCII characters with syntactic meaning
        (b"esc", 0x1B),
        (b"dollar", b'$'),
        (b"bsol", b'\\'),
        (b"lcub", b'{'),
        (b"rcub", b'}'),
        (b"joiner", 0x8D),
        (b"nonjoin", 0x8E),
        // ANSEL spacing graphic characters
        (b"Lstrok", 0xA1),
        (b"Ostrok", 0xA2),
        (b"Dstrok", 0xA3),
        (b"Thorn", 0xA4),
        (b"AElig", 0xA5),
        (b"OElig", 0xA6),
        (b"softsign", 0xA7),
        (b"middot", 0xA8),
        (b"flat", 0xA9),
        (b"reg", 0xAA),
        (b"plusmn", 0xAB),
        (b"Ohorn", 0xAC),
        (b"Uhorn", 0xAD),
        (b"mlrhring", 0xAE),
        (b"mllhring", 0xB0),
        (b"lstrok", 0xB1),
        (b"ostrok", 0xB2),
        (b"dstrok", 0xB3),
        (b"thorn", 0xB4),
        (b"aelig", 0xB5),
        (b"oelig", 0xB6),
        (b"hardsign", 0xB7),
        (b"inodot", 0xB8),
        (b"pound", 0xB9),
        (b"eth", 0xBA),
        (b"ohorn", 0xBC),
        (b"uhorn", 0xBD),
        (b"deg", 0xC0),
        (b"scriptl", 0xC1),
        (b"phono", 0xC2),
        (b"copy", 0xC3),
        (b"sharp", 0xC4),
        (b"iquest", 0xC5),
        (b"iexcl", 0xC6),
        (b"szlig", 0xC7),
        (b"euro", 0xC8),
        // ANSEL combining marks (precede their base in MARC8)
        (b"hooka", 0xE0),
        (b"grave", 0xE1),
        (b"acute", 0xE2),
        (b"circ", 0xE3),
        (b"tilde", 0xE4),
        (b"macr", 0xE5),
        (b"breve", 0xE6),
        (b"dot", 0xE7),
        (b"uml", 0xE8),
        (b"umlaut", 0xE8),
        (b"caron", 0xE9),
        (b"ring", 0xEA),
        (b"llig", 0xEB),
        (b"rlig", 0xEC),
        (b"rcommaa", 0xED),
        (b"dblac", 0xEE),
        (b"candra", 0xEF),
        (b"cedil", 0xF0),
        (b"ogon", 0xF1),
        (b"dotb", 0xF2),
        (b"dbldotb", 0xF3),
        (b"ringb", 0xF4),
        (b"dblunder", 0xF5),
        (b"under", 0xF6),
        (b"commab", 0xF7),
        (b"rcedil", 0xF8),
        (b"breveb", 0xF9),
        (b"ldbltil", 0xFA),
        (b"rdbltil", 0xFB),
        (b"commaa", 0xFE),
    ];
    pairs.iter().copied().collect()
});

/// Replace every known `{mnemonic}` with its MARC8 byte.
pub fn expand(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'{' {
            let window = &input[i + 1..input.len().min(i + 2 + MAX_MNEMONIC_LEN)];
            if let Some(close) = window.iter().position(|&b| b == b'}') {
                if let Some(&byte) = MNEMONICS.get(&window[..close]) {
                    out.push(byte);
                    i += close + 2;
                    continue;
                }
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}
