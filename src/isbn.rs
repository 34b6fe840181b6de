//! Basic structural canonicalization of ISBN tokens.
//!
//! Collaborator for the 020 extractor, treated there as a black box:
//! hyphens are dropped, 10- and 13-character forms pass, and the two
//! concatenated-ISBN shapes seen in legacy exports are split. Checksum
//! validation is out of scope.

/// Canonicalize a batch of raw ISBN-like tokens.
pub fn tidy_isbn(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        let isbn: String = token.chars().filter(|&c| c != '-').collect();
        match isbn.len() {
            10 | 13 => out.push(isbn),
            // two ISBN-10s run together
            20 if isbn.chars().all(|c| c.is_ascii_digit()) => {
                out.push(isbn[..10].to_string());
                out.push(isbn[10..].to_string());
            }
            // two ISBN-10s with a junk separator byte
            21 if isbn.is_ascii() && !isbn.as_bytes()[10].is_ascii_digit() => {
                out.push(isbn[..10].to_string());
                out.push(isbn[11..].to_string());
            }
            _ => out.push(isbn),
        }
    }
    out
}
