//! Record framing for MARC binary streams.
//!
//! Splits a raw byte stream into individual records using the 5-digit
//! decimal length prefix each record carries, recovering from the common
//! framing corruptions: a length prefix that over-counts the record, and
//! one that under-counts it.

use std::io::Read;

use crate::error::{MarcError, MarcResult};
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR};

/// How far past a record's declared end to look for a missing record
/// terminator.
const READAHEAD: usize = 40;

/// Iterator over the records of a MARC binary stream.
///
/// Yields `(record_bytes, consumed_length)` pairs in stream order. The
/// framer holds the only sequential state in the pipeline (its position
/// in the stream plus a carry buffer used when re-anchoring after a bad
/// length prefix), so each stream needs a single consumer. Independent
/// streams can be framed concurrently.
pub struct RecordFramer<R: Read> {
    reader: R,
    carry: Vec<u8>,
    done: bool,
}

impl<R: Read> RecordFramer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            carry: Vec::new(),
            done: false,
        }
    }

    /// Top up the carry buffer to `target` bytes, stopping early at end
    /// of stream.
    fn fill_carry(&mut self, target: usize) -> MarcResult<()> {
        let mut chunk = [0u8; 4096];
        while self.carry.len() < target {
            let want = (target - self.carry.len()).min(chunk.len());
            let n = self.reader.read(&mut chunk[..want])?;
            if n == 0 {
                break;
            }
            self.carry.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }

    fn next_record(&mut self) -> MarcResult<Option<(Vec<u8>, usize)>> {
        self.fill_carry(5)?;
        if self.carry.is_empty() {
            return Ok(None);
        }
        if self.carry.len() < 5 || !self.carry[..5].iter().all(u8::is_ascii_digit) {
            return Err(MarcError::InvalidMarcFile);
        }
        // the 5 prefix bytes count toward the declared length
        let declared = self.carry[..5]
            .iter()
            .fold(0usize, |n, &b| n * 10 + (b - b'0') as usize);

        self.fill_carry(declared)?;
        let take = declared.min(self.carry.len());
        let mut data: Vec<u8> = self.carry.drain(..take).collect();

        if !ends_with_terminator_pair(&data) {
            // Over-counting length prefix: the candidate swallowed the
            // start of the next record. Cut at the last terminator pair
            // and re-anchor the stream on the remainder.
            if let Some(pos) = rfind_terminator_pair(&data) {
                let end = pos + 2;
                let mut rest = data.split_off(end);
                rest.append(&mut self.carry);
                self.carry = rest;
                tracing::warn!(
                    declared,
                    recovered = end,
                    "record shorter than declared length, re-anchoring stream"
                );
                return Ok(Some((data, end)));
            }
        }

        if !data.contains(&RECORD_TERMINATOR) {
            // Under-counting length prefix: the record terminator lies
            // past the declared end. Read ahead and re-derive the
            // effective length from its position. The carry buffer is
            // next in stream order, so it is consumed before the reader.
            self.fill_carry(READAHEAD)?;
            let extra = self.carry.len().min(READAHEAD);
            data.extend(self.carry.drain(..extra));
            let Some(pos) = data.iter().position(|&b| b == RECORD_TERMINATOR) else {
                return Err(MarcError::InvalidMarcFile);
            };
            let effective = pos + 1;
            let mut rest = data.split_off(effective);
            rest.append(&mut self.carry);
            self.carry = rest;
            if !ends_with_terminator_pair(&data) {
                return Err(MarcError::InvalidMarcFile);
            }
            tracing::warn!(
                declared,
                effective,
                "record terminator past declared length, reslicing"
            );
            return Ok(Some((data, effective)));
        }

        if !ends_with_terminator_pair(&data) {
            return Err(MarcError::InvalidMarcFile);
        }
        if data.len() < declared {
            // truncated final record, nothing trustworthy to yield
            tracing::debug!(declared, got = data.len(), "stream ends mid-record");
            return Ok(None);
        }
        Ok(Some((data, declared)))
    }
}

impl<R: Read> Iterator for RecordFramer<R> {
    type Item = MarcResult<(Vec<u8>, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn ends_with_terminator_pair(data: &[u8]) -> bool {
    data.ends_with(&[FIELD_TERMINATOR, RECORD_TERMINATOR])
}

/// Position of the last field-terminator/record-terminator pair.
fn rfind_terminator_pair(data: &[u8]) -> Option<usize> {
    data.windows(2)
        .rposition(|w| w == [FIELD_TERMINATOR, RECORD_TERMINATOR])
}
