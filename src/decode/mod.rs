//! QR decoding seam. Image decoding itself happens outside this crate; the
//! recorder only ever sees the decoded text payloads.

use crate::errors::AppResult;
use std::fs;
use std::io::{self, Read};

pub trait QrDecoder {
    /// Zero or more payloads found in `input`.
    fn decode(&self, input: &[u8]) -> Vec<String>;
}

/// Reads the text output of an external decoder: one payload per line.
/// Line terminators are stripped and blank lines skipped; payload text is
/// otherwise passed through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPayloadDecoder;

impl QrDecoder for TextPayloadDecoder {
    fn decode(&self, input: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(input)
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Bytes from `path`, or from stdin when `path` is `-`.
pub fn read_source(path: &str) -> AppResult<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read(path)?)
    }
}
