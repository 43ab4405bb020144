//! Frame codec and checksum.
//!
//! Outbound: `STX <command> [GS <param>]* ETX <checksum> EOT`.
//!
//! Inbound units carry the same envelope; the payload is
//! `<command> [GS <param>]* [RS <field> [GS <field>]*]*`. The checksum of
//! inbound units is not verified: the hub link has only ever relied on the
//! integrity of the underlying socket, and frames are accepted as-is.

use crate::error::FrameError;

pub const STX: u8 = 0x02;
pub const ETX: u8 = 0x03;
pub const EOT: u8 = 0x04;
pub const GS: u8 = 0x1D;
pub const RS: u8 = 0x1E;

/// Units shorter than this many characters are noise.
const MIN_UNIT_LEN: usize = 3;

/// One decoded hub message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub command: String,
    pub parameters: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Frame {
    /// Parse the text of one unit (without its EOT terminator).
    ///
    /// Strips the leading STX and the trailing ETX + checksum, whatever
    /// their actual values.
    fn parse_unit(unit: &str) -> Self {
        let start = unit.char_indices().nth(1).map_or(unit.len(), |(idx, _)| idx);
        let end = unit.char_indices().rev().nth(2).map_or(0, |(idx, _)| idx);
        let payload = if end > start { &unit[start..end] } else { "" };

        let mut segments = payload.split(char::from(RS));
        let header = segments.next().unwrap_or_default();
        let mut fields = header.split(char::from(GS)).map(str::to_string);

        Self {
            command: fields.next().unwrap_or_default(),
            parameters: fields.collect(),
            records: segments
                .map(|row| row.split(char::from(GS)).map(str::to_string).collect())
                .collect(),
        }
    }

    /// Parameter at `index`, if present.
    #[must_use]
    pub fn parameter(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }
}

/// Encode a command and its parameters into the exact bytes to transmit.
///
/// The hub only speaks ASCII. Anything else is sent as raw UTF-8 and the
/// checksum covers those bytes, not characters.
#[must_use]
pub fn encode<S: AsRef<str>>(command: &str, parameters: &[S]) -> Vec<u8> {
    let mut message = Vec::with_capacity(command.len() + 8);
    message.push(STX);
    message.extend_from_slice(command.as_bytes());
    for parameter in parameters {
        message.push(GS);
        message.extend_from_slice(parameter.as_ref().as_bytes());
    }
    message.push(ETX);

    let crc = checksum(&message);
    message.extend_from_slice(&crc);
    message.push(EOT);
    message
}

/// Hub checksum: complemented running XOR, rendered one hex digit per nibble.
#[must_use]
pub fn checksum(data: &[u8]) -> [u8; 2] {
    let crc = 0xFF - data.iter().fold(0u8, |acc, byte| acc ^ byte);
    [hex_digit(crc >> 4), hex_digit(crc & 0x0F)]
}

fn hex_digit(nibble: u8) -> u8 {
    b"0123456789ABCDEF"[usize::from(nibble & 0x0F)]
}

/// Split a raw buffer into frames.
///
/// Units shorter than three characters are skipped silently. A unit that
/// cannot be decoded yields an error item; its siblings are unaffected.
pub fn decode(raw: &[u8]) -> impl Iterator<Item = Result<Frame, FrameError>> + '_ {
    raw.split(|byte| *byte == EOT).filter_map(|unit| {
        if unit.len() < MIN_UNIT_LEN {
            return None;
        }
        match std::str::from_utf8(unit) {
            Ok(text) if text.chars().count() < MIN_UNIT_LEN => None,
            Ok(text) => Some(Ok(Frame::parse_unit(text))),
            Err(source) => Some(Err(FrameError::InvalidUtf8(source))),
        }
    })
}
