//! The PCL escape sequence tokenizer.
//!
//! Pulls bytes through a [`SeekableReader`] one at a time and recognizes the
//! structural classes of a PCL stream:
//!
//! - parameterized sequences: escape, group (`0x21..=0x2F`), optional
//!   parameter character (`0x60..=0x7E`), then one or more value/terminator
//!   segments. A terminator in `0x40..=0x5E` closes the sequence; one in
//!   `0x60..=0x7E` closes the segment with more to follow
//! - two-character commands: escape plus one byte in `0x30..=0x7E`
//! - control bytes and runs of printable text between sequences
//!
//! Commands whose kind carries embedded binary data (raster rows, font
//! downloads, transparent print data) pull `value` bytes of payload from
//! the reader before the next token is recognized.

use std::collections::VecDeque;

use pclstream_core::{ParameterizedCommand, ESC};
use pclstream_io::SeekableReader;

use crate::error::TokenizeError;
use crate::token::Token;

/// Short forms of the command kinds that carry an embedded data section,
/// sized by their numeric value.
const DATA_COMMANDS: &[&str] = &[
    "&pX", "&bW", "&nW", "(fW", "(sW", ")sW", "*bV", "*bW", "*cW", "*gW", "*mW", "*vW",
];

/// Whether a command of this kind carries an embedded data section. Callers
/// building records to serialize can use this to decide which constructor
/// matches what the tokenizer would produce.
pub fn carries_data(group: u8, parameter: Option<u8>, terminator: u8) -> bool {
    DATA_COMMANDS.iter().any(|form| match (form.as_bytes(), parameter) {
        ([g, p, t], Some(parameter)) => *g == group && *p == parameter && *t == terminator,
        ([g, t], None) => *g == group && *t == terminator,
        _ => false,
    })
}

/// Lazily decodes a capture into [`Token`]s.
///
/// Iteration yields `Result<Token, TokenizeError>`; the first hard error
/// ends the stream. End of input between tokens ends iteration normally;
/// end of input inside a sequence is an error.
pub struct Tokenizer {
    reader: SeekableReader,
    /// One byte of lookahead, already consumed from the reader.
    lookahead: Option<u8>,
    /// Commands decoded from a combined sequence, waiting to be yielded.
    queued: VecDeque<Token>,
    done: bool,
}

impl Tokenizer {
    pub fn new(reader: SeekableReader) -> Self {
        Tokenizer {
            reader,
            lookahead: None,
            queued: VecDeque::new(),
            done: false,
        }
    }

    /// Tokenizes an in-memory capture.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(SeekableReader::from_bytes(bytes))
    }

    /// Next raw byte, paired with the offset it was read from.
    fn next_byte(&mut self) -> Result<Option<(u64, u8)>, TokenizeError> {
        if let Some(byte) = self.lookahead.take() {
            return Ok(Some((self.reader.tell() - 1, byte)));
        }
        let offset = self.reader.tell();
        match self.reader.read_byte()? {
            Some(byte) => Ok(Some((offset, byte))),
            None => Ok(None),
        }
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.lookahead.is_none());
        self.lookahead = Some(byte);
    }

    fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        let Some((offset, byte)) = self.next_byte()? else {
            return Ok(None);
        };
        match byte {
            ESC => self.escape_sequence(offset).map(Some),
            0x00..=0x1F => Ok(Some(Token::Control { offset, byte })),
            _ => self.text_run(offset, byte).map(Some),
        }
    }

    fn text_run(&mut self, offset: u64, first: u8) -> Result<Token, TokenizeError> {
        let mut bytes = vec![first];
        loop {
            match self.next_byte()? {
                Some((_, byte)) if byte >= 0x20 => bytes.push(byte),
                Some((_, byte)) => {
                    self.push_back(byte);
                    break;
                }
                None => break,
            }
        }
        Ok(Token::Text { offset, bytes })
    }

    fn escape_sequence(&mut self, offset: u64) -> Result<Token, TokenizeError> {
        let Some((intro_offset, intro)) = self.next_byte()? else {
            return Err(TokenizeError::UnexpectedEndOfData { offset });
        };
        match intro {
            // Parameterized sequences: `!` through `/`.
            0x21..=0x2F => self.parameterized(offset, intro),
            // Two-character commands: `0` through `~`.
            0x30..=0x7E => Ok(Token::TwoByte { offset, operation: intro }),
            _ => Err(TokenizeError::UnexpectedByte {
                offset: intro_offset,
                byte: intro,
            }),
        }
    }

    /// Decodes a whole parameterized sequence. The first command is
    /// returned; the rest of a combined sequence is queued in order.
    fn parameterized(&mut self, offset: u64, group: u8) -> Result<Token, TokenizeError> {
        let parameter = match self.next_byte()? {
            None => return Err(TokenizeError::UnexpectedEndOfData { offset }),
            Some((_, byte)) if (0x60..=0x7E).contains(&byte) => Some(byte),
            Some((_, byte)) => {
                self.push_back(byte);
                None
            }
        };

        let (head, mut more) = self.segment(offset, group, parameter)?;
        while more {
            let (command, continuing) = self.segment(offset, group, parameter)?;
            self.queued.push_back(Token::Parameterized(command));
            more = continuing;
        }
        Ok(Token::Parameterized(head))
    }

    /// One value/terminator segment. Returns the decoded command and
    /// whether further segments follow in the same sequence.
    fn segment(
        &mut self,
        offset: u64,
        group: u8,
        parameter: Option<u8>,
    ) -> Result<(ParameterizedCommand, bool), TokenizeError> {
        let value = self.value_field(offset)?;
        let Some((term_offset, terminator)) = self.next_byte()? else {
            return Err(TokenizeError::UnexpectedEndOfData { offset });
        };
        match terminator {
            // Final terminator: the sequence is complete.
            0x40..=0x5E => {
                let command = self.close_segment(offset, group, parameter, value, terminator)?;
                Ok((command, false))
            }
            // Lowercase terminator: segment done, more follow. Recorded
            // uppercased, the form the command would stand alone in.
            0x60..=0x7E => Ok((
                ParameterizedCommand::new(offset, group, parameter, value, terminator - 0x20),
                true,
            )),
            _ => Err(TokenizeError::UnexpectedByte {
                offset: term_offset,
                byte: terminator,
            }),
        }
    }

    /// Collects a value field: signed decimal digits, or a bracketed vendor
    /// marker. An empty field decodes as `"0"`, the PCL default value.
    fn value_field(&mut self, offset: u64) -> Result<String, TokenizeError> {
        let mut value = String::new();
        loop {
            let Some((_, byte)) = self.next_byte()? else {
                return Err(TokenizeError::UnexpectedEndOfData { offset });
            };
            match byte {
                b'0'..=b'9' | b'+' | b'-' | b'.' => value.push(byte as char),
                b'<' if value.is_empty() => {
                    value.push('<');
                    self.bracketed_value(offset, &mut value)?;
                    break;
                }
                _ => {
                    self.push_back(byte);
                    break;
                }
            }
        }
        if value.is_empty() {
            value.push('0');
        }
        Ok(value)
    }

    /// Reads a vendor value marker through its closing `>`. The content is
    /// restricted to printable ASCII so the value string re-encodes to the
    /// exact capture bytes.
    fn bracketed_value(&mut self, offset: u64, value: &mut String) -> Result<(), TokenizeError> {
        loop {
            match self.next_byte()? {
                None => return Err(TokenizeError::UnexpectedEndOfData { offset }),
                Some((_, b'>')) => {
                    value.push('>');
                    return Ok(());
                }
                Some((_, byte)) if (0x20..=0x7E).contains(&byte) => value.push(byte as char),
                Some((byte_offset, byte)) => {
                    return Err(TokenizeError::UnexpectedByte {
                        offset: byte_offset,
                        byte,
                    })
                }
            }
        }
    }

    /// Finishes a final segment, pulling the embedded data section when the
    /// command kind carries one.
    fn close_segment(
        &mut self,
        offset: u64,
        group: u8,
        parameter: Option<u8>,
        value: String,
        terminator: u8,
    ) -> Result<ParameterizedCommand, TokenizeError> {
        if !carries_data(group, parameter, terminator) {
            return Ok(ParameterizedCommand::new(offset, group, parameter, value, terminator));
        }

        let length = match value.parse::<i64>() {
            Ok(n) if n >= 0 => n as usize,
            _ => {
                return Err(TokenizeError::BadPayloadLength { offset, value });
            }
        };

        debug_assert!(self.lookahead.is_none());
        let mut data = vec![0u8; length];
        if self.reader.read_exact(&mut data)?.is_none() {
            return Err(TokenizeError::UnexpectedEndOfData { offset });
        }
        Ok(ParameterizedCommand::with_data(
            offset, group, parameter, value, terminator, data,
        ))
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.queued.pop_front() {
            return Some(Ok(token));
        }
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => {
                log::trace!("decoded token at offset {}", token.offset());
                Some(Ok(token))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                self.queued.clear();
                Some(Err(error))
            }
        }
    }
}
