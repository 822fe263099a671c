//! Stream tokens produced by the tokenizer.
//!
//! Tokens are the decoded elements of a capture. Each one knows the offset
//! it began at and re-encodes to its original byte form, so a capture can
//! be filtered or rewritten and serialized back out.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use pclstream_core::{ParameterizedCommand, ESC};

/// One decoded element of a PCL capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A run of printable bytes between escape sequences.
    Text { offset: u64, bytes: Vec<u8> },

    /// A single control byte (CR, LF, FF, ...).
    Control { offset: u64, byte: u8 },

    /// A two-character escape command (escape byte plus one operation
    /// byte), e.g. `<esc>E` for printer reset.
    TwoByte { offset: u64, operation: u8 },

    /// A parameterized escape sequence.
    Parameterized(ParameterizedCommand),
}

impl Token {
    /// Stream offset at which this token began.
    pub fn offset(&self) -> u64 {
        match self {
            Token::Text { offset, .. }
            | Token::Control { offset, .. }
            | Token::TwoByte { offset, .. } => *offset,
            Token::Parameterized(command) => command.offset(),
        }
    }

    /// Re-encodes the token to its original byte form. Each segment of a
    /// combined sequence re-encodes as a standalone sequence, so a combined
    /// capture serializes to equivalent, but not byte-identical, output.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Token::Text { bytes, .. } => bytes.clone(),
            Token::Control { byte, .. } => vec![*byte],
            Token::TwoByte { operation, .. } => vec![ESC, *operation],
            Token::Parameterized(command) => command.to_bytes(),
        }
    }

    /// Writes the encoding of [`to_bytes`](Self::to_bytes) to `sink`.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_offsets() {
        assert_eq!(Token::Text { offset: 3, bytes: b"hi".to_vec() }.offset(), 3);
        assert_eq!(Token::Control { offset: 9, byte: 0x0C }.offset(), 9);
        assert_eq!(Token::TwoByte { offset: 4, operation: b'E' }.offset(), 4);

        let command = ParameterizedCommand::new(17, b'&', Some(b'l'), "0", b'S');
        assert_eq!(Token::Parameterized(command).offset(), 17);
    }

    #[test]
    fn test_token_encoding() {
        assert_eq!(
            Token::Text { offset: 0, bytes: b"Hello".to_vec() }.to_bytes(),
            b"Hello"
        );
        assert_eq!(Token::Control { offset: 0, byte: 0x0C }.to_bytes(), vec![0x0C]);
        assert_eq!(
            Token::TwoByte { offset: 0, operation: b'E' }.to_bytes(),
            vec![0x1B, b'E']
        );
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let tokens = [
            Token::Text { offset: 0, bytes: b"abc".to_vec() },
            Token::Control { offset: 3, byte: 0x0A },
            Token::TwoByte { offset: 4, operation: b'9' },
            Token::Parameterized(ParameterizedCommand::with_data(
                6,
                b'&',
                Some(b'p'),
                "2",
                b'X',
                vec![b'A', b'B'],
            )),
        ];
        for token in &tokens {
            let mut sink = Vec::new();
            token.write_to(&mut sink).unwrap();
            assert_eq!(sink, token.to_bytes());
        }
    }
}
