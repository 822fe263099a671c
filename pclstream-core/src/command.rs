//! Decoded PCL command records.
//!
//! A [`ParameterizedCommand`] is one decoded escape sequence: the stream
//! offset it began at, the group character, an optional parameter character,
//! the value string, the terminator, and an optional binary data section.
//! Records are built once by the tokenizer (or directly by a caller that
//! wants to serialize a command) and never mutated afterward.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::catalog;

/// The escape byte that introduces every PCL command.
pub const ESC: u8 = 0x1B;

/// A decoded parameterized PCL command.
///
/// Structural identity covers every field, including `offset`: two records
/// with identical content at different stream positions compare unequal.
/// An absent data section is distinct from an empty one: value-only
/// commands carry `None`, payload commands carry `Some`, even for zero
/// payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterizedCommand {
    /// Absolute offset of the introducing escape byte in the source stream.
    offset: u64,
    /// Group character (`&`, `*`, `(`, `)`, `%`, ...).
    group: u8,
    /// Parameter character; `None` for commands that carry none, such as
    /// the universal exit sequence `<esc>%-12345X`.
    parameter: Option<u8>,
    /// Value text: signed decimal digits, or a bracketed vendor marker.
    value: String,
    /// Termination character.
    terminator: u8,
    /// Embedded binary payload, when the command kind carries one.
    data: Option<Vec<u8>>,
}

impl ParameterizedCommand {
    /// Creates a value-only command (no data section).
    pub fn new(
        offset: u64,
        group: u8,
        parameter: Option<u8>,
        value: impl Into<String>,
        terminator: u8,
    ) -> Self {
        ParameterizedCommand {
            offset,
            group,
            parameter,
            value: value.into(),
            terminator,
            data: None,
        }
    }

    /// Creates a command with an explicit data section. An empty `data` is
    /// preserved as present-but-empty, not collapsed into absent.
    pub fn with_data(
        offset: u64,
        group: u8,
        parameter: Option<u8>,
        value: impl Into<String>,
        terminator: u8,
        data: Vec<u8>,
    ) -> Self {
        ParameterizedCommand {
            offset,
            group,
            parameter,
            value: value.into(),
            terminator,
            data: Some(data),
        }
    }

    /// Offset of the introducing escape byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Group character.
    pub fn group(&self) -> u8 {
        self.group
    }

    /// Parameter character, if the command carries one.
    pub fn parameter(&self) -> Option<u8> {
        self.parameter
    }

    /// Value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Termination character.
    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// The data section, or `None` for value-only commands.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// The command's kind, irrespective of its argument: group, parameter
    /// and terminator, e.g. `&lS`. The parameter is omitted when absent.
    pub fn short_form(&self) -> String {
        let mut out = String::with_capacity(3);
        out.push(self.group as char);
        if let Some(parameter) = self.parameter {
            out.push(parameter as char);
        }
        out.push(self.terminator as char);
        out
    }

    /// The command with its value but without the escape marker or offset,
    /// e.g. `&l0S`.
    pub fn display_form(&self) -> String {
        let mut out = String::with_capacity(3 + self.value.len());
        out.push(self.group as char);
        if let Some(parameter) = self.parameter {
            out.push(parameter as char);
        }
        out.push_str(&self.value);
        out.push(self.terminator as char);
        out
    }

    /// Human-readable name of the command, looked up in the
    /// [description catalog](crate::catalog). Vendor extensions that smuggle
    /// a bracketed marker into the value field resolve to their own names.
    pub fn description(&self) -> String {
        let vendor = self.value.starts_with('<');
        match catalog::lookup(self.group, self.parameter, self.terminator, vendor) {
            Some(name) => name.to_string(),
            None => {
                log::debug!("no catalog entry for {}", self.short_form());
                format!("Unknown PCL-Command {}", self.short_form())
            }
        }
    }

    /// Re-encodes the command to its original byte form: escape byte, group,
    /// parameter (omitted entirely when absent), value, terminator, and the
    /// data section verbatim.
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload_len = self.data.as_ref().map_or(0, Vec::len);
        let mut out = Vec::with_capacity(4 + self.value.len() + payload_len);
        out.push(ESC);
        out.push(self.group);
        if let Some(parameter) = self.parameter {
            out.push(parameter);
        }
        out.extend_from_slice(self.value.as_bytes());
        out.push(self.terminator);
        if let Some(data) = &self.data {
            out.extend_from_slice(data);
        }
        out
    }

    /// Writes the encoding of [`to_bytes`](Self::to_bytes) to `sink`.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.to_bytes())
    }
}

impl fmt::Display for ParameterizedCommand {
    /// Debug rendering with the escape marker and offset, e.g. `<esc>&l0S@1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<esc>{}@{}", self.display_form(), self.offset)
    }
}
