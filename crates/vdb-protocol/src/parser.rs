//! Wire line parser using nom
//!
//! Grammar:
//! ```text
//! line    := record | define | group | refresh
//! record  := tag (' '+ float)* ' '*          tag in p l n t c f
//! define  := 's' ' '+ u32 (' ' label)?        label runs to end of line
//! group   := 'g' ' '+ u32 ' '+ u32 ' '*
//! refresh := 'r' ' '*
//! ```
//!
//! Each line may carry its trailing `\n` (or `\r\n`).

use crate::command::{Command, Primitive};
use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, space0, space1, u32 as parse_u32},
    combinator::{map, map_res, opt, rest, value},
    multi::many0,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

/// Parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("Empty line")]
    Empty,

    #[error("Unknown command tag '{0}'")]
    UnknownTag(char),

    #[error("Malformed '{tag}' command: {line}")]
    Malformed { tag: char, line: String },

    #[error("'{tag}' expects {expected} values, got {actual}")]
    ArityMismatch {
        tag: char,
        expected: usize,
        actual: usize,
    },

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ProtocolError>,
    },
}

/// Result type alias for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Parse a single wire line into a command
pub fn parse_command(line: &str) -> ProtocolResult<Command> {
    let line = strip_line_ending(line);
    let tag = line.chars().next().ok_or(ProtocolError::Empty)?;

    if let Some(primitive) = Primitive::from_tag(tag) {
        let values = match terminated(record_values, space0)(&line[tag.len_utf8()..]) {
            Ok(("", values)) => values,
            _ => return Err(malformed(tag, line)),
        };
        if values.len() != primitive.arity() {
            return Err(ProtocolError::ArityMismatch {
                tag,
                expected: primitive.arity(),
                actual: values.len(),
            });
        }
        return Ok(Command::Record { primitive, values });
    }

    match control(line) {
        Ok(("", command)) => Ok(command),
        Ok(_) | Err(_) if matches!(tag, 's' | 'g' | 'r') => Err(malformed(tag, line)),
        _ => Err(ProtocolError::UnknownTag(tag)),
    }
}

/// Parse a stream of newline-terminated lines.
///
/// A trailing fragment without a newline is parsed as a final line.
pub fn parse_stream(text: &str) -> ProtocolResult<Vec<Command>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            parse_command(line).map_err(|e| ProtocolError::AtLine {
                line: index + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn malformed(tag: char, line: &str) -> ProtocolError {
    ProtocolError::Malformed {
        tag,
        line: line.to_string(),
    }
}

/// Parse the values of a record (everything after the tag)
fn record_values(input: &str) -> IResult<&str, Vec<f32>> {
    many0(preceded(space1, number))(input)
}

/// Parse one space-delimited float, including `nan`, `inf` and `-inf`
fn number(input: &str) -> IResult<&str, f32> {
    map_res(take_till1(|c: char| c == ' '), str::parse::<f32>)(input)
}

/// Parse one of the control commands
fn control(input: &str) -> IResult<&str, Command> {
    alt((define_string, group, refresh))(input)
}

/// Parse `s <key> <label>`
fn define_string(input: &str) -> IResult<&str, Command> {
    let (input, (_, _, key)) = tuple((char('s'), space1, parse_u32))(input)?;
    let (input, label) = opt(preceded(char(' '), rest))(input)?;
    Ok((
        input,
        Command::DefineString {
            key,
            label: label.unwrap_or_default().to_string(),
        },
    ))
}

/// Parse `g <count> <key>`
fn group(input: &str) -> IResult<&str, Command> {
    map(
        terminated(
            tuple((char('g'), space1, parse_u32, space1, parse_u32)),
            space0,
        ),
        |(_, _, count, _, key)| Command::Group { count, key },
    )(input)
}

/// Parse `r`
fn refresh(input: &str) -> IResult<&str, Command> {
    value(Command::Refresh, terminated(char('r'), space0))(input)
}
