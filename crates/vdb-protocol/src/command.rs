//! Command vocabulary for the vdb wire protocol
//!
//! Every command is a single newline-terminated line starting with a one
//! character tag. Geometry records carry a fixed number of floats, control
//! commands carry integers or nothing at all.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest label (in bytes) carried by a string definition
pub const MAX_LABEL_LEN: usize = 256;

/// Widest formatted value: sign, 39 integer digits of `f32::MAX`, point,
/// six decimals and the trailing separator
const MAX_VALUE_LEN: usize = 48;

/// Longest line any [`Command`] can encode to.
///
/// A triangle with nine extreme values is the worst geometry case; a string
/// definition is bounded by `MAX_LABEL_LEN` plus the tag and key.
pub const MAX_LINE_LEN: usize = {
    let record = 2 + 9 * MAX_VALUE_LEN + 1;
    let define = 2 + 10 + 1 + MAX_LABEL_LEN + 1;
    if record > define {
        record
    } else {
        define
    }
};

/// A drawing primitive and its fixed record width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// Position (x, y, z)
    Point,
    /// Segment between two endpoints
    Line,
    /// Origin plus direction
    Normal,
    /// Three vertices
    Triangle,
    /// Current drawing color (r, g, b)
    Color,
    /// Frame marker, no payload
    Frame,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Point,
        Primitive::Line,
        Primitive::Normal,
        Primitive::Triangle,
        Primitive::Color,
        Primitive::Frame,
    ];

    /// Wire tag for this primitive
    pub const fn tag(self) -> char {
        match self {
            Primitive::Point => 'p',
            Primitive::Line => 'l',
            Primitive::Normal => 'n',
            Primitive::Triangle => 't',
            Primitive::Color => 'c',
            Primitive::Frame => 'f',
        }
    }

    /// Number of floats in one record
    pub const fn arity(self) -> usize {
        match self {
            Primitive::Point | Primitive::Color => 3,
            Primitive::Line | Primitive::Normal => 6,
            Primitive::Triangle => 9,
            Primitive::Frame => 0,
        }
    }

    /// Whether the primitive carries geometry payload.
    ///
    /// Only geometry is subject to sampling; the frame marker is structural.
    pub const fn is_geometry(self) -> bool {
        !matches!(self, Primitive::Frame)
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Point => "point",
            Primitive::Line => "line",
            Primitive::Normal => "normal",
            Primitive::Triangle => "triangle",
            Primitive::Color => "color",
            Primitive::Frame => "frame",
        };
        f.write_str(name)
    }
}

/// How a group command annotates the primitives that follow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Plain label attached to subsequent primitives
    Label,
    /// Named line-segment annotation
    NamedLine,
}

impl GroupKind {
    /// Count field carried on the wire
    pub const fn count(self) -> u32 {
        match self {
            GroupKind::Label => 0,
            GroupKind::NamedLine => 1,
        }
    }

    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            0 => Some(GroupKind::Label),
            1 => Some(GroupKind::NamedLine),
            _ => None,
        }
    }
}

/// A single line of the wire protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Geometry or frame record: `<tag> v0 v1 ... \n`
    Record {
        primitive: Primitive,
        values: Vec<f32>,
    },

    /// String definition: `s <key> <label>\n`
    DefineString { key: u32, label: String },

    /// Group annotation: `g <count> <key>\n`
    Group { count: u32, key: u32 },

    /// Present pending drawing: `r\n`
    Refresh,
}

impl Command {
    /// Create a record command
    pub fn record(primitive: Primitive, values: &[f32]) -> Self {
        Command::Record {
            primitive,
            values: values.to_vec(),
        }
    }

    /// Create a group command for a kind of annotation
    pub fn group(kind: GroupKind, key: u32) -> Self {
        Command::Group {
            count: kind.count(),
            key,
        }
    }

    /// Wire tag of this command
    pub fn tag(&self) -> char {
        match self {
            Command::Record { primitive, .. } => primitive.tag(),
            Command::DefineString { .. } => 's',
            Command::Group { .. } => 'g',
            Command::Refresh => 'r',
        }
    }

    /// Encode as a complete wire line (newline included)
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Record { primitive, values } => {
                write!(f, "{}", Record::new(*primitive, values))
            }
            Command::DefineString { key, label } => writeln!(f, "s {} {}", key, label),
            Command::Group { count, key } => writeln!(f, "g {} {}", count, key),
            Command::Refresh => writeln!(f, "r"),
        }
    }
}

/// Borrowed view of one record, formatted without copying the payload
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    primitive: Primitive,
    values: &'a [f32],
}

impl<'a> Record<'a> {
    pub fn new(primitive: Primitive, values: &'a [f32]) -> Self {
        Self { primitive, values }
    }
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.primitive.tag())?;
        for &value in self.values {
            write_value(f, value)?;
            f.write_str(" ")?;
        }
        f.write_str("\n")
    }
}

/// Fixed six-decimal formatting, independent of locale.
///
/// Non-finite values use the lowercase spellings C's `%f` produces so that
/// `scanf`-style readers accept them.
fn write_value(f: &mut fmt::Formatter<'_>, value: f32) -> fmt::Result {
    if value.is_nan() {
        f.write_str("nan")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{:.6}", value)
    }
}

/// Make a label safe to embed in a single line.
///
/// Line breaks become spaces and the result is cut to [`MAX_LABEL_LEN`]
/// bytes on a char boundary.
pub fn sanitize_label(label: &str) -> Cow<'_, str> {
    let has_breaks = label.contains(['\n', '\r']);
    if !has_breaks && label.len() <= MAX_LABEL_LEN {
        return Cow::Borrowed(label);
    }

    let mut end = label.len().min(MAX_LABEL_LEN);
    while !label.is_char_boundary(end) {
        end -= 1;
    }
    let clean: String = label[..end]
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    Cow::Owned(clean)
}
