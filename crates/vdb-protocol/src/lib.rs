//! vdb-protocol - Wire vocabulary for the vdb visual debugger
//!
//! The viewer is fed a newline-framed text stream. Each line starts with a
//! one character tag:
//!
//! | Tag | Fields | Meaning |
//! |-----|--------|---------|
//! | `p` | 3 floats | point |
//! | `l` | 6 floats | line segment |
//! | `n` | 6 floats | normal (origin + direction) |
//! | `t` | 9 floats | triangle |
//! | `c` | 3 floats | color |
//! | `f` | none | frame marker |
//! | `s` | key, label | define a string |
//! | `g` | count, key | attach a group/label |
//! | `r` | none | refresh |
//!
//! # Examples
//!
//! ```
//! use vdb_protocol::{parse_command, Command, Primitive};
//!
//! let line = Command::record(Primitive::Point, &[1.0, 2.0, 3.0]).to_line();
//! assert_eq!(line, "p 1.000000 2.000000 3.000000 \n");
//! assert_eq!(parse_command(&line).unwrap().tag(), 'p');
//! ```

pub mod command;
pub mod parser;

pub use command::*;
pub use parser::*;
