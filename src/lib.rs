//! Declare switches, options, positionals and verbs, then parse a command line into typed handles
//!
//! ```text
//! git -v remote add --fetch origin https://example.com/repo.git
//! ```
//!
//! Argument | Example | Value
//! -|-|-
//! Switch | `--verbose`, `-v` | `bool`
//! Option | `--level=3`, `--level` with a preset | `T` or `Option<T>`
//! Positional | `origin` | `T` or `Option<T>`
//! Verb | `remote` | `bool`, and a handler that declares the verb's own arguments
//!
//! # Usage
//!
//! Arguments are declared through [`Declare`], which both [`ArgumentParser`] and the
//! [`ChildParser`] handed to verb handlers implement. Each declaration returns a handle; its value
//! can be read once the command line has been parsed.
//!
//! ```
//! use verb_args::{ArgumentParser, Declare, IntCodec, OptionDef, ParserOptions, PositionalDef, SwitchDef};
//!
//! let mut parser = ArgumentParser::with_options(ParserOptions::new().program_name("demo"));
//! let verbose = parser.add_switch(SwitchDef::new("verbose").short('v'))?;
//! let level = parser.add_option_with_default(OptionDef::new("level", IntCodec).preset(1), 0)?;
//! let target = parser.add_required_positional(PositionalDef::string("target"))?;
//!
//! assert!(parser.try_parse(["-v", "--level", "release"])?);
//! assert!(verbose.value());
//! assert_eq!(level.value(), 1);
//! assert_eq!(target.value(), "release");
//! # Ok::<(), verb_args::ProgrammerError>(())
//! ```
//!
//! # Syntax
//!
//! - `--name` matches a switch or option by its name, `-n` by its single-letter name
//! - An option takes its value as `--name=value`, or its preset when written `--name`
//! - Single-letter names can be combined: `-ab` is the same as `-a -b`
//! - Any other token is offered to the positionals in order, then to the verbs
//! - `-h` and `--help` are always available and print help instead of parsing

mod argument;
mod cmdline;
mod codec;
mod command;
mod declare;
mod error;
mod names;
mod parser;

pub use argument::{Argument, OptionalArg, SwitchArg, ValueArg, VerbArg};
pub use codec::{Codec, CodecError, EnumCodec, EnumMembers, IntCodec, StringCodec};
pub use command::{ArgumentParser, ParserOptions};
pub use declare::{Declare, OptionDef, PositionalDef, SwitchDef};
pub use error::{OrderingRule, ProgrammerError, UserError};
pub use parser::ChildParser;
