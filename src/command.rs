//! Positional-argument command surface
//!
//! Callers that speak in untyped argument lists (a script runner, a wire
//! protocol) hand over an operation name, the store key(s) and the positional
//! values. [`Command::parse`] checks arity and numbers up front and produces a
//! typed command; nothing runs until every argument is valid.

use std::fmt;

use crate::core::{Coord, Span};
use crate::error::{Error, Result};
use crate::registry::Registry;

/// A validated operation against one store
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a member over a range
    Add {
        /// Store name
        store: String,
        /// Member identifier
        member: String,
        /// Validated bounds
        span: Span,
    },
    /// Remove a member from a range
    Remove {
        /// Store name
        store: String,
        /// Member identifier
        member: String,
        /// Validated bounds
        span: Span,
    },
    /// Members covering a point
    Lookup {
        /// Store name
        store: String,
        /// Probe coordinate
        at: Coord,
    },
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Mutation applied
    Ok,
    /// Members found by a lookup, sorted
    Members(Vec<String>),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Members(members) => write!(f, "{}", members.join(" ")),
        }
    }
}

/// Keys and positional values each operation takes
fn shape(op: &str) -> Option<(&'static str, usize, usize)> {
    match op {
        "add" => Some(("add", 1, 3)),
        "remove" => Some(("remove", 1, 3)),
        "lookup" => Some(("lookup", 1, 1)),
        _ => None,
    }
}

impl Command {
    /// Validate raw arguments into a command
    ///
    /// `add` and `remove` take one key and `member, min, max`; `lookup` takes
    /// one key and `value`. Arity is checked before any value is parsed.
    pub fn parse<K, A>(op: &str, keys: &[K], args: &[A]) -> Result<Self>
    where
        K: AsRef<str>,
        A: AsRef<str>,
    {
        let lowered = op.to_ascii_lowercase();
        let (name, expected_keys, expected_args) =
            shape(&lowered).ok_or_else(|| Error::UnknownCommand(op.to_string()))?;

        if keys.len() != expected_keys || args.len() != expected_args {
            return Err(Error::InvalidArity {
                op: name,
                expected_keys,
                expected_args,
                keys: keys.len(),
                args: args.len(),
            });
        }

        let store = keys[0].as_ref().to_string();
        match name {
            "lookup" => Ok(Command::Lookup {
                store,
                at: Coord::parse(args[0].as_ref())?,
            }),
            _ => {
                let member = args[0].as_ref().to_string();
                let span = Span::parse(args[1].as_ref(), args[2].as_ref())?;
                if name == "add" {
                    Ok(Command::Add { store, member, span })
                } else {
                    Ok(Command::Remove { store, member, span })
                }
            }
        }
    }

    /// Name of the store this command targets
    pub fn store(&self) -> &str {
        match self {
            Command::Add { store, .. } | Command::Remove { store, .. } | Command::Lookup { store, .. } => {
                store
            }
        }
    }

    /// Whether the command changes the store
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Lookup { .. })
    }

    /// Run the command against a registry
    pub fn execute(&self, registry: &Registry) -> Reply {
        match self {
            Command::Add { store, member, span } => {
                registry.add_span(store, member, *span);
                Reply::Ok
            }
            Command::Remove { store, member, span } => {
                registry.remove_span(store, member, *span);
                Reply::Ok
            }
            Command::Lookup { store, at } => Reply::Members(registry.lookup_at(store, *at).to_vec()),
        }
    }
}

/// Parse and run in one step
pub fn run<K, A>(registry: &Registry, op: &str, keys: &[K], args: &[A]) -> Result<Reply>
where
    K: AsRef<str>,
    A: AsRef<str>,
{
    Ok(Command::parse(op, keys, args)?.execute(registry))
}
