use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of work a registered command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandType {
    Insert,
    Update,
    Delete,
    Select,
    Flush,
    Unknown,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Select => write!(f, "SELECT"),
            Self::Flush => write!(f, "FLUSH"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A registered command definition, keyed by its fully qualified id
/// (`interface-qualified-name.method-name`).
///
/// `has_result_shape` records whether the command declares how rows map back
/// to values; `procedure` marks stored-procedure-style commands, which are
/// exempt from the result-shape requirement when streamed through a row
/// handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub id: String,
    pub command_type: CommandType,
    pub has_result_shape: bool,
    pub procedure: bool,
}

impl CommandDescriptor {
    pub fn new(id: impl Into<String>, command_type: CommandType) -> Self {
        Self {
            id: id.into(),
            command_type,
            has_result_shape: true,
            procedure: false,
        }
    }

    pub fn without_result_shape(mut self) -> Self {
        self.has_result_shape = false;
        self
    }

    pub fn procedure(mut self) -> Self {
        self.procedure = true;
        self
    }
}
