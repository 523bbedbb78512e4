use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Invalid bound command (not found): {0}")]
    CommandNotFound(String),

    #[error("Unknown command type for: {0}")]
    UnknownCommandType(String),

    #[error("Method '{method}' cannot have multiple {kind} parameters")]
    DuplicateSpecialParameter { method: String, kind: &'static str },

    #[error("Mapper method '{method}' has an unsupported return type: {declared}")]
    UnsupportedReturnType { method: String, declared: String },

    #[error(
        "Mapper method '{0}' attempted to return null from a method with a primitive return type"
    )]
    NullForPrimitive(String),

    #[error(
        "Method '{0}' needs a declared result shape so a row handler can be used as a parameter"
    )]
    MissingResultShape(String),

    #[error("Parameter '{name}' not found. Available parameters are {available:?}")]
    ParameterNotFound { name: String, available: Vec<String> },

    #[error("Method '{0}' is not declared by mapper interface '{1}'")]
    UnknownMethod(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Cursor is already closed")]
    CursorClosed,

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, BindingError>;

impl<T> From<std::sync::PoisonError<T>> for BindingError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
