use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntoNodePathError {
    Relative,
    EmptyComponent,
    Reserved,
    UnrepresentableStr,
}

impl std::error::Error for IntoNodePathError {}

impl fmt::Display for IntoNodePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl IntoNodePathError {
    pub fn as_str(&self) -> &str {
        match self {
            IntoNodePathError::Relative => "node path must start with `/`",
            IntoNodePathError::EmptyComponent => "empty component found in node path",
            IntoNodePathError::Reserved => "`.` and `..` are not valid node names",
            IntoNodePathError::UnrepresentableStr => "unrepresentable string found in node path",
        }
    }

    pub fn as_io_error(&self) -> std::io::Error {
        use std::io::{Error, ErrorKind};
        Error::new(ErrorKind::InvalidInput, self.as_str())
    }
}
