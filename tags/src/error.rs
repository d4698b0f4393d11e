use core::fmt;

/// Errors raised by index mutations.
///
/// Removals never fail; they report whether anything changed with a `bool` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An argument was rejected before any state was touched.
    InvalidArgument(&'static str),
}

impl Error {
    /// The error raised when a value is added without any tags.
    pub const EMPTY_TAGS: Self =
        Self::InvalidArgument("a value must be added with at least one tag");
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
