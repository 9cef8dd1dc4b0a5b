use thiserror::Error;

/// Failure classes of chunk encoding, decoding and transport.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("row index {index} is out of range for chunk of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("value at row {index} is missing")]
    MissingValue { index: usize },

    #[error("operation '{operation}' is not supported")]
    Unsupported { operation: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("malformed chunk data in {element}: {message}")]
    InvalidFormat { element: String, message: String },

    #[error("destination buffer is too small")]
    DestBufferTooSmall,

    #[error("I/O failure on {context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("{source}")]
    Other {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Error returned by every fallible colchunk operation. The kind is boxed to keep
/// `Result<T>` one word wider than `T`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn index_out_of_range(index: usize, len: usize) -> Error {
        ErrorKind::IndexOutOfRange { index, len }.into()
    }

    pub fn missing_value(index: usize) -> Error {
        ErrorKind::MissingValue { index }.into()
    }

    pub fn unsupported(operation: impl Into<String>) -> Error {
        ErrorKind::Unsupported {
            operation: operation.into(),
        }
        .into()
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidFormat {
            element: element.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        ErrorKind::Io {
            context: context.into(),
            source,
        }
        .into()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` if this error signals a rejected mutation.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unsupported { .. })
    }

    /// Returns `true` if this error signals an integer read of a missing value.
    pub fn is_missing_value(&self) -> bool {
        matches!(self.kind(), ErrorKind::MissingValue { .. })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(Box::new(kind))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("stream", e)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(e: std::num::TryFromIntError) -> Self {
        ErrorKind::Other {
            source: Box::new(e),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::index_out_of_range(12, 10).to_string(),
            "row index 12 is out of range for chunk of length 10"
        );
        assert_eq!(
            Error::unsupported("set_integer").to_string(),
            "operation 'set_integer' is not supported"
        );
        assert_eq!(
            Error::missing_value(5).to_string(),
            "value at row 5 is missing"
        );
        assert_eq!(
            Error::invalid_format("sparse header", "value width 3").to_string(),
            "malformed chunk data in sparse header: value width 3"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::unsupported("set_na").is_unsupported());
        assert!(!Error::unsupported("set_na").is_missing_value());
        assert!(Error::missing_value(0).is_missing_value());
        assert!(matches!(
            Error::from(ErrorKind::DestBufferTooSmall).into_kind(),
            ErrorKind::DestBufferTooSmall
        ));
    }

    #[test]
    fn test_int_conversion_failure() {
        fn narrow(value: u64) -> crate::Result<u32> {
            Ok(u32::try_from(value)?)
        }
        assert_eq!(narrow(7).unwrap(), 7);
        assert!(matches!(
            narrow(u64::MAX).unwrap_err().kind(),
            ErrorKind::Other { .. }
        ));
    }
}
