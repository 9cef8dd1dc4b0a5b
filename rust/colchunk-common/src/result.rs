use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Returns early with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) naming
/// `$name` when the caller-supplied `$cond` does not hold.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $cond:expr) => {
        if !($cond) {
            return Err($crate::result::rejected_arg(
                stringify!($name),
                stringify!($cond),
            ));
        }
    };
}

/// Returns early with [`ErrorKind::InvalidFormat`](crate::error::ErrorKind) when a
/// structural check `$cond` over stored bytes of `$element` fails.
#[macro_export]
macro_rules! verify_data {
    ($element:expr, $cond:expr) => {
        if !($cond) {
            return Err($crate::result::malformed_data(
                stringify!($element),
                stringify!($cond),
            ));
        }
    };
}

#[cold]
#[doc(hidden)]
pub fn rejected_arg(name: &str, condition: &str) -> Error {
    Error::invalid_arg(name, format!("expected {condition}"))
}

#[cold]
#[doc(hidden)]
pub fn malformed_data(element: &str, condition: &str) -> Error {
    Error::invalid_format(element, format!("expected {condition}"))
}
