use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum RetimeError {
    ParseError(String),
    InvalidNumber { arg: &'static str, value: String },
    ZeroSpeed,
}

impl Error for RetimeError {}

impl fmt::Display for RetimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RetimeError::ParseError(msg) => write!(fmt, "{}", msg),
            RetimeError::InvalidNumber { arg, value } => {
                write!(fmt, "Invalid value '{}' for {}: not a usable number", value, arg)
            }
            RetimeError::ZeroSpeed => {
                write!(fmt, "A speed of zero would divide every timestamp by zero")
            }
        }
    }
}
