//! Signal message parsing and lenient number input.

mod number;
mod parser;

pub use number::parse_positive;
pub use parser::{is_signal, parse_signal};
