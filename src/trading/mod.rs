//! Trading math: position sizing for parsed signals.

mod position_sizer;

pub use position_sizer::{size_position, PositionSize};
