pub mod cell;
pub mod error;
pub mod wire;


/// Number of characters of a text cell shown by `Display` before it is cut off.
pub const DISPLAY_TRUNCATE_CHARS: usize = 32;
