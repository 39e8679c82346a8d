pub mod date;
pub mod text;

pub use text::{collapse_whitespace, non_blank, normalize};
