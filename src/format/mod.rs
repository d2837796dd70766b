pub mod content;
pub mod payload;
