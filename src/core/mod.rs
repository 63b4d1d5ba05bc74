pub mod catalog;
pub mod language;
pub mod moviebox;
