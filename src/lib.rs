#[macro_use]
extern crate log;

mod file;
pub use file::*;
pub mod lines;
pub mod scan;
pub mod strip;
