#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
pub mod blend;
pub mod color;
pub mod geometry;
pub mod gradient;
pub mod interaction;
pub mod layout;
pub mod notify;
pub mod options;
pub mod pixbuf;
pub mod prelude;
pub mod render;
pub mod wheel;
