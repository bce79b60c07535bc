#![doc = include_str!("../README.md")]

mod error;
pub use error::*;

mod handle;
pub use handle::*;

mod mode;
pub use mode::*;

mod policy;
pub use policy::{CloseHandle, ReleasePolicy};

mod scoped;
pub use scoped::*;

pub mod fs;
