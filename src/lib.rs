pub mod boundary;
pub mod check;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod naming;
pub mod split;
pub mod ui;

pub use error::{GitPartsError, Result};
