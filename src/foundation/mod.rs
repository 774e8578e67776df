pub mod core;
pub mod diagnostics;
pub mod error;
