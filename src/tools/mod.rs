//! Tool implementations shared by the CLI and the stdio server

pub mod format;
pub mod search;
pub mod suggest;
