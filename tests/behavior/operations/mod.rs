pub mod cli;
pub mod list;
