pub mod command;
pub mod debug;
