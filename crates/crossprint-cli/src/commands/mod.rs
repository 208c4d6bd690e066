pub mod config;
pub mod info;
pub mod process;
