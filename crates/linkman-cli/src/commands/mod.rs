pub mod add;
pub mod archive;
pub mod config;
pub mod list;
