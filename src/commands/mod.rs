//! Terminal views

pub mod list;
pub mod show;
