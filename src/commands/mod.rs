//! Command implementations for citeval

pub mod dispatch;
pub mod evaluate;
pub mod show_prompt;
