pub mod error;
pub mod types;
pub mod widget;
