pub mod activity;
pub mod color;
pub mod config;
pub mod month;

pub use activity::*;
pub use color::*;
pub use config::*;
pub use month::*;
