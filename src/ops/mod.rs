pub mod check;
pub mod month_axis;
pub mod store;
pub mod timeline;
pub mod tracker;
