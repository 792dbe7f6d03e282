//! Presentation layer
//!
//! View models turning a table state into cell text, pager links and row
//! actions. Nothing here draws; callers render the models however they like.

pub mod actions;
pub mod cell_renderer;
pub mod pager;
pub mod table_body;
