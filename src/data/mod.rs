//! Data layer for table views
//!
//! Records and their values, the pure filter/sort/paginate/column-inference
//! functions, and the state objects that compose them into a derived view.

// Value model
pub mod datavalue;
pub mod datavalue_compare;
pub mod loaders;
pub mod record;

// Shaping functions
pub mod column_inference;
pub mod pagination;
pub mod search_filter;
pub mod sort;

// View state
pub mod remote_table;
pub mod table_state;
