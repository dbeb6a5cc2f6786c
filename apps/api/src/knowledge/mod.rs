pub mod handlers;
pub mod industry;
pub mod taxonomy;
