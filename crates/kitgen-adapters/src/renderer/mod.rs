//! Template renderers.

pub mod simple;

pub use simple::SimpleRenderer;
