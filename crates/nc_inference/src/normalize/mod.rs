//! Turning free-form model output into structured results.

mod patterns;
pub mod rewrite;
pub mod summary;

pub use rewrite::normalize_rewrite;
pub use summary::normalize_summary;
