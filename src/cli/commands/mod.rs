//! Command implementations

mod explain;
mod sync;
mod validate;

pub use explain::explain;
pub use sync::sync;
pub use validate::validate;
