//! fc-core: shared foundation for fusioncraft.
//!
//! Contains:
//! - numeric (Real + tolerances + float guards + time grid helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
