//! API response and request types for the merchant REST API.

pub mod campaign;
pub mod conversion;
pub mod distribution;

// Re-export all types for convenience
pub use campaign::*;
pub use conversion::*;
pub use distribution::*;
pub use crate::program::{AccountKey, InstructionData, InstructionDescriptor};

pub(crate) use conversion::opt_id_string;
