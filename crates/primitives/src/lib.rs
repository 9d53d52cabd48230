//! Primitive types shared across the surety workspace.
//!
//! Provides the 20-byte `Address` account identifier and the `Wei` amount
//! newtype used for fees and insurance premiums.

mod address;
mod amount;
mod error;

pub use address::{Address, ADDRESS_SIZE};
pub use amount::Wei;
pub use error::{PrimitiveError, PrimitiveResult};
