// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;

// --- Re-export key types/traits for easier access ---

// From address.rs
pub use address::Sdi12Addr;

// From command.rs
pub use command::Command;

// From error.rs
pub use error::Sdi12Error;

// From hal_traits.rs
pub use hal_traits::{Sdi12Instant, Sdi12Serial, Sdi12Timer};

// From response.rs
pub use response::{MeasurementTiming, Response};

// From timing.rs (constants - users can access via common::timing::*)
// No re-exports by default.
