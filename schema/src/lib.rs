// EV Tracker Schema - Shared type definitions
// This crate contains the effort value accumulator, the generation rules that
// bound it, and the species reference record. They are shared between the
// tracker library and the reference table loader.

// Re-export the main types
pub use rules::*;
pub use species::*;
pub use stats::*;

pub mod rules;
pub mod species;
pub mod stats;
