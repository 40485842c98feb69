// Services module
// Business logic for the snapshot lifecycle

pub mod snapshot;

pub use snapshot::*;
