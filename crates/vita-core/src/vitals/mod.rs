//! Simulated vital signs for the AR view

pub mod delta;
pub mod machine;
pub mod monitor;

pub use delta::{DeltaSource, RandomDelta};
pub use machine::{VitalBounds, VitalsMachine};
pub use monitor::{VitalsMonitor, VitalsSnapshot};
