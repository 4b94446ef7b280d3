//! A bounded, first-in-first-out queue of 3D-print jobs with tiered pricing,
//! plus the line-oriented console protocol used to drive it.
pub mod dispatch;
pub mod line_reader;
pub mod parser;
pub mod pricing;
pub mod queue;
pub mod sequence;
pub mod types;

pub use queue::{JobQueue, QueueError};
pub use sequence::IdSequence;
pub use types::job::{Finish, JobError, PrintJob};
pub use types::material::{Plastic, Treatment};
