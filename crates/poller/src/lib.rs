pub mod client;
pub mod cycle;

pub use client::{HomeworkSource, PracticumClient};
pub use cycle::{CycleOutcome, PollCycle};
