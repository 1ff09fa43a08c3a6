//! Background tasks.

mod poller;

pub use poller::{CycleOutcome, HeightSource, MetricsPusher, Poller};
