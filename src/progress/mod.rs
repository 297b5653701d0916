//! Progress reporting for long tree builds
//!
//! Each live search node keeps a small set of counters. Every so many solver
//! entries the builder snapshots the chain of counters and hands it to a sink.

mod reporter;
mod status;

pub use reporter::{DatagramTarget, ProgressAddress, ProgressListener, ProgressSink};
pub use status::{
    ProgressMessage, ProgressStatus, StatusFrame, make_message, parse_message,
};
