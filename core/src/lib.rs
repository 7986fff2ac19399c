//! Process supervision and tee logging behind the `cmdlog` binary.
//!
//! A child command is started with all three standard streams piped. Its
//! output goes line by line, timestamped, to both the terminal and a log
//! file; what the user types is echoed verbatim into the log and forwarded
//! to the child.

pub mod api;
pub mod config;
pub mod error;
pub mod naming;
pub mod runner;
pub mod util;
