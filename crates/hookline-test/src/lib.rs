//! Hookline Test - Shared test utilities for the hookline crates.
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! hookline-test.workspace = true
//! ```
//!
//! Then record calls from targets and hooks with [`CallProbe`]:
//!
//! ```rust
//! use hookline_test::{CallProbe, Sequencer};
//!
//! let seq = Sequencer::new();
//! let first = CallProbe::with_sequencer("first", &seq);
//! let second = CallProbe::with_sequencer("second", &seq);
//!
//! first.record(1);
//! second.record(2);
//!
//! assert!(first.called_before(&second));
//! assert_eq!(second.last_args(), Some(2));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod probe;

pub use fixtures::*;
pub use probe::*;
