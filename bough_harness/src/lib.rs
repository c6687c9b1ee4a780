// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable fixtures for exercising bough trees.
//!
//! - [`StubOutput`] and [`StubView`] stand in for the display and client
//!   window implementations.
//! - [`EventLog`] records destroy and reparent notifications.
//! - [`check_invariants`] verifies the structural properties every tree must
//!   keep between mutations.

#![no_std]

extern crate alloc;

mod invariants;
mod log;
mod stub;

pub use invariants::{InvariantViolation, check_attached, check_invariants};
pub use log::{EventLog, LoggedEvent};
pub use stub::{CloseFlag, StubOutput, StubView};
