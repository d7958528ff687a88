// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Clock tree.
//!
//! A clock tree is a set of [`ClockNode`]s, each naming its parent, kept in a
//! [`ClockRegistry`]. Nodes are created by clock drivers during probe and
//! destroyed when the driver removes the device; the registry only refers to
//! them. Everything else in the system addresses clocks by name through the
//! tree operations implemented on the registry:
//!
//! ```rust,ignore
//! clocks.enable("dpll1")?;
//! let rate = clocks.get_rate("dpll1")?;
//! ```
//!
//! The tree is built leaf-to-root: a clock can only be probed once its parent
//! is registered, so forward references are impossible at construction time.
//! Walks towards the root are nevertheless bounded (see
//! [`ClockRegistry::get_rate`]).

use alloc::boxed::Box;
use alloc::string::String;
use core::cell::Cell;

use crate::dt::DtNode;
use crate::hil::clk::Clock;
use crate::ErrorCode;

pub mod fixed;

mod registry;
mod tree;

pub use self::registry::ClockRegistry;

/// One clock signal in the tree.
///
/// The node owns its name and its variant-specific state, which is the
/// [`Clock`] implementation it was built with.
pub struct ClockNode {
    name: String,
    count: Cell<usize>,
    clock: Box<dyn Clock>,
}

impl ClockNode {
    pub fn new(name: String, clock: Box<dyn Clock>) -> ClockNode {
        ClockNode {
            name,
            count: Cell::new(0),
            clock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of outstanding `enable` calls not yet balanced by `disable`.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn acquire(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn release(&self) {
        self.count.set(self.count.get().saturating_sub(1));
    }
}

/// Copy a name out of a device description into storage owned by a node.
///
/// # Errors
///
/// + [Err]\([ErrorCode::NOMEM]\): the heap cannot hold the copy.
pub fn owned_name(name: &str) -> Result<String, ErrorCode> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(name.len())
        .map_err(|_| ErrorCode::NOMEM)?;
    owned.push_str(name);
    Ok(owned)
}

/// Apply the optional `default` block of a clock's device description.
///
/// The block may hold a `parent` name, a `rate` and an `enable` flag. They
/// are applied in that order, each one independently: a parent that is not
/// registered is skipped, a rate of 0 is skipped, an absent `enable` leaves
/// the clock untouched. Failures are not reported; the clock already exists
/// and stays registered whatever its defaults do.
pub fn apply_default_config(clocks: &ClockRegistry, name: &str, node: &dyn DtNode) {
    let defaults = match node.read_object("default") {
        Some(defaults) => defaults,
        None => return,
    };

    if let Some(parent) = defaults.read_string("parent", None) {
        if clocks.contains(parent) {
            let _ = clocks.set_parent(name, parent);
        }
    }

    let rate = defaults.read_long("rate", 0);
    if rate > 0 {
        let _ = clocks.set_rate(name, rate as u64);
    }

    match defaults.read_bool("enable") {
        Some(true) => {
            let _ = clocks.enable(name);
        }
        Some(false) => {
            let _ = clocks.disable(name);
        }
        None => {}
    }
}
