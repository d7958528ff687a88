// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Name to clock mapping.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ptr;

use super::ClockNode;
use crate::ErrorCode;

/// Registry of the clocks in one clock tree.
///
/// The registry does not own the nodes it lists. A node stays reachable by
/// name from the moment its driver registers it until the driver unregisters
/// it; a node dropped without being unregistered simply stops being found.
///
/// Boards create one registry and hand a reference to every clock driver, so
/// tests can build as many independent trees as they need.
pub struct ClockRegistry {
    clocks: RefCell<Vec<Weak<ClockNode>>>,
}

impl ClockRegistry {
    pub const fn new() -> ClockRegistry {
        ClockRegistry {
            clocks: RefCell::new(Vec::new()),
        }
    }

    /// Look up a clock by name. Absence is not an error.
    pub fn find(&self, name: &str) -> Option<Rc<ClockNode>> {
        self.clocks
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .find(|clk| clk.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Make `clk` reachable by its name.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::INVAL]\): the clock has an empty name.
    /// + [Err]\([ErrorCode::ALREADY]\): a clock with the same name is
    /// registered.
    /// + [Err]\([ErrorCode::NOMEM]\): the registry cannot grow.
    pub fn register(&self, clk: &Rc<ClockNode>) -> Result<(), ErrorCode> {
        if clk.name().is_empty() {
            return Err(ErrorCode::INVAL);
        }

        let mut clocks = self.clocks.borrow_mut();
        // Forget nodes that were dropped without being unregistered.
        clocks.retain(|entry| entry.strong_count() > 0);

        if clocks
            .iter()
            .filter_map(Weak::upgrade)
            .any(|entry| entry.name() == clk.name())
        {
            return Err(ErrorCode::ALREADY);
        }

        clocks.try_reserve(1).map_err(|_| ErrorCode::NOMEM)?;
        clocks.push(Rc::downgrade(clk));
        Ok(())
    }

    /// Remove `clk` from the registry. After this `find` no longer returns
    /// it, and its name can be registered again.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): this node is not registered.
    pub fn unregister(&self, clk: &ClockNode) -> Result<(), ErrorCode> {
        let mut clocks = self.clocks.borrow_mut();
        match clocks
            .iter()
            .position(|entry| ptr::eq(entry.as_ptr(), clk))
        {
            Some(index) => {
                clocks.remove(index);
                Ok(())
            }
            None => Err(ErrorCode::NODEVICE),
        }
    }

    /// Number of reachable clocks.
    pub fn len(&self) -> usize {
        self.clocks
            .borrow()
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// Names of the reachable clocks, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.clocks
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|clk| String::from(clk.name()))
            .collect()
    }
}
