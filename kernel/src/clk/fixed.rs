// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Fixed-rate root clocks (crystal oscillators).
//!
//! Device description:
//!
//! ```text
//! "clk-fixed@0": {
//!     "name": "osc24m",
//!     "rate": 24000000,
//!     "default": { "enable": true }
//! }
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;

use super::{apply_default_config, owned_name, ClockNode, ClockRegistry};
use crate::driver::{Device, Driver};
use crate::dt::DtNode;
use crate::hil::clk::Clock;
use crate::ErrorCode;

/// A clock with no parent and a constant output rate.
pub struct FixedClock {
    rate: u64,
}

impl FixedClock {
    pub fn new(rate: u64) -> FixedClock {
        FixedClock { rate }
    }
}

impl Clock for FixedClock {
    fn set_parent(&self, _parent: &str) {}

    fn get_parent(&self) -> Option<&str> {
        None
    }

    fn set_enable(&self, _enable: bool) {}

    fn get_enable(&self) -> bool {
        true
    }

    fn set_rate(&self, _parent_rate: u64, _rate: u64) {}

    fn get_rate(&self, _parent_rate: u64) -> Result<u64, ErrorCode> {
        Ok(self.rate)
    }
}

/// Driver for `clk-fixed` description nodes.
pub struct ClkFixed<'a> {
    clocks: &'a ClockRegistry,
}

impl<'a> ClkFixed<'a> {
    pub fn new(clocks: &'a ClockRegistry) -> ClkFixed<'a> {
        ClkFixed { clocks }
    }
}

impl Driver for ClkFixed<'_> {
    fn name(&self) -> &'static str {
        "clk-fixed"
    }

    fn probe(&self, node: &dyn DtNode) -> Result<Device, ErrorCode> {
        let name = node
            .read_string("name", None)
            .filter(|name| !name.is_empty())
            .ok_or(ErrorCode::INVAL)?;
        let rate = node.read_long("rate", 0);
        if rate <= 0 {
            return Err(ErrorCode::INVAL);
        }
        if self.clocks.contains(name) {
            return Err(ErrorCode::ALREADY);
        }

        let clk = Rc::new(ClockNode::new(
            owned_name(name)?,
            Box::new(FixedClock::new(rate as u64)),
        ));
        let dev = Device::clk(self.name(), clk.clone())?;
        self.clocks.register(&clk)?;
        apply_default_config(self.clocks, name, node);
        Ok(dev)
    }

    fn remove(&self, dev: Device) {
        if let Some(clk) = dev.as_clk() {
            let _ = self.clocks.unregister(clk);
        }
    }

    fn suspend(&self, _dev: &Device) {}

    fn resume(&self, _dev: &Device) {}
}
