// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! DPLL output dividers.
//!
//! Each of the three DPLL outputs of the CCU AON block divides the rate of
//! its parent by `M` and multiplies it by `N`, both strapped in the
//! corresponding `DPLLx_CTRL` register:
//!
//! ```text
//! rate = parent_rate * N / M
//! ```
//!
//! The dividers are read-only from software's point of view: the parent,
//! gate and rate requests of the clock framework are accepted and ignored,
//! and the rate is always recomputed from the live register value.
//!
//! Device description:
//!
//! ```text
//! "clk-r128-pll@0": {
//!     "parent": "osc24m",
//!     "name": "dpll1",
//!     "channel": 0,
//!     "default": { "enable": true }
//! }
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;

use kernel::clk::{apply_default_config, owned_name, ClockNode, ClockRegistry};
use kernel::driver::{Device, Driver};
use kernel::dt::DtNode;
use kernel::hil::clk::Clock;
use kernel::memory::{phys_to_virt, PhysicalAddr};
use kernel::utilities::registers::interfaces::Readable;
use kernel::utilities::registers::LocalRegisterCopy;
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::ccu_aon::{CcuAonRegisters, DPLL_CHANNELS, DPLL_CTRL, R128_CCU_AON_BASE};

/// One DPLL output divider.
pub struct PllDivider {
    registers: StaticRef<CcuAonRegisters>,
    parent: String,
    channel: usize,
}

impl PllDivider {
    pub fn new(registers: StaticRef<CcuAonRegisters>, parent: String, channel: usize) -> Self {
        PllDivider {
            registers,
            parent,
            channel,
        }
    }
}

/// Output rate of a divider whose control register holds `ctrl`.
fn divided_rate(
    parent_rate: u64,
    ctrl: LocalRegisterCopy<u32, DPLL_CTRL::Register>,
) -> Result<u64, ErrorCode> {
    let n = ctrl.read(DPLL_CTRL::FACTOR_N);
    let m = ctrl.read(DPLL_CTRL::FACTOR_M);
    if m == 0 {
        return Err(ErrorCode::FAIL);
    }
    let rate = u128::from(parent_rate) * u128::from(n) / u128::from(m);
    u64::try_from(rate).map_err(|_| ErrorCode::SIZE)
}

impl Clock for PllDivider {
    fn set_parent(&self, _parent: &str) {}

    fn get_parent(&self) -> Option<&str> {
        Some(&self.parent)
    }

    fn set_enable(&self, _enable: bool) {}

    fn get_enable(&self) -> bool {
        true
    }

    fn set_rate(&self, _parent_rate: u64, _rate: u64) {}

    /// # Errors
    ///
    /// + [Err]\([ErrorCode::FAIL]\): the divisor field reads 0.
    /// + [Err]\([ErrorCode::SIZE]\): the rate does not fit in 64 bits.
    ///
    /// A divider on a channel the block does not have outputs 0 Hz.
    fn get_rate(&self, parent_rate: u64) -> Result<u64, ErrorCode> {
        match self.registers.dpll_ctrl(self.channel) {
            Some(ctrl) => divided_rate(parent_rate, ctrl.extract()),
            None => Ok(0),
        }
    }
}

/// Driver for `clk-r128-pll` description nodes.
pub struct ClkR128Pll<'a> {
    clocks: &'a ClockRegistry,
    ccu_base: PhysicalAddr,
}

impl<'a> ClkR128Pll<'a> {
    pub fn new(clocks: &'a ClockRegistry) -> ClkR128Pll<'a> {
        ClkR128Pll {
            clocks,
            ccu_base: R128_CCU_AON_BASE,
        }
    }

    /// Driver for a CCU AON block at `ccu_base`.
    ///
    /// # Safety
    ///
    /// `ccu_base` must be the physical address of memory laid out as
    /// [`CcuAonRegisters`] that stays valid for as long as any clock this
    /// driver creates.
    pub unsafe fn with_base(clocks: &'a ClockRegistry, ccu_base: PhysicalAddr) -> ClkR128Pll<'a> {
        ClkR128Pll { clocks, ccu_base }
    }

    /// Build the clock node and register it. If registration fails the
    /// node and its copies are dropped before returning.
    fn instantiate(&self, name: &str, parent: &str, channel: usize) -> Result<Device, ErrorCode> {
        // SAFETY: `ccu_base` is the CCU AON block, either the SoC constant or
        // the address promised valid by the caller of `with_base`.
        let registers = unsafe {
            StaticRef::new(phys_to_virt(self.ccu_base) as *const CcuAonRegisters)
        };
        let divider = PllDivider::new(registers, owned_name(parent)?, channel);
        let clk = Rc::new(ClockNode::new(owned_name(name)?, Box::new(divider)));
        let dev = Device::clk(self.name(), clk.clone())?;
        self.clocks.register(&clk)?;
        Ok(dev)
    }
}

impl Driver for ClkR128Pll<'_> {
    fn name(&self) -> &'static str {
        "clk-r128-pll"
    }

    /// # Errors
    ///
    /// + [Err]\([ErrorCode::INVAL]\): `channel` is not 0, 1 or 2, or `name`
    /// or `parent` is missing or empty.
    /// + [Err]\([ErrorCode::NODEVICE]\): `parent` is not a registered clock.
    /// + [Err]\([ErrorCode::ALREADY]\): a clock named `name` exists.
    /// + [Err]\([ErrorCode::NOMEM]\): the node cannot be allocated.
    fn probe(&self, node: &dyn DtNode) -> Result<Device, ErrorCode> {
        let parent = node.read_string("parent", None);
        let name = node.read_string("name", None);
        let channel = usize::try_from(node.read_int("channel", -1))
            .ok()
            .filter(|channel| *channel < DPLL_CHANNELS)
            .ok_or(ErrorCode::INVAL)?;

        let parent = parent.filter(|parent| !parent.is_empty());
        let name = name.filter(|name| !name.is_empty());
        let (Some(parent), Some(name)) = (parent, name) else {
            return Err(ErrorCode::INVAL);
        };
        if !self.clocks.contains(parent) {
            return Err(ErrorCode::NODEVICE);
        }
        if self.clocks.contains(name) {
            return Err(ErrorCode::ALREADY);
        }

        let dev = self.instantiate(name, parent, channel)?;
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
