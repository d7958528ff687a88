// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Always-on clock control unit (CCU AON) registers.
//!
//! Only the DPLL output divider controls are described. The boot ROM trains
//! the DPLLs and straps the dividers; software only reads them back.

use kernel::memory::PhysicalAddr;
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite};

/// Physical base address of the CCU AON block.
pub const R128_CCU_AON_BASE: PhysicalAddr = 0x4004_c400;

/// Number of DPLL output channels.
pub const DPLL_CHANNELS: usize = 3;

register_structs! {
    pub CcuAonRegisters {
        (0x000 => _reserved0),
        /// DPLL1 output divider control
        (0x00C => dpll1_ctrl: ReadWrite<u32, DPLL_CTRL::Register>),
        /// DPLL2 output divider control
        (0x010 => dpll2_ctrl: ReadWrite<u32, DPLL_CTRL::Register>),
        /// DPLL3 output divider control
        (0x014 => dpll3_ctrl: ReadWrite<u32, DPLL_CTRL::Register>),
        (0x018 => @END),
    }
}

register_bitfields![u32,
    pub DPLL_CTRL [
        /// Output divisor
        FACTOR_M OFFSET(0) NUMBITS(4) [],
        /// Output multiplier
        FACTOR_N OFFSET(4) NUMBITS(8) []
    ]
];

impl CcuAonRegisters {
    /// Divider control register of DPLL output `channel` (0-based), or
    /// `None` if the channel does not exist.
    pub fn dpll_ctrl(&self, channel: usize) -> Option<&ReadWrite<u32, DPLL_CTRL::Register>> {
        match channel {
            0 => Some(&self.dpll1_ctrl),
            1 => Some(&self.dpll2_ctrl),
            2 => Some(&self.dpll3_ctrl),
            _ => None,
        }
    }
}
