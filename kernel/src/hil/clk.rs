// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for clock sources in a clock tree.
//!
//! Every clock signal in the tree (oscillators, PLLs, dividers, gates) is a
//! node that implements [`Clock`]. A node never stores its frequency: the
//! tree operations in [`crate::clk`] resolve the rate of the parent first and
//! pass it down, and the node derives its own rate from that value and the
//! current hardware state.
//!
//! Variants whose hardware cannot perform an operation (a PLL output with
//! fixed parent wiring cannot be reparented, for example) implement the
//! corresponding setter as a no-op that succeeds. Callers cannot tell an
//! applied change from an ignored one; they should read the state back with
//! the matching getter when it matters.

use crate::ErrorCode;

/// Operations every clock variant provides.
pub trait Clock {
    /// Select `parent` as the new upstream clock.
    fn set_parent(&self, parent: &str);

    /// Name of the current upstream clock, or `None` for a root clock.
    fn get_parent(&self) -> Option<&str>;

    /// Gate the clock output on or off.
    fn set_enable(&self, enable: bool);

    /// Whether the clock output is currently running.
    fn get_enable(&self) -> bool;

    /// Request `rate` Hz given an upstream clock of `parent_rate` Hz.
    fn set_rate(&self, parent_rate: u64, rate: u64);

    /// Current output rate in Hz given an upstream clock of `parent_rate` Hz.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::FAIL]\): the hardware state does not describe a
    /// computable rate (for example a zero divisor).
    /// + [Err]\([ErrorCode::SIZE]\): the rate does not fit in 64 bits.
    fn get_rate(&self, parent_rate: u64) -> Result<u64, ErrorCode>;
}
