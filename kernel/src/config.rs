// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Data structure for storing compile-time configuration options in the kernel.
//!
//! Configuration lives in a typed `const` object rather than behind `#[cfg]`
//! attributes scattered through the code. All code paths are type-checked by
//! the compiler, even the disabled ones, and the compiler folds the constants
//! away so a disabled option costs nothing in the resulting binary.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, modify the relevant values in the `CONFIG`
/// constant object defined at the end of this file.
pub(crate) struct Config {
    /// Whether the driver framework should print a message in the debug
    /// output when a probe fails.
    ///
    /// Probe failures are never fatal, so without this option a misconfigured
    /// device description silently produces no device.
    pub(crate) debug_probe: bool,

    /// Whether the clock tree operations should report faults (missing
    /// parents, cyclic parent chains, rate computation faults) to the debug
    /// output.
    pub(crate) debug_clk: bool,

    /// Maximum number of parent links followed when a tree operation walks
    /// from a clock towards its root.
    ///
    /// Device descriptions are expected to describe acyclic trees, but the
    /// walk is bounded anyway so that a cycle terminates with an error.
    pub(crate) max_clock_depth: usize,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location in the kernel crate where we permit
/// `#[cfg(x)]` to be used to configure code based on Cargo features.
pub(crate) const CONFIG: Config = Config {
    debug_probe: cfg!(feature = "debug_probe"),
    debug_clk: cfg!(feature = "debug_clk"),
    max_clock_depth: 32,
};
