// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Support for kernel debug output.
//!
//! Boards install a console sink with [`set_debug_writer`] early during boot.
//! After that, any code in the kernel or in chip crates can print with the
//! `debug!` macro:
//!
//! ```rust,ignore
//! use kernel::debug;
//!
//! debug!("clk {}: rate {}", name, rate);
//! debug_verbose!("probe of {} failed", compatible);
//! ```
//!
//! Messages printed before a sink is installed are dropped. Output is
//! synchronous: the boot environment has no deferred calls, so each line is
//! handed to the sink before the macro returns.

use core::fmt::{self, Arguments, Write};
use core::ptr::addr_of_mut;

/// Byte sink used for debug output, typically a UART.
pub trait IoWrite {
    /// Write `buf` to the output, returning the number of bytes consumed.
    fn write(&mut self, buf: &[u8]) -> usize;
}

static mut DEBUG_WRITER: Option<&'static mut dyn IoWrite> = None;

/// Install the debug output sink.
///
/// # Safety
///
/// Must be called from the single boot context, before or between debug
/// prints, never concurrently with a `debug!` invocation.
pub unsafe fn set_debug_writer(writer: &'static mut dyn IoWrite) {
    *addr_of_mut!(DEBUG_WRITER) = Some(writer);
}

struct WriteAdapter<'a>(&'a mut dyn IoWrite);

impl Write for WriteAdapter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            let written = self.0.write(bytes);
            if written == 0 {
                return Err(fmt::Error);
            }
            bytes = &bytes[written.min(bytes.len())..];
        }
        Ok(())
    }
}

fn write_line(writer: &mut dyn IoWrite, prefix: Option<(&str, u32)>, args: Arguments) {
    let mut adapter = WriteAdapter(writer);
    if let Some((file, line)) = prefix {
        let _ = write!(adapter, "{}:{}: ", file, line);
    }
    let _ = adapter.write_fmt(args);
    let _ = adapter.write_str("\r\n");
}

fn with_writer<F: FnOnce(&mut dyn IoWrite)>(f: F) {
    // SAFETY: the boot environment is single threaded and the sink is only
    // replaced through `set_debug_writer`, whose contract forbids overlap
    // with printing.
    let writer = unsafe { (*addr_of_mut!(DEBUG_WRITER)).as_deref_mut() };
    if let Some(writer) = writer {
        f(writer);
    }
}

/// Print a line to the debug sink. Used by the `debug!` macro.
pub fn debug_println(args: Arguments) {
    with_writer(|writer| write_line(writer, None, args));
}

/// Print a line prefixed with its source location. Used by the
/// `debug_verbose!` macro.
pub fn debug_verbose_println(args: Arguments, file_line: &(&'static str, u32)) {
    let (file, line) = *file_line;
    with_writer(|writer| write_line(writer, Some((file, line)), args));
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        // Allow an empty debug!() to print the location when hit
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!("{}", $msg));
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+));
    });
}

/// In-kernel `println()` debugging with the file and line of the call site.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_verbose_println(format_args!("{}", $msg), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_verbose_println(format_args!($fmt, $($arg)+), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
}
