// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Standard error enum for clock and driver operations.

use core::fmt;

/// Standard errors for the clock tree kernel.
///
/// Every fallible operation in this crate and in the chip crates returns
/// `Result<T, ErrorCode>`. The numeric values are stable so that they can be
/// reported through a debug console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 0,
    /// Underlying system is busy; retry
    BUSY = 1,
    /// The state requested is already set
    ALREADY = 2,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Parameter passed was too large
    SIZE = 6,
    /// Memory required not available
    NOMEM = 8,
    /// Device does not exist
    NODEVICE = 10,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            ErrorCode::FAIL => "generic failure",
            ErrorCode::BUSY => "busy",
            ErrorCode::ALREADY => "already set",
            ErrorCode::INVAL => "invalid parameter",
            ErrorCode::SIZE => "value too large",
            ErrorCode::NOMEM => "out of memory",
            ErrorCode::NODEVICE => "no such device",
        };
        write!(f, "{} ({})", msg, *self as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::string::ToString;

    #[test]
    fn display_includes_numeric_code() {
        assert_eq!(ErrorCode::NODEVICE.to_string(), "no such device (10)");
        assert_eq!(usize::from(ErrorCode::INVAL), 5);
    }

    #[test]
    fn numeric_codes_match_tock() {
        let codes = [
            (ErrorCode::FAIL, 0),
            (ErrorCode::BUSY, 1),
            (ErrorCode::ALREADY, 2),
            (ErrorCode::INVAL, 5),
            (ErrorCode::SIZE, 6),
            (ErrorCode::NOMEM, 8),
            (ErrorCode::NODEVICE, 10),
        ];
        for (code, value) in codes {
            assert_eq!(usize::from(code), value, "{:?}", code);
        }
    }
}
