//! Logging macros that forward to `defmt` or `log`.
//!
//! The backend is selected by the `defmt` and `log` features of the crate that
//! invokes the macros, not by this crate's features. Without either feature the
//! macros expand to nothing. Format strings must stay within what both backends
//! accept.

#![no_std]

#[doc(hidden)]
#[macro_export]
macro_rules! __dispatch {
    ($level:ident, $($args:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::$level!($($args)*);
        #[cfg(feature = "log")]
        log::$level!($($args)*);
    };
}

#[macro_export]
macro_rules! trace {
    ($($args:tt)*) => {
        $crate::__dispatch!(trace, $($args)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {
        $crate::__dispatch!(debug, $($args)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($args:tt)*) => {
        $crate::__dispatch!(info, $($args)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {
        $crate::__dispatch!(warn, $($args)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($args:tt)*) => {
        $crate::__dispatch!(error, $($args)*)
    };
}
