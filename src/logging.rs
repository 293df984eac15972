//! Unified logging macro for the node.
//!
//! `knx_log!` forwards to `log::` when the `log` feature is enabled, otherwise
//! to `defmt::` when the `defmt` feature is enabled. With neither feature the
//! arguments are still type-checked but nothing is emitted, so the core stays
//! usable on targets without a logger.
//!
//! # Usage
//!
//! ```rust,ignore
//! knx_log!(info, "Configuration restored");
//! knx_log!(debug, "Received {} bytes", n);
//! knx_log!(warn, "Binding table full");
//! ```
//!
//! Format strings are limited to `{}` and `{:?}` so that both backends accept
//! them.

#[macro_export]
#[doc(hidden)]
#[cfg(feature = "log")]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { log::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { log::warn!($($arg)*) };
    (error, $($arg:tt)*) => { log::error!($($arg)*) };
    (trace, $($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
#[doc(hidden)]
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[macro_export]
#[doc(hidden)]
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! knx_log {
    ($level:ident, $($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
