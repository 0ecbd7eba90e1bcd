/// Conditional logging module for development builds
///
/// The `log!` macro provides informational logging that is compiled out in
/// production (release) builds by default. Warnings about repaired or skipped
/// data should use `tracing::warn!` directly.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// On `wasm32` the message goes to the browser console, elsewhere it is
/// forwarded to `tracing::debug!`.
///
/// # Examples
///
/// ```rust
/// use transit_map::log;
///
/// let segment_count = 3;
/// log!("Rebuilt {} interline segments", segment_count);
/// ```
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(all(target_arch = "wasm32", any(debug_assertions, feature = "console_logging")))]
        {
            $crate::__web_sys::console::log_1(&format!($($arg),+).into());
        }
        #[cfg(all(not(target_arch = "wasm32"), any(debug_assertions, feature = "console_logging")))]
        {
            $crate::__tracing::debug!("{}", format!($($arg),+));
        }
    };
}

pub use log;
