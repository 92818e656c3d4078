//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled, print under host
//! tests and compile to nothing otherwise. Format strings must stay valid
//! for both `defmt` and `core::fmt` (plain `{}` / `{:?}`).

macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($fmt $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!(concat!("[INFO] ", $fmt) $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            $(let _ = &$arg;)*
        }
    }};
}

macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!(concat!("[WARN] ", $fmt) $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            $(let _ = &$arg;)*
        }
    }};
}

macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($fmt $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        ::std::eprintln!(concat!("[ERROR] ", $fmt) $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            $(let _ = &$arg;)*
        }
    }};
}

macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($fmt $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!(concat!("[DEBUG] ", $fmt) $(, $arg)*);

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            $(let _ = &$arg;)*
        }
    }};
}
