//! Logging macros dispatching to `defmt` or `log` depending on the
//! enabled feature. With neither feature the macros expand to nothing.

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => {
        defmt::debug!($($arg)*)
    };
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)*) => {
        defmt::error!($($arg)*)
    };
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! error {
    ($($arg:tt)*) => {{}};
}
