//! Fatal-error helpers shared by the store internals.

/// Logs an internal-consistency failure and aborts.
///
/// Broken store invariants are programmer errors. Continuing would risk
/// silent data corruption, so the message is emitted through `tracing`
/// and the process panics (which aborts under the workspace profiles).
macro_rules! fatal {
    ($($arg:tt)+) => {{
        ::tracing::error!($($arg)+);
        panic!($($arg)+)
    }};
}

/// Checks a structural invariant, calling [`fatal!`] when it does not hold.
macro_rules! invariant {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            fatal!($($arg)+);
        }
    };
}
