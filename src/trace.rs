use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide diagnostic toggle. Off at load, flipped only through
/// [`set_debug_mode`], never consulted for anything but trace emission.
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

/// Turn hook-level trace emission on or off for the whole process.
pub fn set_debug_mode(on: bool) {
    DEBUG_MODE.store(on, Ordering::Relaxed);
}

pub(crate) fn debug_mode() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// Emits a named debug event when the process-wide debug mode is on.
macro_rules! trace_hook {
    ($name:literal, $($arg:tt)*) => {
        if $crate::trace::debug_mode() {
            tracing::event!(name: $name, tracing::Level::DEBUG, $($arg)*);
        }
    };
}

pub(crate) use trace_hook;
