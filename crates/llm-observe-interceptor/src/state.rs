//! Installation and enablement flags of one [`Observer`](crate::Observer).

use std::sync::atomic::{AtomicBool, Ordering};

/// `installed` is set once by a successful install and never reset.
/// `enabled` is the logical observation flag and can flip freely.
#[derive(Debug, Default)]
pub(crate) struct PatchState {
    installed: AtomicBool,
    enabled: AtomicBool,
    debug: AtomicBool,
}

impl PatchState {
    pub(crate) fn new(enabled: bool, debug: bool) -> Self {
        Self {
            installed: AtomicBool::new(false),
            enabled: AtomicBool::new(enabled),
            debug: AtomicBool::new(debug),
        }
    }

    pub(crate) fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_installed(&self) {
        self.installed.store(true, Ordering::Release);
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub(crate) fn set_debug(&self, debug: bool) {
        self.debug.store(debug, Ordering::Relaxed);
    }

    /// Whether new wrappers should observe calls.
    pub(crate) fn is_active(&self) -> bool {
        self.is_installed() && self.is_enabled()
    }
}
