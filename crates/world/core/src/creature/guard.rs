/// Per-actor call-depth counter that drops nested re-entry.
///
/// A perception callback may trigger movement, which may synchronously
/// trigger another perception for the same actor. Only the outermost call
/// runs; nested ones are counted and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReentrancyGuard {
    depth: u32,
    dropped: u64,
}

impl ReentrancyGuard {
    pub const fn new() -> Self {
        Self {
            depth: 0,
            dropped: 0,
        }
    }

    /// Enters the guarded section. False means a call is already running.
    pub fn try_enter(&mut self) -> bool {
        if self.depth > 0 {
            self.dropped += 1;
            tracing::trace!(dropped = self.dropped, "nested perception dropped");
            return false;
        }
        self.depth = 1;
        true
    }

    pub fn exit(&mut self) {
        debug_assert!(self.depth > 0, "reentrancy guard exited while at rest");
        self.depth = self.depth.saturating_sub(1);
    }

    /// True between ticks: no guarded call is in progress.
    pub fn is_at_rest(&self) -> bool {
        self.depth == 0
    }

    /// Nested calls dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_entry_is_dropped_and_counted() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.try_enter());
        assert!(!guard.try_enter());
        assert!(!guard.try_enter());
        assert!(!guard.is_at_rest());
        guard.exit();
        assert!(guard.is_at_rest());
        assert_eq!(guard.dropped(), 2);
        assert!(guard.try_enter());
        guard.exit();
    }
}
