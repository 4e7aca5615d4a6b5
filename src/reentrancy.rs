//! Debug-only detection of re-entry into a table.
//!
//! Public table operations run user `Hash` and `Eq` code while chain links
//! and counters may be mid-update. A key whose `eq` reaches back into the
//! same table would observe that state, so debug builds panic instead and
//! name the operation that was interrupted. Release builds compile the
//! check away.

#[cfg(debug_assertions)]
use core::cell::Cell;

/// Records which table operation, if any, is currently running.
///
/// The marker keeps the owner `!Sync` in every build profile; it stays
/// `Send`, so a table may still be moved behind a caller's mutex.
#[derive(Debug, Default)]
pub(crate) struct ReentryCheck {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    _not_sync: core::marker::PhantomData<core::cell::Cell<()>>,
}

impl ReentryCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: core::marker::PhantomData,
        }
    }

    /// Marks `op` as running until the returned scope is dropped.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> OpScope<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.replace(Some(op)) {
                panic!("reentrant call to `{op}` while `{outer}` is running on the same table");
            }
            OpScope { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            OpScope {
                _owner: core::marker::PhantomData,
            }
        }
    }
}

/// RAII scope returned by [`ReentryCheck::enter`].
pub(crate) struct OpScope<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentryCheck,
    #[cfg(not(debug_assertions))]
    _owner: core::marker::PhantomData<&'a ReentryCheck>,
}

impl Drop for OpScope<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let prev = self.owner.active.take();
            debug_assert!(prev.is_some());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReentryCheck;

    #[test]
    fn sequential_scopes_are_ok() {
        let r = ReentryCheck::new();
        {
            let _s = r.enter("get");
        }
        let _s = r.enter("set");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_scope_panics_with_both_names() {
        let r = ReentryCheck::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter("set");
            let _inner = r.enter("contains");
        }));
        let err = res.expect_err("nested entry must panic in debug builds");
        let msg = err
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("`contains`"), "{msg}");
        assert!(msg.contains("`set`"), "{msg}");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_scope_is_noop_in_release() {
        let r = ReentryCheck::new();
        let _a = r.enter("set");
        let _b = r.enter("contains");
    }
}
