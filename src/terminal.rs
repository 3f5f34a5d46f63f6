//! Raw-mode terminal setup that is undone on every exit path.

use crossterm::{
    cursor::Show,
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io;

/// Runs its restore hook once, when dropped.
pub struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Enter raw mode and the alternate screen. Dropping the guard restores the
/// terminal, including when a later setup step fails.
pub fn enter() -> io::Result<RestoreGuard<fn()>> {
    enable_raw_mode()?;
    let guard = RestoreGuard::new(restore as fn());
    execute!(io::stdout(), EnterAlternateScreen, EnableFocusChange)?;
    Ok(guard)
}

fn restore() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!("leaving raw mode failed: {e}");
    }
    if let Err(e) = execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen, Show) {
        tracing::warn!("restoring terminal failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup(restored: &Arc<AtomicUsize>, fail: bool) -> io::Result<RestoreGuard<impl FnOnce()>> {
        let restored = restored.clone();
        let guard = RestoreGuard::new(move || {
            restored.fetch_add(1, Ordering::SeqCst);
        });
        if fail {
            return Err(io::Error::other("no terminal"));
        }
        Ok(guard)
    }

    #[test]
    fn test_failed_setup_restores() {
        let restored = Arc::new(AtomicUsize::new(0));
        assert!(setup(&restored, true).is_err());
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restores_once_when_dropped() {
        let restored = Arc::new(AtomicUsize::new(0));
        let guard = setup(&restored, false).unwrap();
        assert_eq!(restored.load(Ordering::SeqCst), 0);

        drop(guard);
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }
}
