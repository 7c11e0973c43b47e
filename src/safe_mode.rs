//! Safe mode: a shared switch that blocks designated operations.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of a call routed through [`SafeMode::guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Guarded<T> {
    /// Safe mode was active; nothing was sent.
    Blocked { operation: String },
    /// The call ran.
    Executed(T),
}

impl<T> Guarded<T> {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// The value if the call ran.
    pub fn executed(self) -> Option<T> {
        match self {
            Self::Executed(value) => Some(value),
            Self::Blocked { .. } => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Guarded<U> {
        match self {
            Self::Executed(value) => Guarded::Executed(f(value)),
            Self::Blocked { operation } => Guarded::Blocked { operation },
        }
    }
}

impl<T, E> Guarded<Result<T, E>> {
    /// Swap `Guarded<Result<T, E>>` into `Result<Guarded<T>, E>`.
    pub fn transpose(self) -> Result<Guarded<T>, E> {
        match self {
            Self::Executed(Ok(value)) => Ok(Guarded::Executed(value)),
            Self::Executed(Err(e)) => Err(e),
            Self::Blocked { operation } => Ok(Guarded::Blocked { operation }),
        }
    }
}

/// Switch shared by a [`Nation`](crate::Nation) and every resource handed out
/// from it. Active on creation.
#[derive(Debug, Clone)]
pub struct SafeMode {
    active: Arc<AtomicBool>,
}

impl Default for SafeMode {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SafeMode {
    pub fn new(active: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Turn safe mode on or off for everything sharing this switch.
    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        if active {
            tracing::info!("Safe Mode has been Activated");
        } else {
            tracing::info!("Safe Mode has been Deactivated");
        }
    }

    /// Run `call` unless safe mode is active.
    pub async fn guard<T, F, Fut>(&self, operation: &str, call: F) -> Guarded<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if self.is_active() {
            tracing::warn!(
                "'{}' has been blocked because Safe Mode is active",
                operation
            );
            return Guarded::Blocked {
                operation: operation.to_string(),
            };
        }
        Guarded::Executed(call().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_by_default_blocks() {
        let safe_mode = SafeMode::default();
        let ran = AtomicBool::new(false);
        let flag = &ran;
        let outcome = safe_mode
            .guard("delete people/1", move || async move {
                flag.store(true, Ordering::SeqCst);
                7
            })
            .await;

        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(
            outcome,
            Guarded::Blocked {
                operation: "delete people/1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_inactive_executes() {
        let safe_mode = SafeMode::new(false);
        let outcome = safe_mode.guard("op", || async { 7 }).await;
        assert_eq!(outcome.executed(), Some(7));
    }

    #[tokio::test]
    async fn test_clones_share_the_switch() {
        let safe_mode = SafeMode::default();
        let shared = safe_mode.clone();
        safe_mode.set(false);
        assert!(!shared.is_active());

        let outcome = shared.guard("op", || async { "sent" }).await;
        assert!(!outcome.is_blocked());
    }

    #[test]
    fn test_transpose() {
        let ok: Guarded<Result<u8, String>> = Guarded::Executed(Ok(1));
        assert_eq!(ok.transpose(), Ok(Guarded::Executed(1)));

        let err: Guarded<Result<u8, String>> = Guarded::Executed(Err("boom".into()));
        assert_eq!(err.transpose(), Err("boom".to_string()));

        let blocked: Guarded<Result<u8, String>> = Guarded::Blocked {
            operation: "op".into(),
        };
        assert!(blocked.transpose().unwrap().is_blocked());
    }
}
