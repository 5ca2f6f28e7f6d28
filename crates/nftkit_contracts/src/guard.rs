//! Activation guard for contract managers.
//!
//! A manager starts inactive and must be activated (network checks, wallet
//! setup) before state-changing calls go through. Guarded operations accept
//! their arguments as a [`ManagedArgs`] bundle, either a plain manager
//! reference or a request struct with a `manager` field.

use std::future::Future;

use crate::error::{ContractError, ContractResult};

/// Anything that carries an activation flag.
pub trait ContractManager: Send + Sync {
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;
}

/// Fail with [`ContractError::MustActivate`] unless `manager` is active.
pub fn ensure_active<M: ContractManager + ?Sized>(manager: &M) -> ContractResult<()> {
    if manager.is_active() {
        Ok(())
    } else {
        Err(ContractError::MustActivate {
            manager: manager.name().to_string(),
        })
    }
}

/// Arguments of a guarded operation that expose the manager to check.
pub trait ManagedArgs {
    fn manager(&self) -> &dyn ContractManager;
}

impl<M: ContractManager> ManagedArgs for &M {
    fn manager(&self) -> &dyn ContractManager {
        *self
    }
}

/// Run `op` with `args` after checking the manager they carry.
///
/// `op` is not invoked when the check fails; its result is returned unchanged
/// otherwise.
pub async fn guarded<A, F, Fut, T>(args: A, op: F) -> ContractResult<T>
where
    A: ManagedArgs,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = ContractResult<T>>,
{
    ensure_active(args.manager())?;
    op(args).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    struct Toggle {
        active: AtomicBool,
    }

    impl Toggle {
        fn new(active: bool) -> Self {
            Self {
                active: AtomicBool::new(active),
            }
        }
    }

    impl ContractManager for Toggle {
        fn name(&self) -> &str {
            "Toggle"
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }
    }

    struct Named<'a> {
        manager: &'a Toggle,
        value: u32,
    }

    impl ManagedArgs for Named<'_> {
        fn manager(&self) -> &dyn ContractManager {
            self.manager
        }
    }

    #[test]
    fn ensure_active_reports_manager_name() {
        let err = ensure_active(&Toggle::new(false)).unwrap_err();
        match err {
            ContractError::MustActivate { manager } => assert_eq!(manager, "Toggle"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(ensure_active(&Toggle::new(true)).is_ok());
    }

    #[tokio::test]
    async fn positional_form_is_rejected_when_inactive() {
        let manager = Toggle::new(false);
        let calls = AtomicUsize::new(0);

        let err = guarded(&manager, |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ContractError::MustActivate { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn named_form_is_rejected_when_inactive() {
        let manager = Toggle::new(false);
        let err = guarded(Named { manager: &manager, value: 1 }, |args| async move {
            Ok(args.value)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ContractError::MustActivate { .. }));
    }

    #[tokio::test]
    async fn active_manager_passes_result_through() {
        let manager = Toggle::new(true);

        let doubled = guarded(Named { manager: &manager, value: 21 }, |args| async move {
            Ok(args.value * 2)
        })
        .await
        .unwrap();
        assert_eq!(doubled, 42);

        let err = guarded(&manager, |_| async {
            Err::<(), _>(ContractError::invalid("boom"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid response: boom");
    }

    #[tokio::test]
    async fn flag_is_read_at_call_time() {
        let manager = Toggle::new(false);
        assert!(guarded(&manager, |_| async { Ok(()) }).await.is_err());
        manager.active.store(true, Ordering::SeqCst);
        assert!(guarded(&manager, |_| async { Ok(()) }).await.is_ok());
    }
}
