//! Double-submit guard.
//!
//! A trigger (sign-up button, analyze button) must not start a second
//! completion while the first is still pending.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::foundation::DomainError;

/// Tracks whether one named operation is running.
#[derive(Debug)]
pub struct InFlight {
    operation: &'static str,
    busy: AtomicBool,
}

impl InFlight {
    pub const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            busy: AtomicBool::new(false),
        }
    }

    /// Marks the operation as running until the returned token is dropped.
    ///
    /// # Errors
    ///
    /// - `OperationPending` if a previous token is still alive
    pub fn begin(&self) -> Result<InFlightToken<'_>, DomainError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DomainError::operation_pending(self.operation))?;
        Ok(InFlightToken { owner: self })
    }

    pub fn is_pending(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the guard on drop, including on early `?` returns.
#[derive(Debug)]
pub struct InFlightToken<'a> {
    owner: &'a InFlight,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.owner.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn second_begin_is_refused_while_first_is_alive() {
        let guard = InFlight::new("sign-up");
        let token = guard.begin().unwrap();
        let err = guard.begin().unwrap_err();
        assert_eq!(err.code, ErrorCode::OperationPending);
        assert_eq!(err.detail("operation"), Some("sign-up"));
        drop(token);
        assert!(!guard.is_pending());
        assert!(guard.begin().is_ok());
    }
}
