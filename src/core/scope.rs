// src/core/scope.rs

//! # Scoped Acquisition
//!
//! A `Scope` is anything with an `enter`/`exit` lifecycle. This module provides the
//! RAII guard that drives that lifecycle for a block of code, and the `ScopeAdapter`,
//! which lets any `Scope` also wrap ("decorate") a closure so that every call to it
//! runs inside a fresh scope.

use std::fmt;

/// How a scope was left.
#[derive(Clone, Copy)]
pub enum ExitOutcome<'a> {
    /// The guarded code finished normally.
    Completed,
    /// The guarded code returned an error. The error is still owned by the caller.
    Failed(&'a dyn fmt::Display),
    /// A panic is unwinding through the scope.
    Unwinding,
}

impl ExitOutcome<'_> {
    /// Returns `true` for any outcome other than `Completed`.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Debug for ExitOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Failed(err) => f.debug_tuple("Failed").field(&err.to_string()).finish(),
            Self::Unwinding => f.write_str("Unwinding"),
        }
    }
}

/// The delegate's decision about an in-flight error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Let the error continue to the caller.
    #[default]
    Propagate,
    /// Swallow the error. Only honoured for `Err` values; panics always keep unwinding.
    Suppress,
}

/// A resource with a scoped lifecycle.
///
/// `exit` is called exactly once for every `enter`, whatever way the scope ends.
pub trait Scope {
    /// Called when the scope is entered.
    fn enter(&self);

    /// Called when the scope is left. The return value decides whether a failed
    /// outcome is propagated or suppressed.
    fn exit(&self, outcome: ExitOutcome<'_>) -> Disposition;
}

impl<S: Scope + ?Sized> Scope for &S {
    fn enter(&self) {
        (**self).enter();
    }

    fn exit(&self, outcome: ExitOutcome<'_>) -> Disposition {
        (**self).exit(outcome)
    }
}

fn exit_on_drop<S: Scope + ?Sized>(scope: &S) {
    let outcome = if std::thread::panicking() {
        ExitOutcome::Unwinding
    } else {
        ExitOutcome::Completed
    };
    // A dropped guard cannot suppress anything, so the disposition is discarded.
    let _ = scope.exit(outcome);
}

/// RAII handle for an entered scope. Dropping it exits the scope.
#[must_use = "the scope is exited as soon as the guard is dropped"]
pub struct ScopeGuard<'a, S: Scope + ?Sized> {
    _armed: scopeguard::ScopeGuard<&'a S, fn(&'a S)>,
}

impl<'a, S: Scope + ?Sized> ScopeGuard<'a, S> {
    /// Enters `scope` and returns the guard that will exit it.
    pub fn enter(scope: &'a S) -> Self {
        scope.enter();
        Self {
            _armed: scopeguard::guard(scope, exit_on_drop::<S> as fn(&'a S)),
        }
    }
}

impl<S: Scope + ?Sized> fmt::Debug for ScopeGuard<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard").finish_non_exhaustive()
    }
}

/// Grants a `Scope` the ability to decorate closures.
///
/// The adapter holds no state of its own: entering and exiting it forwards straight
/// to the delegate. It is built once and reused for every scope entry, whether the
/// entry comes from `scope()`, `call()` or a decorated closure.
#[derive(Debug, Clone)]
pub struct ScopeAdapter<S: Scope> {
    delegate: S,
}

impl<S: Scope> ScopeAdapter<S> {
    /// Wraps `delegate`.
    pub fn new(delegate: S) -> Self {
        Self { delegate }
    }

    /// Returns a reference to the delegate.
    pub fn get_ref(&self) -> &S {
        &self.delegate
    }

    /// Unwraps the adapter, returning the delegate.
    pub fn into_inner(self) -> S {
        self.delegate
    }

    /// Enters a scope that lasts until the returned guard is dropped.
    pub fn scope(&self) -> ScopeGuard<'_, Self> {
        ScopeGuard::enter(self)
    }

    /// Runs `f` inside a fresh scope and returns its result unchanged.
    ///
    /// The scope is exited on every path, including a panic inside `f`.
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.scope();
        f()
    }

    /// Runs a fallible `f` inside a fresh scope.
    ///
    /// An `Err` is reported to the delegate as `ExitOutcome::Failed`. If the delegate
    /// answers `Disposition::Suppress` the error is dropped and `Ok(None)` is returned;
    /// otherwise the error is handed back untouched.
    pub fn try_call<T, E, F>(&self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        self.enter();
        let on_unwind = scopeguard::guard_on_unwind(&self.delegate, |delegate| {
            let _ = delegate.exit(ExitOutcome::Unwinding);
        });
        let result = f();
        scopeguard::ScopeGuard::into_inner(on_unwind);

        match result {
            Ok(value) => {
                let _ = self.exit(ExitOutcome::Completed);
                Ok(Some(value))
            }
            Err(err) => match self.exit(ExitOutcome::Failed(&err)) {
                Disposition::Suppress => {
                    log::debug!("Scope delegate suppressed error: {}", err);
                    Ok(None)
                }
                Disposition::Propagate => Err(err),
            },
        }
    }

    /// Returns a closure that behaves like `f`, but runs every call in a fresh scope.
    ///
    /// Functions of several arguments take them as a tuple.
    pub fn decorate<'s, A, R, F>(&'s self, mut f: F) -> impl FnMut(A) -> R + 's
    where
        F: FnMut(A) -> R + 's,
    {
        move |args| self.call(|| f(args))
    }

    /// Like `decorate`, for fallible functions: each call goes through `try_call`, so an
    /// `Err` reaches the delegate as `ExitOutcome::Failed` and its disposition applies.
    pub fn try_decorate<'s, A, T, E, F>(
        &'s self,
        mut f: F,
    ) -> impl FnMut(A) -> Result<Option<T>, E> + 's
    where
        F: FnMut(A) -> Result<T, E> + 's,
        E: fmt::Display,
    {
        move |args| self.try_call(|| f(args))
    }
}

impl<S: Scope> Scope for ScopeAdapter<S> {
    fn enter(&self) {
        self.delegate.enter();
    }

    fn exit(&self, outcome: ExitOutcome<'_>) -> Disposition {
        self.delegate.exit(outcome)
    }
}
