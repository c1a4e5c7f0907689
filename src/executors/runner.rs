//! # Invoke a single handler and drive a dispatch to completion.
//!
//! Shared building blocks of the executors:
//! - [`invoke`] runs one handler with panic isolation;
//! - [`invoke_guarded`] additionally routes a failure through the failure policy;
//! - [`launch`] awaits a dispatch or, in fire-and-forget mode, spawns it.
//!
//! ## Flow
//! ```text
//! invoke_guarded(handler, message, policy)
//!   └─► handler.handle(message)           (catch_unwind)
//!         ├─ Ok        ──► Ok
//!         ├─ Err(e)    ──► policy.on_failure(e, message, handler)
//!         └─ panic(p)  ──► policy.on_failure(Panicked{p}, message, handler)
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::HandlerError;
use crate::logging::Logger;
use crate::messages::{HandlerRef, MessageRef};
use crate::policies::FailurePolicy;

/// Runs `handler` once; a panic becomes [`HandlerError::Panicked`].
pub(crate) async fn invoke(handler: &HandlerRef, message: MessageRef) -> Result<(), HandlerError> {
    let fut = handler.handle(message);
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(panic_err) => Err(HandlerError::panicked(panic_info(&*panic_err))),
    }
}

/// Runs `handler` once and dispositions any failure through `policy`.
pub(crate) async fn invoke_guarded(
    handler: &HandlerRef,
    message: &MessageRef,
    policy: &dyn FailurePolicy,
) -> Result<(), HandlerError> {
    match invoke(handler, message.clone()).await {
        Ok(()) => Ok(()),
        Err(e) => policy.on_failure(e, message, handler).await,
    }
}

/// Awaits `work`, or spawns it and returns at once when `fire_and_forget` is set.
///
/// A failure escaping a spawned dispatch has nobody left to receive it; it is
/// reported through `log` at `error` level.
pub(crate) async fn launch<F>(
    fire_and_forget: bool,
    log: &Logger,
    handlers: usize,
    work: F,
) -> Result<(), HandlerError>
where
    F: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    if !fire_and_forget {
        return work.await;
    }

    log.debug(format_args!(
        "fire-and-forget mode, running {handlers} handlers in a background task"
    ));
    let log = log.clone();
    tokio::spawn(async move {
        if let Err(e) = work.await {
            log.error(
                format_args!("background dispatch failed: {}", e.as_message()),
                Some(&e),
            );
        }
    });
    Ok(())
}

/// Renders a panic payload as text.
pub(crate) fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
