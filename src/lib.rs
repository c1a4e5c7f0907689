//! # weakbus
//!
//! **weakbus** is an in-process publish/subscribe message broker for async Rust.
//!
//! Producers send typed messages; consumers register async handlers for a
//! message type. The broker holds registrations **weakly**: a handler stays
//! registered only while the caller keeps the returned [`Subscription`].
//! Matching (exact or polymorphic) and dispatch (sequential, parallel,
//! fire-and-forget) are pluggable.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  register(type, handler) ──► Subscription (strong owner)
//!                                   │
//!                                   ▼ Weak
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Broker                                                           │
//! │  - WeakMultiMap<MessageType, Registration>  (RwLock, purge on read)│
//! │  - Matching: Direct | Discriminator (ExactType / AssignableType)  │
//! │  - Executor: Sequential | Parallel | ExecutorFn                   │
//! │  - Logger (LogSink: NullSink / TracingSink / custom)              │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ send(message)
//!        ▼
//!   matching ──► HandlerList snapshot ──► Executor::execute
//!                                          ├─► h1.handle(msg) ─┐
//!                                          ├─► h2.handle(msg) ─┼─► FailurePolicy
//!                                          └─► hN.handle(msg) ─┘   (Rethrow / Swallow / FailureFn)
//! ```
//!
//! ### Send path
//! ```text
//! send(message)
//!   ├─► ty = message.message_type()
//!   ├─► live registrations matching ty (dead weak handles purged on the way)
//!   ├─► copy handlers into an immutable HandlerList
//!   ├─► empty ─► Ok(()) (executor never invoked)
//!   └─► executor.execute(message, handlers)
//!           ├─ handler Ok        ─► next
//!           ├─ handler Err/panic ─► FailurePolicy::on_failure
//!           │        ├─ Err ─► propagated to the send caller (blocking mode)
//!           │        └─ Ok  ─► SequentialPolicy::Stop / Continue
//!           └─ fire_and_forget  ─► spawned, send returns immediately
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                 |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------------|
//! | **Broker**        | Register handlers, send messages, weak lifetimes.             | [`Broker`], [`Subscription`], [`RegistrationSet`]  |
//! | **Messages**      | Type tokens with declared supertypes, erased messages.        | [`Message`], [`MessageType`], [`MessageRef`]       |
//! | **Handlers**      | Async fallible handlers, closure-backed or typed.             | [`Handler`], [`HandlerFn`], [`TypedHandlerFn`]     |
//! | **Matching**      | Exact, assignable or custom type compatibility.               | [`Discriminator`], [`ExactType`], [`AssignableType`] |
//! | **Dispatch**      | Sequential, parallel or custom strategies.                    | [`Executor`], [`SequentialExecutor`], [`ParallelExecutor`] |
//! | **Policies**      | What a handler failure does to the rest of the dispatch.      | [`FailurePolicy`], [`SequentialPolicy`]            |
//! | **Errors**        | Typed handler errors, panics included.                        | [`HandlerError`]                                   |
//! | **Logging**       | Pluggable sink, `tracing` adapter included.                   | [`LogSink`], [`TracingSink`]                       |
//! | **Configuration** | Broker wiring and builder.                                    | [`BrokerConfig`], [`BrokerBuilder`]                |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakbus::{
//!     Broker, BrokerConfig, HandlerError, Message, MessageType, ParallelExecutor, Swallow,
//!     TracingSink,
//! };
//!
//! #[derive(Debug)]
//! struct Event;
//! impl Message for Event {}
//!
//! #[derive(Debug)]
//! struct UserCreated { id: u64 }
//! impl Message for UserCreated {
//!     fn supertypes() -> Vec<MessageType> {
//!         vec![MessageType::of::<Event>()]
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), HandlerError> {
//!     let executor = ParallelExecutor::new().with_failure_policy(Arc::new(Swallow::new()));
//!     let broker = Broker::builder(BrokerConfig::default())
//!         .with_executor(Arc::new(executor))
//!         .with_log(Arc::new(TracingSink))
//!         .build();
//!
//!     // Receives UserCreated directly.
//!     let users = broker
//!         .register_fn("welcome-mail", |u: Arc<UserCreated>| async move {
//!             println!("welcome user {}", u.id);
//!             Ok(())
//!         })
//!         .await;
//!
//!     broker.send(UserCreated { id: 7 }).await?;
//!
//!     // Dropping the subscription unregisters the handler.
//!     drop(users);
//!     broker.send(UserCreated { id: 8 }).await?;
//!     Ok(())
//! }
//! ```
mod core;
mod discriminators;
mod error;
mod executors;
mod logging;
mod messages;
mod policies;

// ---- Public re-exports ----

pub use core::{
    Broker, BrokerBuilder, BrokerConfig, Matching, Registration, RegistrationSet, Subscription,
    WeakMultiMap,
};
pub use discriminators::{AssignableType, Discriminator, DiscriminatorFn, ExactType};
pub use error::{BoxError, HandlerError};
pub use executors::{Executor, ExecutorFn, ParallelExecutor, SequentialExecutor};
pub use logging::{LogLevel, LogSink, Logger, NullSink, TracingSink};
pub use messages::{
    AnyMessage, Handler, HandlerFn, HandlerList, HandlerRef, Message, MessageRef, MessageType,
    TypedHandlerFn,
};
pub use policies::{FailureFn, FailurePolicy, Rethrow, SequentialPolicy, Swallow};
