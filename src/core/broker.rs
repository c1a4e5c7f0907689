//! # Broker: weak registrations, type matching and dispatch.
//!
//! The [`Broker`] owns the registration store (a [`WeakMultiMap`] keyed by
//! [`MessageType`]), the matching mode and the [`Executor`]. It is `Clone`;
//! clones share the same store.
//!
//! ## Flow
//! ```text
//! register(type, handler)
//!   └─► Arc<Registration> ── Weak ──► store[type]
//!   └─► Subscription (sole strong owner)
//!
//! send(message)
//!   ├─ ty = message.message_type()
//!   ├─ Direct:         store.get(&ty)
//!   │  Discriminator:  store.get_matching(|k| d.is_compatible(&ty, k))
//!   ├─ snapshot handlers ─► HandlerList (immutable)
//!   ├─ empty?  → Ok(()) (executor untouched)
//!   └─ executor.execute(message, handlers).await
//! ```
//!
//! ## Rules
//! - `send` only sees registrations fully inserted before its matching step.
//! - Registrations added or removed while a `send` runs never affect its snapshot.
//! - One handler invocation per matching registration: a handler registered
//!   twice (or under two matching types) runs twice.
//! - Handler failures reach the caller only through the executor's failure policy.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakbus::{Broker, HandlerError, Message};
//!
//! #[derive(Debug)]
//! struct Greeting(String);
//! impl Message for Greeting {}
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), HandlerError> {
//!     let broker = Broker::new();
//!     let sub = broker
//!         .register_fn("printer", |g: Arc<Greeting>| async move {
//!             println!("{}", g.0);
//!             Ok(())
//!         })
//!         .await;
//!
//!     broker.send(Greeting("hello".into())).await?;
//!
//!     sub.unsubscribe().await;
//!     broker.send(Greeting("nobody listens".into())).await?;
//!     Ok(())
//! }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::core::builder::BrokerBuilder;
use crate::core::config::{BrokerConfig, Matching};
use crate::core::registration::{Registration, Subscription};
use crate::core::store::WeakMultiMap;
use crate::error::HandlerError;
use crate::executors::Executor;
use crate::logging::Logger;
use crate::messages::{HandlerFn, HandlerList, HandlerRef, Message, MessageRef, MessageType};

/// Store of weakly-held registrations, keyed by the type they were registered for.
pub(crate) type RegistrationStore = WeakMultiMap<MessageType, Registration>;

/// In-process publish/subscribe broker.
#[derive(Clone)]
pub struct Broker {
    store: Arc<RegistrationStore>,
    matching: Matching,
    executor: Arc<dyn Executor>,
    log: Logger,
}

impl Broker {
    /// Creates a broker with the standard wiring ([`BrokerConfig::default`]).
    pub fn new() -> Self {
        Self::from_config(BrokerConfig::default())
    }

    /// Creates a broker with the basic wiring: direct exact-type lookup.
    pub fn basic(executor: Arc<dyn Executor>) -> Self {
        Self::from_config(BrokerConfig::basic(executor))
    }

    /// Returns a builder starting from `cfg`.
    pub fn builder(cfg: BrokerConfig) -> BrokerBuilder {
        BrokerBuilder::new(cfg)
    }

    /// Creates a broker from an explicit configuration.
    pub fn from_config(cfg: BrokerConfig) -> Self {
        let log = Logger::new("broker", cfg.log);
        Self {
            store: Arc::new(WeakMultiMap::new(log.for_component("registrations"))),
            matching: cfg.matching,
            executor: cfg.executor,
            log,
        }
    }

    /// Registers `handler` for messages matching `message_type`.
    ///
    /// The broker only keeps a weak reference: the registration lives exactly
    /// as long as the returned [`Subscription`].
    pub async fn register(&self, message_type: MessageType, handler: HandlerRef) -> Subscription {
        self.log.trace(format_args!(
            "registering handler '{}' for {}",
            handler.name(),
            message_type
        ));
        let registration = Arc::new(Registration::new(message_type.clone(), handler));
        self.store.add(message_type, &registration).await;
        Subscription::new(
            registration,
            Arc::downgrade(&self.store),
            self.log.for_component("subscription"),
        )
    }

    /// Registers an async closure receiving messages of type `T`.
    ///
    /// Subtype messages reach the closure through the upcast declared with
    /// [`MessageType::supertype`]. Subtypes that only declare `T` as a marker
    /// (via [`MessageType::of`]) fail with [`HandlerError::TypeMismatch`];
    /// register an erased [`HandlerFn`] to receive those.
    pub async fn register_fn<T, F, Fut>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> Subscription
    where
        T: Message,
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.register(MessageType::of::<T>(), HandlerFn::typed(name, f))
            .await
    }

    /// Delivers `message` to every live, compatible handler.
    pub async fn send<M: Message>(&self, message: M) -> Result<(), HandlerError> {
        self.send_ref(Arc::new(message)).await
    }

    /// Delivers an already shared message.
    ///
    /// Returns `Ok(())` without invoking the executor when nothing matches.
    pub async fn send_ref(&self, message: MessageRef) -> Result<(), HandlerError> {
        let handlers = self.snapshot(&message.message_type()).await;
        if handlers.is_empty() {
            self.log
                .debug(format_args!("{message:?} has no handlers, ignoring"));
            return Ok(());
        }

        self.log.info(format_args!(
            "broadcasting {message:?} to {} handlers using {}",
            handlers.len(),
            self.executor.name()
        ));
        self.executor.execute(message, handlers).await
    }

    /// Number of message types with at least one (not yet purged) registration.
    pub async fn registered_types(&self) -> usize {
        self.store.len().await
    }

    /// Resolves the handlers of `message_type` into an immutable snapshot.
    ///
    /// The registrations are upgraded only for the copy; the snapshot holds
    /// handlers, never registrations.
    async fn snapshot(&self, message_type: &MessageType) -> HandlerList {
        let registrations = match &self.matching {
            Matching::Direct => self.store.get(message_type).await,
            Matching::Discriminator(d) => {
                self.store
                    .get_matching(|registered| d.is_compatible(message_type, registered))
                    .await
            }
        };

        registrations
            .iter()
            .map(|r| Arc::clone(r.handler()))
            .collect()
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broker")
            .field("matching", &self.matching)
            .field("executor", &self.executor.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminators::{DiscriminatorFn, ExactType};
    use crate::executors::{ExecutorFn, ParallelExecutor, SequentialExecutor};
    use crate::logging::LogLevel;
    use crate::logging::sink::testing::MemorySink;
    use crate::policies::{SequentialPolicy, Swallow};
    use futures::FutureExt;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::{Barrier, Notify};

    #[derive(Debug)]
    struct Animal;
    impl Message for Animal {}

    #[derive(Debug)]
    struct Dog;
    impl Message for Dog {
        fn supertypes() -> Vec<MessageType> {
            vec![MessageType::supertype(|_d: Arc<Dog>| Arc::new(Animal))]
        }
    }

    #[derive(Debug)]
    struct Rock;
    impl Message for Rock {}

    fn counter(name: &'static str, hits: &Arc<AtomicUsize>) -> HandlerRef {
        let hits = Arc::clone(hits);
        HandlerFn::arc(name, move |_m: MessageRef| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> HandlerRef {
        let log = Arc::clone(log);
        HandlerFn::arc(name, move |_m: MessageRef| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(name);
                Ok(())
            }
        })
    }

    fn failing(name: &'static str, reason: &'static str) -> HandlerRef {
        HandlerFn::arc(name, move |_m: MessageRef| async move { Err(HandlerError::msg(reason)) })
    }

    fn counting_executor(calls: &Arc<AtomicUsize>) -> Arc<dyn Executor> {
        let calls = Arc::clone(calls);
        Arc::new(ExecutorFn::new(move |m: MessageRef, h: HandlerList| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                for handler in h.iter() {
                    handler.handle(m.clone()).await?;
                }
                Ok(())
            }
        }))
    }

    #[tokio::test]
    async fn test_exact_matching_ignores_subtypes() {
        let broker = Broker::builder(BrokerConfig::default())
            .with_discriminator(Arc::new(ExactType))
            .build();
        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;

        broker.send(Dog).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_assignable_matching_delivers_subtypes() {
        let broker = Broker::new();
        let animal_hits = Arc::new(AtomicUsize::new(0));
        let dog_hits = Arc::new(AtomicUsize::new(0));
        let _a = broker
            .register(MessageType::of::<Animal>(), counter("animal", &animal_hits))
            .await;
        let _d = broker
            .register(MessageType::of::<Dog>(), counter("dog", &dog_hits))
            .await;

        broker.send(Dog).await.unwrap();
        assert_eq!(animal_hits.load(Ordering::SeqCst), 1);
        assert_eq!(dog_hits.load(Ordering::SeqCst), 1);

        broker.send(Animal).await.unwrap();
        assert_eq!(animal_hits.load(Ordering::SeqCst), 2);
        assert_eq!(dog_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_basic_wiring_uses_exact_lookup() {
        let broker = Broker::basic(Arc::new(SequentialExecutor::default()));
        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;

        broker.send(Dog).await.unwrap();
        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;

        sub.unsubscribe().await;
        assert!(sub.is_unsubscribed());
        broker.send(Animal).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(broker.registered_types().await, 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;
        let _other = broker
            .register(MessageType::of::<Animal>(), counter("other", &hits))
            .await;

        sub.unsubscribe().await;
        sub.unsubscribe().await;
        broker.send(Animal).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_after_broker_dropped_is_noop() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;
        drop(broker);

        sub.unsubscribe().await;
        assert!(sub.is_unsubscribed());
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let sink = Arc::new(MemorySink::default());
        let broker = Broker::builder(BrokerConfig::default())
            .with_log(sink.clone())
            .build();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;
        drop(sub);

        broker.send(Animal).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(broker.registered_types().await, 0);
        assert!(sink.contains(LogLevel::Info, "purged 1 dropped registrations"));
    }

    #[tokio::test]
    async fn test_empty_match_skips_executor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::new(MemorySink::default());
        for cfg in [
            BrokerConfig::default(),
            BrokerConfig::basic(Arc::new(SequentialExecutor::default())),
        ] {
            let broker = Broker::builder(cfg)
                .with_executor(counting_executor(&calls))
                .with_log(sink.clone())
                .build();
            let hits = Arc::new(AtomicUsize::new(0));
            let _sub = broker
                .register(MessageType::of::<Animal>(), counter("animal", &hits))
                .await;

            broker.send(Rock).await.unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }
        assert!(sink.contains(LogLevel::Debug, "has no handlers, ignoring"));
    }

    #[tokio::test]
    async fn test_executor_runs_on_match() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::new(MemorySink::default());
        let broker = Broker::builder(BrokerConfig::default())
            .with_executor(counting_executor(&calls))
            .with_log(sink.clone())
            .build();
        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;

        broker.send(Dog).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(sink.contains(LogLevel::Info, "to 1 handlers using delegate"));
    }

    #[tokio::test]
    async fn test_handler_runs_only_for_matching_registrations() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = counter("shared", &hits);
        let _a = broker
            .register(MessageType::of::<Animal>(), Arc::clone(&handler))
            .await;
        let _r = broker.register(MessageType::of::<Rock>(), handler).await;

        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        broker.send(Rock).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_handler_runs_once_per_registration() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = counter("twice", &hits);
        let first = broker
            .register(MessageType::of::<Animal>(), Arc::clone(&handler))
            .await;
        let _second = broker
            .register(MessageType::of::<Animal>(), Arc::clone(&handler))
            .await;
        let _dog = broker.register(MessageType::of::<Dog>(), handler).await;

        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        broker.send(Dog).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 5);

        first.unsubscribe().await;
        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_cancelled_unsubscribe_can_be_retried() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = broker
            .register(MessageType::of::<Animal>(), counter("animal", &hits))
            .await;

        {
            let _held = broker.store.read_guard().await;
            assert!(sub.unsubscribe().now_or_never().is_none());
        }
        assert!(!sub.is_unsubscribed());
        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        sub.unsubscribe().await;
        assert!(sub.is_unsubscribed());
        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_order_follows_registration() {
        let broker = Broker::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut subs = Vec::new();
        for name in ["first", "second", "third"] {
            subs.push(
                broker
                    .register(MessageType::of::<Animal>(), recorder(name, &order))
                    .await,
            );
        }

        broker.send(Animal).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_default_config_propagates_first_failure() {
        let broker = Broker::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let _a = broker
            .register(MessageType::of::<Animal>(), recorder("before", &order))
            .await;
        let _b = broker
            .register(MessageType::of::<Animal>(), failing("broken", "boom"))
            .await;
        let _c = broker
            .register(MessageType::of::<Animal>(), recorder("after", &order))
            .await;

        let err = broker.send(Animal).await.unwrap_err();

        assert_eq!(err.to_string(), "handler failed: boom");
        assert_eq!(*order.lock().unwrap(), vec!["before"]);
    }

    #[tokio::test]
    async fn test_stop_and_continue_with_swallow() {
        for (policy, expected) in [
            (SequentialPolicy::Stop, vec!["before"]),
            (SequentialPolicy::Continue, vec!["before", "after"]),
        ] {
            let executor = SequentialExecutor::new()
                .with_policy(policy)
                .with_failure_policy(Arc::new(Swallow::new()));
            let broker = Broker::builder(BrokerConfig::default())
                .with_executor(Arc::new(executor))
                .build();
            let order = Arc::new(Mutex::new(Vec::new()));
            let _a = broker
                .register(MessageType::of::<Animal>(), recorder("before", &order))
                .await;
            let _b = broker
                .register(MessageType::of::<Animal>(), failing("broken", "boom"))
                .await;
            let _c = broker
                .register(MessageType::of::<Animal>(), recorder("after", &order))
                .await;

            broker.send(Animal).await.unwrap();
            assert_eq!(*order.lock().unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_snapshot_ignores_registration_during_send() {
        let broker = Broker::new();
        let late_hits = Arc::new(AtomicUsize::new(0));
        let late_subs: Arc<Mutex<Vec<Subscription>>> = Arc::default();

        let registrar = {
            let broker = broker.clone();
            let late_hits = Arc::clone(&late_hits);
            let late_subs = Arc::clone(&late_subs);
            HandlerFn::arc("registrar", move |_m: MessageRef| {
                let broker = broker.clone();
                let late_hits = Arc::clone(&late_hits);
                let late_subs = Arc::clone(&late_subs);
                async move {
                    let sub = broker
                        .register(MessageType::of::<Animal>(), counter("late", &late_hits))
                        .await;
                    late_subs.lock().unwrap().push(sub);
                    Ok(())
                }
            })
        };
        let _r = broker.register(MessageType::of::<Animal>(), registrar).await;

        broker.send(Animal).await.unwrap();
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        broker.send(Animal).await.unwrap();
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_snapshot_survives_unsubscribe_during_send() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let victim = Arc::new(
            broker
                .register(MessageType::of::<Animal>(), counter("victim", &hits))
                .await,
        );
        // Registered second, so the victim is still ahead in the snapshot.
        let _killer = {
            let victim = Arc::clone(&victim);
            broker
                .register(
                    MessageType::of::<Animal>(),
                    HandlerFn::arc("killer", move |_m: MessageRef| {
                        let victim = Arc::clone(&victim);
                        async move {
                            victim.unsubscribe().await;
                            Ok(())
                        }
                    }),
                )
                .await
        };
        let _tail = broker
            .register(MessageType::of::<Animal>(), counter("tail", &hits))
            .await;

        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_starts_all_handlers() {
        let broker = Broker::builder(BrokerConfig::default())
            .with_executor(Arc::new(ParallelExecutor::new()))
            .build();
        // Each handler blocks until all three have started.
        let barrier = Arc::new(Barrier::new(3));
        let mut subs = Vec::new();
        for _ in 0..3 {
            let barrier = Arc::clone(&barrier);
            let h: HandlerRef = HandlerFn::arc("blocked", move |_m: MessageRef| {
                let barrier = Arc::clone(&barrier);
                async move {
                    barrier.wait().await;
                    Ok(())
                }
            });
            subs.push(broker.register(MessageType::of::<Animal>(), h).await);
        }

        tokio::time::timeout(Duration::from_secs(5), broker.send(Animal))
            .await
            .expect("all three handlers should run concurrently")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fire_and_forget_returns_before_handlers_finish() {
        let executors: [Arc<dyn Executor>; 2] = [
            Arc::new(SequentialExecutor::new().fire_and_forget(true)),
            Arc::new(ParallelExecutor::new().fire_and_forget(true)),
        ];
        for executor in executors {
            let broker = Broker::builder(BrokerConfig::default())
                .with_executor(executor)
                .build();
            let release = Arc::new(Notify::new());
            let done = Arc::new(Notify::new());
            let h: HandlerRef = {
                let release = Arc::clone(&release);
                let done = Arc::clone(&done);
                HandlerFn::arc("slow", move |_m: MessageRef| {
                    let release = Arc::clone(&release);
                    let done = Arc::clone(&done);
                    async move {
                        release.notified().await;
                        done.notify_one();
                        Ok(())
                    }
                })
            };
            let _sub = broker.register(MessageType::of::<Animal>(), h).await;

            tokio::time::timeout(Duration::from_secs(5), broker.send(Animal))
                .await
                .expect("send should not wait for the handler")
                .unwrap();

            release.notify_one();
            tokio::time::timeout(Duration::from_secs(5), done.notified())
                .await
                .expect("handler should complete in the background");
        }
    }

    #[tokio::test]
    async fn test_custom_discriminator() {
        let broker = Broker::builder(BrokerConfig::default())
            .with_discriminator(Arc::new(DiscriminatorFn::new(
                |_m: &MessageType, registered: &MessageType| {
                    *registered == MessageType::of::<Rock>()
                },
            )))
            .build();
        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = broker
            .register(MessageType::of::<Rock>(), counter("catch-all", &hits))
            .await;

        broker.send(Animal).await.unwrap();
        broker.send(Dog).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_register_fn_for_supertype_receives_subtype() {
        let broker = Broker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let _sub = broker
            .register_fn("animal", move |_a: Arc<Animal>| {
                let h = Arc::clone(&h);
                async move {
                    h.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await;

        broker.send(Dog).await.unwrap();
        broker.send(Animal).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_register_fn_receives_typed_message() {
        let broker = Broker::new();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let s = Arc::clone(&seen);
        let _sub = broker
            .register_fn("typed", move |d: Arc<Dog>| {
                let s = Arc::clone(&s);
                async move {
                    s.lock().unwrap().push(format!("{d:?}"));
                    Ok(())
                }
            })
            .await;

        broker.send(Dog).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["Dog".to_string()]);
    }
}
