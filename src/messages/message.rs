//! # Messages and type tokens.
//!
//! Any `'static + Send + Sync + Debug` type becomes a message by implementing
//! [`Message`]. The broker never sees the concrete type: it works with
//! [`MessageRef`] (`Arc<dyn AnyMessage>`) and the message's runtime
//! [`MessageType`] token.
//!
//! ## Type hierarchy
//! Rust has no class inheritance, so polymorphic delivery is declared
//! explicitly: [`Message::supertypes`] lists the tokens a message type is
//! assignable to. A supertype can be another message type or a marker type
//! standing in for an "interface".
//!
//! ```text
//! Circle ──supertypes──► Shape ──supertypes──► Drawable
//!
//! MessageType::of::<Circle>().is_assignable_to(&MessageType::of::<Drawable>()) == true
//! MessageType::of::<Shape>().is_assignable_to(&MessageType::of::<Circle>())    == false
//! ```
//!
//! A supertype declared with [`MessageType::supertype`] also carries an
//! upcast, so typed handlers of the parent receive a converted value. One
//! declared with [`MessageType::of`] only affects matching.
//!
//! Tokens are built once per type and cached; the hierarchy must be acyclic.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakbus::{Message, MessageType};
//!
//! #[derive(Debug)]
//! struct Shape { sides: u32 }
//! impl Message for Shape {}
//!
//! #[derive(Debug)]
//! struct Circle { radius: f64 }
//! impl Message for Circle {
//!     fn supertypes() -> Vec<MessageType> {
//!         vec![MessageType::supertype(|_c: Arc<Circle>| Arc::new(Shape { sides: 0 }))]
//!     }
//! }
//!
//! let circle = MessageType::of::<Circle>();
//! assert!(circle.is_assignable_to(&MessageType::of::<Shape>()));
//! assert!(!MessageType::of::<Shape>().is_assignable_to(&circle));
//!
//! let shape: Arc<Shape> = circle.upcast(Arc::new(Circle { radius: 1.0 })).unwrap();
//! assert_eq!(shape.sides, 0);
//! ```

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// A value that can be sent through a [`Broker`](crate::Broker).
pub trait Message: Any + Send + Sync + fmt::Debug {
    /// Types this message is assignable to, besides itself.
    ///
    /// Only consulted by [`AssignableType`](crate::AssignableType) matching
    /// and by typed handlers looking for an upcast. Default: none.
    ///
    /// Called once per type; the result is cached in the type's token.
    ///
    /// # Panics
    /// The declared graph must be acyclic: a type reachable from its own
    /// supertypes makes [`MessageType::of`] panic.
    fn supertypes() -> Vec<MessageType>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Object-safe view of a [`Message`], implemented for every message type.
pub trait AnyMessage: Any + Send + Sync + fmt::Debug {
    /// Runtime type token of this message.
    fn message_type(&self) -> MessageType;

    /// Borrows the message as `dyn Any` for downcasting.
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// Converts the shared message into `Arc<dyn Any>` for owned downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Message> AnyMessage for T {
    fn message_type(&self) -> MessageType {
        MessageType::of::<T>()
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl dyn AnyMessage {
    /// Returns the message as `&T` if its runtime type is exactly `T`.
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// True if the runtime type of the message is exactly `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Shared, type-erased message as handed to executors and handlers.
pub type MessageRef = Arc<dyn AnyMessage>;

type ErasedArc = Arc<dyn Any + Send + Sync>;

/// Erased conversion from a subtype value to its supertype value.
type Upcast = Arc<dyn Fn(ErasedArc) -> Option<ErasedArc> + Send + Sync>;

/// Type identity token used as the registration key.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for logs and
/// the supertypes for [`MessageType::is_assignable_to`].
#[derive(Clone)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
    supertypes: Arc<[MessageType]>,
    /// Set when this token is a supertype edge declared with an upcast.
    upcast: Option<Upcast>,
}

impl MessageType {
    /// Token for the message type `T`.
    ///
    /// # Panics
    /// If `T`'s declared supertypes lead back to `T`.
    pub fn of<T: Message>() -> Self {
        let id = TypeId::of::<T>();
        if let Some(ty) = tokens().read().unwrap_or_else(PoisonError::into_inner).get(&id) {
            return ty.clone();
        }

        let built = {
            let _building = CycleGuard::enter(id, type_name::<T>());
            Self {
                id,
                name: type_name::<T>(),
                supertypes: T::supertypes().into(),
                upcast: None,
            }
        };
        tokens()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert(built)
            .clone()
    }

    /// Supertype `S` of `T`, reached from a `T` value through `upcast`.
    ///
    /// Use it in [`Message::supertypes`]; typed handlers registered for `S`
    /// then receive the converted value instead of failing with
    /// [`TypeMismatch`](crate::HandlerError::TypeMismatch).
    pub fn supertype<T, S, F>(upcast: F) -> Self
    where
        T: Message,
        S: Message,
        F: Fn(Arc<T>) -> Arc<S> + Send + Sync + 'static,
    {
        let mut ty = Self::of::<S>();
        let convert: Upcast = Arc::new(move |value: ErasedArc| -> Option<ErasedArc> {
            let value = value.downcast::<T>().ok()?;
            let parent: ErasedArc = upcast(value);
            Some(parent)
        });
        ty.upcast = Some(convert);
        ty
    }

    /// Underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Directly declared supertypes.
    pub fn supertypes(&self) -> &[MessageType] {
        &self.supertypes
    }

    /// True if a value of this type may be delivered to a handler registered
    /// for `target`: the types are equal or `target` is reachable through the
    /// declared supertypes.
    pub fn is_assignable_to(&self, target: &MessageType) -> bool {
        self == target || self.supertypes.iter().any(|s| s.is_assignable_to(target))
    }

    /// Converts `value`, an instance of this type, into a `T`.
    ///
    /// Succeeds when the value is a `T` or when `T` is reachable through
    /// supertypes that all carry an upcast; the first such path wins.
    pub fn upcast<T: Message>(&self, value: Arc<dyn Any + Send + Sync>) -> Option<Arc<T>> {
        match value.downcast::<T>() {
            Ok(found) => Some(found),
            Err(value) => self.supertypes.iter().find_map(|parent| {
                let convert = parent.upcast.as_ref()?;
                parent.upcast::<T>(convert(Arc::clone(&value))?)
            }),
        }
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Process-wide token cache.
fn tokens() -> &'static RwLock<HashMap<TypeId, MessageType>> {
    static TOKENS: OnceLock<RwLock<HashMap<TypeId, MessageType>>> = OnceLock::new();
    TOKENS.get_or_init(Default::default)
}

thread_local! {
    /// Types whose token is being built on this thread, outermost first.
    static BUILDING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Marks a type as under construction; panics on re-entry.
struct CycleGuard;

impl CycleGuard {
    fn enter(id: TypeId, name: &'static str) -> Self {
        let cyclic = BUILDING.with(|building| {
            let mut building = building.borrow_mut();
            if building.contains(&id) {
                return true;
            }
            building.push(id);
            false
        });
        if cyclic {
            panic!("cyclic supertype declaration: {name} is its own supertype");
        }
        CycleGuard
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        BUILDING.with(|building| {
            building.borrow_mut().pop();
        });
    }
}
