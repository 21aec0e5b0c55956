//! Component trait and runtime component kinds.

use std::any::TypeId;
use std::fmt;

/// Trait for data that can be attached to entities.
///
/// Components can be any `Send + Sync + 'static` type.
///
/// ```
/// use skein_ecs::Component;
///
/// struct Health(f32);
///
/// impl Component for Health {
///     const NAME: &'static str = "Health";
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// The struct name as a static string (e.g. `"Transform"`).
    const NAME: &'static str;

    fn component_name(&self) -> &'static str {
        Self::NAME
    }
}

/// Implements [`Component`] for types whose name is their type path.
macro_rules! impl_component {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $crate::Component for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )*
    };
}
pub(crate) use impl_component;

/// A component type known at runtime.
///
/// Lets callers pass heterogeneous lists of component types, e.g. the kinds
/// that exclude an entity from an operation.
#[derive(Clone, Copy)]
pub struct ComponentKind {
    type_id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentKind {}

impl std::hash::Hash for ComponentKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
