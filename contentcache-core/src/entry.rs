use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Error type returned by a value's own disposal routine.
pub type DisposeError = Box<dyn std::error::Error + Send + Sync>;

/// Explicit cleanup for cached values that hold external resources.
///
/// Disposal is only ever invoked by the cache when a removal is flagged as
/// disposing. Implementations must not reach back into the asset store: the
/// store is mutably borrowed while `dispose` runs.
///
/// # Examples
///
/// ```
/// use contentcache_core::{Dispose, DisposeError};
///
/// struct Texture {
///     handle: Option<u32>,
/// }
///
/// impl Dispose for Texture {
///     fn dispose(&mut self) -> Result<(), DisposeError> {
///         self.handle.take().ok_or("texture already released")?;
///         Ok(())
///     }
/// }
/// ```
pub trait Dispose {
    fn dispose(&mut self) -> Result<(), DisposeError>;
}

/// Runtime type of a cached value.
///
/// Two `ValueType`s are equal when they describe the same Rust type; the
/// name is carried for logging and error messages only.
///
/// # Examples
///
/// ```
/// use contentcache_core::ValueType;
///
/// let ty = ValueType::of::<String>();
/// assert!(ty.is::<String>());
/// assert!(!ty.is::<u32>());
/// assert!(ty.name().ends_with("String"));
/// ```
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type DisposeFn = fn(&mut dyn Any) -> Result<(), DisposeError>;

fn dispose_as<T: Dispose + Any>(value: &mut dyn Any) -> Result<(), DisposeError> {
    match value.downcast_mut::<T>() {
        Some(value) => value.dispose(),
        None => Ok(()),
    }
}

/// A type-erased value stored in the asset store.
///
/// The entry records the value's runtime type and, for values created with
/// [`AssetEntry::disposable`], the routine used to release its resources.
///
/// # Examples
///
/// ```
/// use contentcache_core::{AssetEntry, ValueType};
///
/// let entry = AssetEntry::new(String::from("Hello"));
/// assert_eq!(entry.value_type(), ValueType::of::<String>());
/// assert_eq!(entry.downcast_ref::<String>().map(String::as_str), Some("Hello"));
/// assert!(!entry.is_disposable());
/// ```
pub struct AssetEntry {
    value: Box<dyn Any>,
    value_type: ValueType,
    dispose: Option<DisposeFn>,
}

impl AssetEntry {
    /// Wraps a value that holds no external resources.
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            value_type: ValueType::of::<T>(),
            dispose: None,
        }
    }

    /// Wraps a value whose [`Dispose`] implementation runs on disposing removal.
    pub fn disposable<T: Dispose + Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            value_type: ValueType::of::<T>(),
            dispose: Some(dispose_as::<T>),
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value_type.is::<T>()
    }

    pub fn is_disposable(&self) -> bool {
        self.dispose.is_some()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// Unwraps the entry back into its concrete value.
    pub fn into_inner<T: Any>(self) -> Result<T, Self> {
        let Self {
            value,
            value_type,
            dispose,
        } = self;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                value,
                value_type,
                dispose,
            }),
        }
    }

    /// Runs the value's disposal routine. A no-op for non-disposable entries.
    pub(crate) fn dispose(&mut self) -> Result<(), DisposeError> {
        match self.dispose {
            Some(dispose) => dispose(&mut *self.value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for AssetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetEntry")
            .field("value_type", &self.value_type)
            .field("disposable", &self.is_disposable())
            .finish()
    }
}
