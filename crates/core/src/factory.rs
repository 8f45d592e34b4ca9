//! Factory for new entity instances
//!
//! Produces empty, detached entities wrapped in the shared handle a
//! registry stores. Construction goes through `Default` and never fails;
//! types whose setup can fail expose a separate init step instead.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::traits::{entity_name, Entity};

/// Typed factory for `T`
pub struct Factory<T>(PhantomData<fn() -> T>);

impl<T: Default> Factory<T> {
    /// Construct a new default-initialized instance
    pub fn new_instance() -> Arc<T> {
        Arc::new(T::default())
    }
}

impl<T: Entity> Factory<T> {
    /// Static identifier of `T`, if it assigns one
    pub fn identifier() -> Option<&'static str> {
        T::IDENTIFIER
    }

    /// Diagnostic name of `T`
    pub fn name() -> &'static str {
        entity_name::<T>()
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Factory")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

/// Construct a new default-initialized instance of `T`
pub fn new_instance<T: Default>() -> Arc<T> {
    Factory::<T>::new_instance()
}
