use crate::application::errors::StorageError;

/// Store trait - whole-document persistence for plugin state
///
/// Reads never fail: a missing or unreadable document comes back as
/// `T::default()` and the problem is logged by the implementation.
pub trait Store<T>: Send + Sync {
    fn load(&self) -> T;

    fn save(&self, document: &T) -> Result<(), StorageError>;
}

impl<T, S> Store<T> for std::sync::Arc<S>
where
    S: Store<T> + ?Sized,
{
    fn load(&self) -> T {
        (**self).load()
    }

    fn save(&self, document: &T) -> Result<(), StorageError> {
        (**self).save(document)
    }
}
