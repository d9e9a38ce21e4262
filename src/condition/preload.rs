use std::marker::PhantomData;

/// Selects every column of `T`'s table so related rows are hydrated
///
/// Placed inside a join's conditions it makes that join fetch the related
/// entity; nested preloads also preload every relation on the way.
pub struct PreloadCondition<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> PreloadCondition<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for PreloadCondition<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PreloadCondition<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}
