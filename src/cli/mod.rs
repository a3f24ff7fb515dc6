//! Command-line interface
mod options;
mod session;

pub use options::Options;

/// Update a value from another value.
pub trait Update<T> {
    fn update(&mut self, source: T);
}

/// Update a value, returning the result.
pub trait WithUpdate<T> {
    #[must_use]
    fn with_update(self, source: T) -> Self;
}

impl<T, U: Update<T>> WithUpdate<T> for U {
    fn with_update(mut self, source: T) -> Self {
        self.update(source);
        self
    }
}
