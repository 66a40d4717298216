use serde::{Serialize, Deserialize, Serializer};
use std::fmt;

/// Holds a sensitive value (an email address, typically) so that formatting it
/// through Debug or Display yields a fixed mask instead of the data.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    /// Borrow the real value.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Unwrap the real value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Masked(value)
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // API responses carry the real value; the mask only guards log macros
        // such as tracing::info!("{:?}", session).
        self.0.serialize(serializer)
    }
}
