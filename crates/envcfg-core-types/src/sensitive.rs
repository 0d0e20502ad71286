//! Sensitive data marker for automatic redaction
//!
//! `Sensitive<T>` keeps database passwords out of `Debug` output, log
//! fields and error messages.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use envcfg_core_types::Sensitive;
///
/// let password = Sensitive::new("yourpass");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.to_string(), "***REDACTED***");
///
/// // Access the actual value when needed
/// assert_eq!(password.expose(), &"yourpass");
/// ```
pub struct Sensitive<T>(T);

pub const REDACTED: &str = "***REDACTED***";

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    ///
    /// Only call this where the secret must leave the process, e.g. when
    /// handing credentials to the database driver.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: PartialEq> PartialEq for Sensitive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq> Eq for Sensitive<T> {}
