//! Validation options.
//!
//! Switches accepted by the validation entry point. Both default to off:
//! schemas stay open to undeclared properties and the document is checked
//! exactly as given.

/// Options for one validation call.
///
/// # Example
///
/// ```rust
/// use awesio_core::ValidationOptions;
///
/// let options = ValidationOptions::new()
///     .with_restrictive(true)
///     .with_defaults(true);
/// assert!(options.restrictive && options.defaults);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Close every object shape in the schema before checking
    /// (undeclared properties become violations)
    pub restrictive: bool,

    /// Back-fill absent properties with their schema defaults while validating
    pub defaults: bool,
}

impl ValidationOptions {
    /// Creates options with both switches off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets closed-world mode.
    pub fn with_restrictive(mut self, restrictive: bool) -> Self {
        self.restrictive = restrictive;
        self
    }

    /// Sets default-injection mode.
    pub fn with_defaults(mut self, defaults: bool) -> Self {
        self.defaults = defaults;
        self
    }
}
