//! Constructor factory for application-defined error kinds.
//!
//! A [`FaultClass`] is a reusable constructor value: it fixes a kind name
//! and machine code, and optionally an initializer that populates extra
//! fields from construction arguments. Pairing a class with
//! [`FaultClass::into_reviver`] registers the kind in a
//! [`VariantRegistry`], so applications extend the taxonomy without
//! touching the serializer/deserializer core.
//!
//! ```
//! use faultwire::{FaultClass, VariantRegistry, parse_with, stringify};
//! use serde_json::json;
//!
//! let class = FaultClass::new("QuotaError").with_code("ERR_QUOTA");
//! let registry = VariantRegistry::builtin()
//!     .with_variant(class.name().to_owned(), class.clone().into_reviver());
//!
//! let raised = class.build("limit exceeded", &[json!(42)]);
//! let text = stringify(&raised).unwrap();
//! let revived = parse_with(&text, &registry).unwrap();
//! assert_eq!(revived.name(), "QuotaError");
//! ```

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use serde_json::Value;

use crate::fault::Fault;
use crate::record::{Code, ErrorRecord};
use crate::revive::VariantRegistry;

type Initializer = Arc<dyn Fn(&mut Fault, &[Value]) + Send + Sync>;

/// A reusable constructor for a custom error kind.
#[derive(Clone)]
pub struct FaultClass {
    name: String,
    code: Option<Code>,
    initializer: Option<Initializer>,
}

impl Debug for FaultClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultClass")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("initializer", &self.initializer.is_some())
            .finish()
    }
}

impl Default for FaultClass {
    /// A class producing plain `Error` faults with no code.
    fn default() -> Self {
        Self::new("Error")
    }
}

impl FaultClass {
    /// Creates a class producing faults with the given kind name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            initializer: None,
        }
    }

    /// Builder-style method: fixes the machine code of every instance.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builder-style method: sets the field initializer.
    ///
    /// The initializer runs once per construction and receives the
    /// instance under construction plus the remaining arguments passed
    /// to [`build`](Self::build); it typically calls
    /// [`Fault::insert_field`].
    #[must_use]
    pub fn with_initializer<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&mut Fault, &[Value]) + Send + Sync + 'static,
    {
        self.initializer = Some(Arc::new(initializer));
        self
    }

    /// The kind name instances carry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The machine code instances carry, if fixed.
    #[must_use]
    pub const fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    /// Constructs an instance.
    ///
    /// The kind name and code are fixed by the class; `args` is handed
    /// to the initializer, if one was set. Never fails.
    #[must_use]
    pub fn build(&self, message: impl Into<String>, args: &[Value]) -> Fault {
        let mut fault = Fault::named(self.name.clone(), message);
        fault.code = self.code.clone();
        if let Some(initializer) = &self.initializer {
            initializer(&mut fault, args);
        }
        fault
    }

    /// Converts this class into a reviver for [`VariantRegistry::with_variant`].
    ///
    /// The reviver reconstructs instances from their transport record;
    /// record-supplied fields fill in behind whatever the class fixes
    /// (first-write-wins, like every other kind).
    #[must_use]
    pub fn into_reviver(
        self,
    ) -> impl Fn(&ErrorRecord, &VariantRegistry) -> Fault + Send + Sync + 'static {
        move |record, _registry| self.build(record.message.clone(), &[])
    }
}
