//! idlgate
//!
//! The bridge facade offered to a transport layer: compile an IDL schema
//! once, then validate named-topic JSON payloads against it from any number
//! of threads.
//!
//! - `Bridge::from_source` compiles and publishes the first registry
//!   snapshot,
//! - `Bridge::validate` / `list_topics` / `schema_document` are pure reads
//!   against the current snapshot,
//! - `Bridge::reload` builds a complete replacement registry off to the side
//!   and swaps it in atomically; in-flight validations keep the snapshot
//!   they started with.
//!
//! ```
//! use idlgate::Bridge;
//! use serde_json::json;
//!
//! let bridge = Bridge::from_source("struct Pose { float x; boolean valid; };").unwrap();
//! let value = bridge.validate("Pose", &json!({"x": 1.5, "valid": true})).unwrap();
//! assert_eq!(value.to_json(), json!({"x": 1.5, "valid": true}));
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value as JsonValue;
use tracing::info;

pub use idlgate_compiler::{compile_schema, CompileError};
pub use idlgate_schema::{
    SchemaNode, SchemaRegistry, StructDefinition, UnknownFieldPolicy, ValidatedValue,
    ValidationError, Validator,
};

pub mod error {
    pub use idlgate_compiler::error::CompileError;
    pub use idlgate_schema::ValidationError;
}

pub mod schema {
    pub use idlgate_schema::{Primitive, SchemaNode, SchemaRegistry, StructDefinition};
}

/// Compile-then-validate bridge over a shared registry snapshot.
pub struct Bridge {
    registry: RwLock<Arc<SchemaRegistry>>,
    policy: UnknownFieldPolicy,
}

impl Bridge {
    /// Compiles `source` and publishes the resulting registry.
    pub fn from_source(source: &str) -> Result<Self, CompileError> {
        Bridge::from_source_with_policy(source, UnknownFieldPolicy::default())
    }

    pub fn from_source_with_policy(
        source: &str,
        policy: UnknownFieldPolicy,
    ) -> Result<Self, CompileError> {
        let registry = compile_schema(source)?;
        info!(topics = registry.len(), "published schema registry");
        Ok(Bridge {
            registry: RwLock::new(Arc::new(registry)),
            policy,
        })
    }

    /// Rebuilds the registry from `source` and swaps it in atomically.
    ///
    /// The new registry is built entirely off to the side; on any compile
    /// error the previously published snapshot stays in place.
    pub fn reload(&self, source: &str) -> Result<(), CompileError> {
        let next = Arc::new(compile_schema(source)?);
        let topics = next.len();
        *self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
        info!(topics, "reloaded schema registry");
        Ok(())
    }

    /// The current registry snapshot. The returned `Arc` stays valid across
    /// reloads, so validation against it needs no locking.
    pub fn snapshot(&self) -> Arc<SchemaRegistry> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validates `payload` against the struct registered under `topic`.
    pub fn validate(
        &self,
        topic: &str,
        payload: &JsonValue,
    ) -> Result<ValidatedValue, Vec<ValidationError>> {
        let snapshot = self.snapshot();
        Validator::with_policy(&snapshot, self.policy).validate(topic, payload)
    }

    /// Topic names in registration order.
    pub fn list_topics(&self) -> Vec<String> {
        self.snapshot().list_names()
    }

    /// The canonical JSON-Schema-like document for the current snapshot.
    pub fn schema_document(&self) -> JsonValue {
        self.snapshot().to_document()
    }
}
