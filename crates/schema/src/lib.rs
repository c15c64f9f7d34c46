//! # Scout Schema
//!
//! Schema identifiers, definitions, and the registry used by the discovery
//! engine to classify project artifact files.
//!
//! A schema identifier is a namespaced, optionally versioned tag a file can
//! self-declare to announce its logical role:
//!
//! ```text
//! ai-coding/progress-log@1.0
//! └───┬───┘ └─────┬────┘ └┬┘
//! namespace     name    version (optional)
//! ```
//!
//! The registry is a plain value handed to the scanner and validator;
//! there is no process-wide catalog.

mod definition;
mod id;
mod registry;

pub use definition::{CarrierKind, SchemaDefinition, SchemaScope};
pub use id::{base_id, parse_id, validate_format, ParsedSchemaId};
pub use registry::SchemaRegistry;
