//! Shared model and form engine for schema-driven forms.
//!
//! - [`model`]: the schema (`FieldDescriptor`, `FieldKind`), field values and
//!   the wire types exchanged with the server.
//! - [`engine`]: everything that interprets a schema: validation, form state,
//!   the renderer plan, the upload protocol, the submission controller and the
//!   diagnostics channel.
//!
//! Both the browser frontend and the server depend on this crate so the JSON
//! shapes they exchange are defined once.

pub mod engine;
pub mod model;
