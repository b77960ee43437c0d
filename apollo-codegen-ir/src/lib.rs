//! Builds the intermediate representation (IR) GraphQL client code generators work from.
//!
//! Given a validated [`Schema`] and the [`ExecutableDocument`]s of a client, the IR describes
//! every operation and named fragment as a tree of fields and field sets in which directives are
//! interpreted, values are coerced and types are resolved. The schema's enums, input objects and
//! custom scalars that the documents use are listed alongside.
//!
//! ```ignore
//! let ir = apollo_codegen_ir::build_ir(&schema, &document, IrConfig::default())?;
//! for operation in &ir.operations {
//!     println!("{}", operation.source_with_fragments);
//! }
//! ```

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

mod builder;
mod coercion;
pub mod conditions;
mod config;
pub mod error;
mod field_set;
pub mod ir;
mod possible_types;
mod used_types;
pub(crate) mod utils;
mod variables;

use apollo_compiler::ExecutableDocument;
use apollo_compiler::Schema;
use apollo_compiler::validation::Valid;

pub use crate::builder::IrBuilder;
pub use crate::config::IrConfig;
use crate::error::IrError;
use crate::ir::IntermediateRepresentation;

/// Builds the IR of the operations and fragments of a single document.
///
/// # Errors
///
/// See [`IrBuilder::build`].
pub fn build_ir(
    schema: &Valid<Schema>,
    document: &ExecutableDocument,
    config: IrConfig,
) -> Result<IntermediateRepresentation, IrError> {
    IrBuilder::new(schema, config).document(document).build()
}
