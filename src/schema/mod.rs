//! # Internal Table Schema
//!
//! Arrow schemas of the two internal tables written by the converters: the
//! PSM table (one row per peptide-spectrum match) and the crosslink table
//! (one row per crosslinked peptide pair).
//!
//! Column names are upper-case (`RAW_FILE`, `MODIFIED_SEQUENCE`, ...) and are
//! exported as constants from [`columns`] and [`crosslink_columns`]. Readers
//! only require the minimal column set; converters may add engine-specific
//! nullable columns such as `RETENTION_TIME`.

mod builders;
pub mod columns;
pub mod crosslink_columns;
mod constants;
mod validation;

#[cfg(test)]
mod tests;

pub use builders::{
    create_crosslink_schema, create_crosslink_schema_arc, create_psm_schema,
    create_psm_schema_arc,
};
pub use constants::*;
pub use validation::{validate_crosslink_schema, validate_psm_schema, SchemaValidationError};
