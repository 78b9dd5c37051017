//! Output of outline records: JSON rendering and contract validation.

mod json;
pub mod validate;

pub use json::{from_json, to_json, write_json, JsonFormat};
pub use validate::{validate_outline, OutlineValidator, ValidationReport, DEFAULT_MAX_PAGE};
