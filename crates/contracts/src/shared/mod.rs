pub mod validation;

pub use validation::{FieldErrors, FieldSpec, Pattern, ValidationRules};
