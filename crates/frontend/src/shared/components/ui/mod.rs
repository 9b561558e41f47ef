pub mod badge;
pub mod button;
pub mod fields;

pub use badge::{order_status_class, Badge, EnabledBadge};
pub use button::{Button, ButtonVariant};
pub use fields::{NumberField, SelectField, TextAreaField, TextField};
