//! Record creation and update forms.
//!
//! A form is a plain declaration: a list of [`FieldSpec`]s that a UI layer
//! can render, plus a `clean` operation that turns submitted [`FormData`]
//! into a typed record or a [`FormErrors`] map naming every offending field.

mod car;
mod data;
mod driver;
mod error;
/// Field declarations, widgets and validators.
pub mod field;

pub use car::CarForm;
pub use data::{FieldValue, FormData, InvalidFieldValue};
pub use driver::{DriverCreateForm, DriverLicenseUpdateForm};
pub use error::{FieldError, FormErrors, NON_FIELD_ERRORS};
pub use field::{Choice, FieldSpec, Validator, Widget};

/// A declarative input form.
pub trait Form {
    /// The record produced by a valid submission.
    type Output;

    /// The form's name, as used on the command line.
    fn name(&self) -> &'static str;

    /// The fields, in display order.
    fn fields(&self) -> Vec<FieldSpec>;

    /// Validates a submission.
    ///
    /// # Errors
    ///
    /// Returns every field error found; cleaning does not stop at the first
    /// invalid field.
    fn clean(&self, data: &FormData) -> Result<Self::Output, FormErrors>;
}
