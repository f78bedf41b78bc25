//! Taxi fleet record forms
//!
//! Driver and car forms expressed as plain field declarations, together with
//! the driver license-number rule.

pub mod domain;
pub use domain::{
    Car, Config, Driver, InvalidLicenseNumber, LicenseNumber, Manufacturer, NewDriver,
    validate_license_number,
};

/// Form declarations and submission cleaning.
pub mod forms;
pub use forms::{CarForm, DriverCreateForm, DriverLicenseUpdateForm, Form, FormData, FormErrors};
