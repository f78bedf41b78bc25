//! Domain models for the taxi fleet.
//!
//! This module contains the record types the forms produce, the
//! license-number rule, and configuration.

/// Driver license numbers and their validation rule.
pub mod license_number;
pub use license_number::{InvalidLicenseNumber, LicenseNumber, validate_license_number};

mod config;
pub use config::{Config, ConfigError};

mod driver;
pub use driver::{Driver, InvalidUsername, NewDriver, Username};

mod car;
pub use car::{Car, Manufacturer};
