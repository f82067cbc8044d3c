#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod cart;
pub mod content;
pub mod event;
pub mod model;
pub mod navigation;
pub mod wizard;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use app::{App, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::Model;

/// How long a notification toast stays visible before auto-hiding.
pub const TOAST_AUTO_HIDE_MS: u64 = 5_000;
/// Delay between closing the profile-image modal and clearing its url,
/// so the close transition doesn't pop.
pub const PROFILE_IMAGE_CLEAR_DELAY_MS: u64 = 300;
/// Guest reward lifetime: 48 hours from activation.
pub const GUEST_REWARD_DURATION_MS: u64 = 48 * 60 * 60 * 1_000;
/// Poll cadence for reward expiry while a reward is active.
pub const REWARD_POLL_INTERVAL_MS: u64 = 60_000;
/// Blanket discount applied to the cart total while a reward is active.
pub const GUEST_REWARD_MULTIPLIER: f64 = 0.95;
/// Minimum digit count for a phone number to pass wizard validation.
pub const MIN_PHONE_DIGITS: usize = 9;
/// Fixed international prefix applied when a confirmed phone is recorded.
pub const PHONE_COUNTRY_PREFIX: &str = "+62";
/// Inclusive bounds of the generated one-time code.
pub const OTP_MIN: u32 = 1_000;
pub const OTP_MAX: u32 = 9_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Network,
    Location,
    LocationPermissionDenied,
    Geocoding,
    NotFound,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTH_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Location => "LOCATION_ERROR",
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::Geocoding => "GEOCODING_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::Authentication => {
                "Sign in failed. Please check your email and password.".into()
            }
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Location => {
                "Unable to determine your location. Please check your GPS settings.".into()
            }
            ErrorKind::LocationPermissionDenied => {
                "Location access is required. Please enable location permissions in Settings."
                    .into()
            }
            ErrorKind::Geocoding => {
                "We couldn't find an address for your location. Please type it in.".into()
            }
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Internal | ErrorKind::Unknown => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("phone number must contain at least {min} digits")]
    PhoneTooShort { min: usize },
    #[error("one-time code does not match")]
    OtpMismatch,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(UserId);
typed_id!(ProductId);
typed_id!(VendorId);
typed_id!(DestinationId);
typed_id!(VehicleId);
typed_id!(DriverId);
typed_id!(VoucherId);
typed_id!(SessionId);

/// Explicit timestamp unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub fn now() -> Self {
        Self(get_current_time_ms())
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn add_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }
}

#[must_use]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_round_trip() {
        let err = AppError::new(ErrorKind::Validation, "phone too short");
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.user_facing_message(), "phone too short");
    }

    #[test]
    fn non_validation_errors_get_generic_copy() {
        let err = AppError::new(ErrorKind::Network, "ECONNRESET");
        assert!(!err.user_facing_message().contains("ECONNRESET"));
    }

    #[test]
    fn typed_ids_are_not_interchangeable() {
        let product = ProductId::new("abc");
        let vendor = VendorId::new("abc");
        // Different types — mixing them is a compile error. This test
        // exists as documentation; the compiler enforces it.
        assert_eq!(product.as_str(), vendor.as_str());
    }

    #[test]
    fn unix_time_ordering() {
        let earlier = UnixTimeMs(1_000);
        let later = earlier.add_millis(500);
        assert!(later.is_after(earlier));
        assert!(!earlier.is_after(later));
        assert!(!earlier.is_after(earlier));
    }
}
