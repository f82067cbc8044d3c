use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::{GeoError, IdentityError, TimerOutput};
use crate::cart::{Product, Voucher};
use crate::model::{AuthSession, Language};
use crate::navigation::{Destination, Driver, NotificationToast, Page, Vehicle, Vendor};
use crate::ProductId;

/// Credential wrapper that redacts Debug output.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

// Large variants boxed to keep the enum small.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub enum Event {
    // Lifecycle
    #[default]
    AppStarted,
    BootstrapCompleted(Box<Result<AuthSession, IdentityError>>),

    // Language & location modal
    LanguageSelected {
        language: Language,
    },
    LocationModalOpened,
    LocationModalClosed,

    // Verification wizard
    WizardLocationChanged {
        text: String,
    },
    WizardPhoneChanged {
        text: String,
    },
    WizardOtpChanged {
        text: String,
    },
    WizardLocationSubmitted,
    WizardSteppedBack,
    WizardOtpSubmitted,
    WizardUseCurrentLocation,
    WizardGeocodeCompleted(Box<Result<String, GeoError>>),

    // Auth
    SignInRequested {
        email: String,
        password: Secret,
    },
    SignInCompleted(Box<Result<AuthSession, IdentityError>>),
    SignUpRequested {
        email: String,
        password: Secret,
        name: Option<String>,
    },
    SignUpCompleted(Box<Result<AuthSession, IdentityError>>),
    SignOutRequested,
    SignOutCompleted(Box<Result<(), IdentityError>>),

    // Navigation
    NavigatedTo {
        page: Page,
    },
    VendorSelected(Box<Vendor>),
    DestinationSelected(Box<Destination>),
    VehicleSelectedForReviews(Box<Vehicle>),
    DriverSelectedForProfile(Box<Driver>),
    LiveStreamOpened {
        vendor: Box<Vendor>,
        voucher: Option<Voucher>,
    },

    // Notifications & profile-image modal
    NotificationShown(Box<NotificationToast>),
    NotificationHidden,
    ProfileImageOpened {
        url: String,
    },
    ProfileImageClosed,

    // Cart
    CartQuantityUpdated {
        product: Box<Product>,
        quantity: i32,
        voucher: Option<Voucher>,
    },
    CartItemRemoved {
        product_id: ProductId,
    },
    CartCleared,
    GuestRewardActivated,

    // Timers
    TimerElapsed(TimerOutput),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_debug_is_redacted() {
        let s = Secret::new("super_secret");
        assert_eq!(format!("{s:?}"), "[REDACTED]");
    }

    #[test]
    fn event_size_is_reasonable() {
        // Ensure boxing keeps the enum small.
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 128,
            "Event enum is {size} bytes, box more variants"
        );
    }
}
