//! Two-step location + phone → OTP verification wizard gating app
//! initialization.
//!
//! The wizard owns only ephemeral state. Committing the confirmed location
//! and phone to the session (and prefixing the phone) is the session
//! layer's job; the wizard hands over the raw inputs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ValidationError, MIN_PHONE_DIGITS, OTP_MAX, OTP_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Location,
    Otp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationVerification {
    pub step: WizardStep,
    pub location_input: String,
    pub phone_input: String,
    pub otp_input: String,
    pub generated_code: Option<String>,
    pub error: Option<String>,
    /// True while a geolocation/geocoding request is in flight.
    pub locating: bool,
}

impl LocationVerification {
    /// Reset applied every time the modal opens. Step, error, and the typed
    /// code are reset; previously typed location and phone text survive.
    pub fn reset_for_open(&mut self) {
        self.step = WizardStep::Location;
        self.error = None;
        self.otp_input.clear();
        self.locating = false;
    }

    #[must_use]
    pub fn phone_digit_count(&self) -> usize {
        self.phone_input.chars().filter(char::is_ascii_digit).count()
    }

    fn validate_location_step(&self) -> Result<(), ValidationError> {
        if self.location_input.trim().is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        if self.phone_digit_count() < MIN_PHONE_DIGITS {
            return Err(ValidationError::PhoneTooShort {
                min: MIN_PHONE_DIGITS,
            });
        }
        Ok(())
    }

    /// Location → Otp transition. Validation runs before any code is
    /// generated; a fresh code is generated on every successful advance,
    /// invalidating any prior one.
    pub fn submit_location<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if let Err(e) = self.validate_location_step() {
            self.error = Some(e.to_string());
            return false;
        }
        self.generated_code = Some(generate_otp(rng));
        self.step = WizardStep::Otp;
        self.error = None;
        true
    }

    /// Otp → Location, discarding the in-progress code and typed input.
    pub fn step_back(&mut self) {
        self.step = WizardStep::Location;
        self.generated_code = None;
        self.otp_input.clear();
        self.error = None;
    }

    /// Exact string comparison against the generated code. On failure the
    /// code stays valid and the typed input is kept for correction.
    pub fn verify_otp(&mut self) -> bool {
        let matches = self.step == WizardStep::Otp
            && self
                .generated_code
                .as_deref()
                .is_some_and(|code| code == self.otp_input);
        if matches {
            self.error = None;
        } else {
            self.error = Some(ValidationError::OtpMismatch.to_string());
        }
        matches
    }

    /// Applies a reverse-geocoded address to the location field. Callers
    /// must have already discarded stale results (wizard closed or past the
    /// location step).
    pub fn apply_geocoded_address(&mut self, address: String) {
        self.location_input = address;
        self.locating = false;
        self.error = None;
    }

    pub fn geolocation_failed(&mut self, message: String) {
        self.locating = false;
        self.error = Some(message);
    }
}

/// Uniformly random 4-digit decimal string in 1000..=9999.
pub fn generate_otp<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(OTP_MIN..=OTP_MAX).to_string()
}
