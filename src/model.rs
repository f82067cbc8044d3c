//! The app model: session state plus navigation, cart, wizard, and the
//! transient UI state owned by the core.

use serde::{Deserialize, Serialize};

use crate::capabilities::TimerId;
use crate::cart::{Cart, Voucher};
use crate::content::ContentStore;
use crate::navigation::{Destination, Driver, NotificationToast, Page, Vehicle, Vendor};
use crate::wizard::LocationVerification;
use crate::{AppError, SessionId, UserId, PHONE_COUNTRY_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Id,
}

/// User record held by the external identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
}

/// Remote session handle held by the external identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSession {
    pub id: SessionId,
    pub user_id: UserId,
}

/// Result of a completed sign-in or sign-up flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub session: RemoteSession,
    pub identity: Identity,
}

/// The user's initialization/auth/location state for the current app
/// lifetime. Created empty at process start; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub initialized: bool,
    pub language: Option<Language>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub show_location_modal: bool,
    pub identity: Option<Identity>,
    pub remote_session: Option<SessionId>,
}

impl Session {
    /// Records the language and opens the location modal. Pure transition.
    pub fn select_language(&mut self, language: Language) {
        self.language = Some(language);
        self.show_location_modal = true;
    }

    /// Records the confirmed location (and normalized phone, when given),
    /// closes the modal, and flips `initialized` exactly once. Returns true
    /// only on the false→true transition.
    pub fn confirm_location(&mut self, location: String, phone: Option<&str>) -> bool {
        self.location = Some(location);
        if let Some(phone) = phone {
            self.phone_number = Some(normalize_phone(phone));
        }
        self.show_location_modal = false;

        if self.initialized {
            false
        } else {
            self.initialized = true;
            true
        }
    }

    pub fn set_authenticated(&mut self, session_id: SessionId, identity: Identity) {
        self.remote_session = Some(session_id);
        self.identity = Some(identity);
    }

    /// Local sign-out. Unconditional: callers clear local state whether or
    /// not remote session deletion succeeded.
    pub fn clear_authentication(&mut self) {
        self.identity = None;
        self.remote_session = None;
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Normalizes a user-typed phone number to the fixed international prefix:
/// keeps digits only, strips a leading country code or trunk zeros, then
/// prepends the prefix.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = digits.strip_prefix("62").unwrap_or(&digits);
    let national = national.trim_start_matches('0');
    format!("{PHONE_COUNTRY_PREFIX}{national}")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub session: Session,
    pub wizard: LocationVerification,
    pub cart: Cart,
    pub content: ContentStore,

    // Navigation
    pub page: Page,
    pub selected_vendor: Option<Vendor>,
    pub selected_destination: Option<Destination>,
    pub selected_vehicle: Option<Vehicle>,
    pub selected_driver: Option<Driver>,
    /// Voucher carried into the live-stream page, applicable to a later
    /// cart purchase.
    pub active_voucher: Option<Voucher>,
    /// Bumped on every navigation so the shell resets scroll position.
    pub scroll_epoch: u64,

    // Transient UI
    pub toast: Option<NotificationToast>,
    pub profile_image_open: bool,
    pub profile_image_url: Option<String>,
    pub auth_error: Option<AppError>,

    // Timer bookkeeping. A fired timer whose id no longer matches the
    // recorded one is stale and must be ignored.
    pub toast_timer: Option<TimerId>,
    pub profile_clear_timer: Option<TimerId>,
    pub reward_poll_timer: Option<TimerId>,
    next_timer_seq: u64,
}

impl Model {
    #[must_use]
    pub fn with_content(content: ContentStore) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Hands out a fresh timer id; ids are never reused within a session.
    pub fn next_timer_id(&mut self) -> TimerId {
        self.next_timer_seq += 1;
        TimerId(self.next_timer_seq)
    }
}
