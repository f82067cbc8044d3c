//! The app core: a single synchronous `update` loop over [`Event`]s, with
//! side effects requested through the capabilities.

use serde::{Deserialize, Serialize};

use crate::capabilities::{Capabilities, TimerOutput};
use crate::cart::{CartEntry, Voucher};
use crate::event::Event;
use crate::model::{Language, Model};
use crate::navigation::{
    detail_page_for, Destination, Driver, NotificationToast, Page, PageLayout, Vehicle, Vendor,
};
use crate::wizard::WizardStep;
use crate::{
    AppError, UnixTimeMs, PROFILE_IMAGE_CLEAR_DELAY_MS, REWARD_POLL_INTERVAL_MS,
    TOAST_AUTO_HIDE_MS,
};

#[derive(Default)]
pub struct App;

/// Serializable snapshot handed to the shell on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub page: Page,
    pub layout: PageLayout,
    pub scroll_epoch: u64,

    pub selected_vendor: Option<Vendor>,
    pub selected_destination: Option<Destination>,
    pub selected_vehicle: Option<Vehicle>,
    pub selected_driver: Option<Driver>,
    pub active_voucher: Option<Voucher>,

    pub initialized: bool,
    pub language: Option<Language>,
    pub location: Option<String>,
    pub signed_in: bool,
    pub display_name: Option<String>,
    pub auth_error: Option<String>,

    pub show_location_modal: bool,
    pub wizard_step: WizardStep,
    pub wizard_location_input: String,
    pub wizard_phone_input: String,
    pub wizard_otp_input: String,
    pub wizard_error: Option<String>,
    pub wizard_locating: bool,

    pub cart_entries: Vec<CartEntry>,
    pub cart_count: usize,
    pub cart_total: f64,
    pub reward_active: bool,

    pub toast: Option<NotificationToast>,
    pub profile_image_open: bool,
    pub profile_image_url: Option<String>,
}

impl App {
    /// Unconditional page change. Bumps the scroll epoch and re-evaluates
    /// the cart scope rule, which must run on every navigation change.
    fn navigate(model: &mut Model, page: Page) {
        model.page = page;
        model.scroll_epoch += 1;
        Self::enforce_cart_scope(model);
    }

    /// Auto-clears the cart whenever it is non-empty and the current page
    /// is outside the shopping set.
    fn enforce_cart_scope(model: &mut Model) {
        if !model.cart.is_empty() && !model.page.allows_cart() {
            tracing::debug!(page = ?model.page, "clearing cart on leaving shopping context");
            model.cart.clear();
        }
    }

    /// Replaces any visible toast and re-arms the auto-hide timer. The
    /// superseded timer is cancelled; if its fire still races in, the id
    /// guard in the timer handler makes it a no-op.
    fn show_toast(model: &mut Model, caps: &Capabilities, toast: NotificationToast) {
        if let Some(id) = model.toast_timer.take() {
            caps.timer().cancel(id);
        }
        model.toast = Some(toast);
        let id = model.next_timer_id();
        model.toast_timer = Some(id);
        caps.timer().start(id, TOAST_AUTO_HIDE_MS, Event::TimerElapsed);
    }

    /// Successful OTP verification: commit location and raw phone to the
    /// session (prefixing is the session's job), tear down wizard progress,
    /// and redirect a freshly initialized user off the landing page.
    fn complete_verification(model: &mut Model) {
        let location = model.wizard.location_input.clone();
        let phone = model.wizard.phone_input.clone();
        let flipped = model.session.confirm_location(location, Some(&phone));
        model.wizard.step_back();

        if flipped {
            tracing::info!("session initialized");
            if model.page == Page::Landing {
                Self::navigate(model, Page::Food);
            }
        }
    }

    fn handle_timer(&self, output: TimerOutput, model: &mut Model, caps: &Capabilities) {
        match output {
            TimerOutput::Fired { id, now } => {
                if model.toast_timer == Some(id) {
                    // Manual hide may already have nulled the toast; setting
                    // it again is harmless.
                    model.toast = None;
                    model.toast_timer = None;
                } else if model.profile_clear_timer == Some(id) {
                    model.profile_clear_timer = None;
                    if !model.profile_image_open {
                        model.profile_image_url = None;
                    }
                } else if model.reward_poll_timer == Some(id) {
                    model.reward_poll_timer = None;
                    if model.cart.reward.expire_if_due(now) {
                        let message = model
                            .content
                            .get("reward_expired_message", "Your guest reward has expired.")
                            .to_string();
                        Self::show_toast(
                            model,
                            caps,
                            NotificationToast {
                                message,
                                sender: "Pasar".into(),
                                avatar: None,
                            },
                        );
                    } else if model.cart.reward.is_active() {
                        let id = model.next_timer_id();
                        model.reward_poll_timer = Some(id);
                        caps.timer()
                            .start(id, REWARD_POLL_INTERVAL_MS, Event::TimerElapsed);
                    }
                } else {
                    tracing::debug!(?id, "stale timer fired, ignoring");
                }
            }
            TimerOutput::Cancelled { .. } => {}
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            // --- Lifecycle ---
            Event::AppStarted => {
                caps.identity()
                    .bootstrap(|result| Event::BootstrapCompleted(Box::new(result)));
            }

            Event::BootstrapCompleted(result) => {
                match *result {
                    Ok(auth) => {
                        model.session.set_authenticated(auth.session.id, auth.identity);
                    }
                    // Swallowed: an unreadable session means "not signed in".
                    Err(e) => tracing::debug!(error = %e, "no remote session at startup"),
                }
            }

            // --- Language & location modal ---
            Event::LanguageSelected { language } => {
                model.session.select_language(language);
                model.wizard.reset_for_open();
            }

            Event::LocationModalOpened => {
                model.session.show_location_modal = true;
                model.wizard.reset_for_open();
            }

            Event::LocationModalClosed => {
                // Wizard progress is owned by the open transition, not close.
                model.session.show_location_modal = false;
            }

            // --- Verification wizard ---
            Event::WizardLocationChanged { text } => {
                model.wizard.location_input = text;
            }

            Event::WizardPhoneChanged { text } => {
                model.wizard.phone_input = text;
            }

            Event::WizardOtpChanged { text } => {
                model.wizard.otp_input = text;
            }

            Event::WizardLocationSubmitted => {
                model.wizard.submit_location(&mut rand::thread_rng());
            }

            Event::WizardSteppedBack => {
                model.wizard.step_back();
            }

            Event::WizardOtpSubmitted => {
                if model.wizard.verify_otp() {
                    Self::complete_verification(model);
                }
            }

            Event::WizardUseCurrentLocation => {
                if model.session.show_location_modal
                    && model.wizard.step == WizardStep::Location
                {
                    model.wizard.locating = true;
                    caps.geo()
                        .current_address(|result| Event::WizardGeocodeCompleted(Box::new(result)));
                }
            }

            Event::WizardGeocodeCompleted(result) => {
                if !model.session.show_location_modal || model.wizard.step != WizardStep::Location
                {
                    tracing::debug!("discarding late geocode result, wizard moved on");
                } else {
                    match *result {
                        Ok(address) => model.wizard.apply_geocoded_address(address),
                        Err(e) => {
                            let err: AppError = e.into();
                            model.wizard.geolocation_failed(err.user_facing_message());
                        }
                    }
                }
            }

            // --- Auth ---
            Event::SignInRequested { email, password } => {
                model.auth_error = None;
                caps.identity().sign_in(
                    email,
                    password.expose().to_owned(),
                    |result| Event::SignInCompleted(Box::new(result)),
                );
            }

            Event::SignUpRequested {
                email,
                password,
                name,
            } => {
                model.auth_error = None;
                caps.identity().sign_up(
                    email,
                    password.expose().to_owned(),
                    name,
                    |result| Event::SignUpCompleted(Box::new(result)),
                );
            }

            Event::SignInCompleted(result) | Event::SignUpCompleted(result) => match *result {
                Ok(auth) => {
                    model.session.set_authenticated(auth.session.id, auth.identity);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "authentication failed");
                    // Surfaced to the sign-in form, not shown globally.
                    model.auth_error = Some(e.into());
                }
            },

            Event::SignOutRequested => {
                caps.identity()
                    .sign_out(|result| Event::SignOutCompleted(Box::new(result)));
            }

            Event::SignOutCompleted(result) => {
                // Local state clears whether or not the remote call worked.
                if let Err(e) = *result {
                    tracing::warn!(error = %e, "remote session deletion failed on sign-out");
                }
                model.session.clear_authentication();
            }

            // --- Navigation ---
            Event::NavigatedTo { page } => {
                Self::navigate(model, page);
            }

            Event::VendorSelected(vendor) => {
                let page = detail_page_for(vendor.category);
                model.selected_vendor = Some(*vendor);
                Self::navigate(model, page);
            }

            Event::DestinationSelected(destination) => {
                model.selected_destination = Some(*destination);
                Self::navigate(model, Page::DestinationDetail);
            }

            Event::VehicleSelectedForReviews(vehicle) => {
                model.selected_vehicle = Some(*vehicle);
                Self::navigate(model, Page::Reviews);
            }

            Event::DriverSelectedForProfile(driver) => {
                model.selected_driver = Some(*driver);
                Self::navigate(model, Page::DriverProfile);
            }

            Event::LiveStreamOpened { vendor, voucher } => {
                model.selected_vendor = Some(*vendor);
                model.active_voucher = voucher;
                Self::navigate(model, Page::LiveStream);
            }

            // --- Notifications & profile-image modal ---
            Event::NotificationShown(toast) => {
                Self::show_toast(model, caps, *toast);
            }

            Event::NotificationHidden => {
                // Idempotent; a pending auto-hide firing later re-sets None.
                model.toast = None;
            }

            Event::ProfileImageOpened { url } => {
                // A pending deferred clear must not stomp the new url.
                if let Some(id) = model.profile_clear_timer.take() {
                    caps.timer().cancel(id);
                }
                model.profile_image_open = true;
                model.profile_image_url = Some(url);
            }

            Event::ProfileImageClosed => {
                model.profile_image_open = false;
                let id = model.next_timer_id();
                model.profile_clear_timer = Some(id);
                caps.timer()
                    .start(id, PROFILE_IMAGE_CLEAR_DELAY_MS, Event::TimerElapsed);
            }

            // --- Cart ---
            Event::CartQuantityUpdated {
                product,
                quantity,
                voucher,
            } => {
                model.cart.update_quantity(*product, quantity, voucher);
            }

            Event::CartItemRemoved { product_id } => {
                model.cart.remove(&product_id);
            }

            Event::CartCleared => {
                model.cart.clear();
            }

            Event::GuestRewardActivated => {
                model.cart.reward.activate(UnixTimeMs::now());
                let message = model
                    .content
                    .get(
                        "reward_activated_message",
                        "Enjoy 5% off your orders for the next 48 hours!",
                    )
                    .to_string();
                Self::show_toast(
                    model,
                    caps,
                    NotificationToast {
                        message,
                        sender: "Pasar".into(),
                        avatar: None,
                    },
                );
                // Poll only while a reward is active.
                if model.reward_poll_timer.is_none() {
                    let id = model.next_timer_id();
                    model.reward_poll_timer = Some(id);
                    caps.timer()
                        .start(id, REWARD_POLL_INTERVAL_MS, Event::TimerElapsed);
                }
            }

            // --- Timers ---
            Event::TimerElapsed(output) => {
                self.handle_timer(output, model, caps);
            }
        }

        caps.render().render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        Self::view_model(model)
    }
}

// The Effect derive wires the capabilities up through the event type, so
// `Event` has to stand in as an app and hand through to the real one.
impl crux_core::App for Event {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        crux_core::App::update(&App, event, model, caps);
    }

    fn view(&self, model: &Model) -> ViewModel {
        App::view_model(model)
    }
}

impl App {
    fn view_model(model: &Model) -> ViewModel {
        ViewModel {
            page: model.page,
            layout: PageLayout::for_page(model.page),
            scroll_epoch: model.scroll_epoch,

            selected_vendor: model.selected_vendor.clone(),
            selected_destination: model.selected_destination.clone(),
            selected_vehicle: model.selected_vehicle.clone(),
            selected_driver: model.selected_driver.clone(),
            active_voucher: model.active_voucher.clone(),

            initialized: model.session.initialized,
            language: model.session.language,
            location: model.session.location.clone(),
            signed_in: model.session.is_authenticated(),
            display_name: model
                .session
                .identity
                .as_ref()
                .map(|i| i.name.clone().unwrap_or_else(|| i.email.clone())),
            auth_error: model
                .auth_error
                .as_ref()
                .map(AppError::user_facing_message),

            show_location_modal: model.session.show_location_modal,
            wizard_step: model.wizard.step,
            wizard_location_input: model.wizard.location_input.clone(),
            wizard_phone_input: model.wizard.phone_input.clone(),
            wizard_otp_input: model.wizard.otp_input.clone(),
            wizard_error: model.wizard.error.clone(),
            wizard_locating: model.wizard.locating,

            cart_entries: model.cart.entries.clone(),
            cart_count: model.cart.item_count(),
            cart_total: model.cart.total(),
            reward_active: model.cart.reward.is_active(),

            toast: model.toast.clone(),
            profile_image_open: model.profile_image_open,
            profile_image_url: model.profile_image_url.clone(),
        }
    }
}
