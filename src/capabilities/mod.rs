mod geo;
mod identity;
mod timer;

pub use self::geo::{Geo, GeoError, GeoOperation, GeoOutput, GeoResult};
pub use self::identity::{
    IdentityError, IdentityOperation, IdentityOutput, IdentityResult, IdentityService,
};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

// Render is Crux's built-in view-update capability; we use it directly.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub timer: Timer<Event>,
    pub identity: IdentityService<Event>,
    pub geo: Geo<Event>,
}

// The Effect derive registers the capabilities against the event type; the
// shell and test harness address them through the app, so route that
// instantiation to the same constructor.
impl crux_core::WithContext<App, Effect> for Capabilities {
    fn new_with_context(
        context: crux_core::capability::ProtoContext<Effect, Event>,
    ) -> Capabilities {
        <Capabilities as crux_core::WithContext<Event, Effect>>::new_with_context(context)
    }
}

impl Capabilities {
    pub fn render(&self) -> &Render<Event> {
        &self.render
    }

    pub fn timer(&self) -> &Timer<Event> {
        &self.timer
    }

    pub fn identity(&self) -> &IdentityService<Event> {
        &self.identity
    }

    pub fn geo(&self) -> &Geo<Event> {
        &self.geo
    }
}
