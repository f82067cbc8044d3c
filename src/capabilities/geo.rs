//! Device geolocation and reverse geocoding behind one capability
//! interface, so the core never touches the mapping script directly. A
//! shell without the mapping library answers every operation with
//! `GeoError::Unavailable`; manual text entry keeps working.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoOperation {
    GetPosition,
    ReverseGeocode { lat: f64, lng: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoOutput {
    Position { lat: f64, lng: f64 },
    Address(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("geolocation unavailable")]
    Unavailable,
    #[error("no address found for coordinates")]
    NotFound,
    #[error("geocoding service error: {message}")]
    Service { message: String },
}

impl From<GeoError> for AppError {
    fn from(e: GeoError) -> Self {
        let kind = match &e {
            GeoError::PermissionDenied => ErrorKind::LocationPermissionDenied,
            GeoError::Unavailable => ErrorKind::Location,
            GeoError::NotFound | GeoError::Service { .. } => ErrorKind::Geocoding,
        };
        Self::new(kind, e.to_string())
    }
}

pub type GeoResult = Result<GeoOutput, GeoError>;

impl Operation for GeoOperation {
    type Output = GeoResult;
}

pub struct Geo<Ev> {
    context: CapabilityContext<GeoOperation, Ev>,
}

impl<Ev> Capability<Ev> for Geo<Ev> {
    type Operation = GeoOperation;
    type MappedSelf<MappedEv> = Geo<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geo::new(self.context.map_event(f))
    }
}

impl<Ev> Geo<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<GeoOperation, Ev>) -> Self {
        Self { context }
    }

    /// Device position followed by reverse geocoding, reported as a single
    /// formatted-address result. Either step's failure short-circuits.
    pub fn current_address<F>(&self, make_event: F)
    where
        F: FnOnce(Result<String, GeoError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let (lat, lng) = match context.request_from_shell(GeoOperation::GetPosition).await {
                Ok(GeoOutput::Position { lat, lng }) => (lat, lng),
                Ok(other) => {
                    context.update_app(make_event(Err(GeoError::Service {
                        message: format!("unexpected geolocation output: {other:?}"),
                    })));
                    return;
                }
                Err(e) => {
                    context.update_app(make_event(Err(e)));
                    return;
                }
            };

            let result = match context
                .request_from_shell(GeoOperation::ReverseGeocode { lat, lng })
                .await
            {
                Ok(GeoOutput::Address(address)) => Ok(address),
                Ok(other) => Err(GeoError::Service {
                    message: format!("unexpected geocoding output: {other:?}"),
                }),
                Err(e) => Err(e),
            };

            context.update_app(make_event(result));
        });
    }
}
