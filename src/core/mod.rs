pub mod controller;
pub mod view;

pub use crate::domain::model::{
    FailureKind, FormField, FormState, LocationTaxonomy, PredictionResult, RequestPayload,
    UiStatus,
};
pub use crate::domain::ports::{ConfigProvider, LocationService, PredictionService};
pub use crate::utils::error::Result;
