//! Boundaries to the outside world: the backend API and the local shipment log.

pub mod api;
pub mod shipment_log;
