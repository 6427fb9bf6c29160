//! Thin HTTP request layer over the core operations.  No business logic lives
//! here — handlers validate nothing the core doesn't, and status mapping is
//! owned by `AppError::into_response`.

pub mod alerts;
pub mod prices;
pub mod trading;
