//! Thin typed wrappers over [`PortalClient`](crate::client::PortalClient) for
//! each backend feature area. Records travel as opaque JSON under the
//! backend's `{ "data": ... }` envelope; these modules own the paths and
//! payload shapes, nothing more.

pub mod auth;
pub mod companies;
pub mod faculty;
pub mod placements;
pub mod students;
pub mod tpc;
