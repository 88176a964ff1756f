//! Protocol definitions for the cantine automation core.
//!
//! The automation logic never touches a real DOM or HTTP stack directly.
//! Everything it needs from the outside world is expressed as a capability
//! trait defined here:
//!
//! - [`BrowsingSurface`] / [`ElementHandle`]: the embedded rendering engine,
//!   reduced to locate/inject/navigate primitives and a mutation feed.
//! - [`ReservationApi`]: the remote gateway (identity resolution + booking
//!   creation).
//! - [`Clock`]: wall-clock access, injectable for deterministic tests.
//!
//! Shared data types ([`Credentials`], [`BookingTarget`], [`HostMessage`],
//! [`HostCommand`]) and the error taxonomy live here too, so the automation
//! and host crates agree on one contract.

pub mod api;
pub mod clock;
pub mod command;
pub mod error;
pub mod message;
pub mod surface;
pub mod testing;
pub mod types;

pub use api::{BookingRequest, Identity, ReservationApi};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{HostCommand, MAX_WEEK_OFFSET};
pub use error::{ApiError, SurfaceError};
pub use message::{BookingOutcome, HostMessage};
pub use surface::{BrowsingSurface, ElementHandle, MutationEvent, SyntheticEvent};
pub use types::{BookingBatch, BookingTarget, Credentials};
