//! # opfork chain
//!
//! Hardfork gating of transaction operations.
//!
//! Operations are partitioned into activation groups ([`activation_group`]):
//! everything registered before the first hardfork-introduced operation is
//! always permitted, every later operation belongs to exactly one
//! [`Hardfork`]. An [`ActivationSchedule`] holds the activation time of each
//! hardfork, and a [`HardforkVisitor`] bound to a reference time answers
//! whether an operation, in whatever form the caller holds it, is permitted.
//!
//! ## Example
//!
//! ```rust
//! use opfork_chain::HardforkVisitor;
//! use opfork_protocol::{OperationKind, TimePointSec};
//!
//! let head_block_time = TimePointSec::parse("2021-01-01T00:00:00").unwrap();
//! let visitor = HardforkVisitor::new(head_block_time);
//!
//! assert!(visitor.visit_kind(OperationKind::Transfer));
//! assert!(visitor.visit_kind(OperationKind::TicketCreate));
//! assert!(!visitor.visit_kind(OperationKind::LiquidityPoolCreate));
//! assert!(visitor.visit_tag(1_000).is_err());
//! ```

pub mod error;
pub mod groups;
pub mod hardfork;
pub mod schedule;
pub mod visitor;

pub use error::{ActivationError, ActivationResult, ScheduleError};
pub use groups::{
    activation_group, members, verify_partition, ActivationGroup, FIRST_GATED_OPERATION,
};
pub use hardfork::{Hardfork, HardforkParseError};
pub use schedule::{ActivationSchedule, SCHEDULE_SECTION};
pub use visitor::HardforkVisitor;
