//! # opfork protocol
//!
//! Protocol-level types consumed by hardfork activation checks:
//!
//! - [`OperationKind`]: the append-only operation registry with sequential tags
//! - [`Operation`]: the tagged union of every operation, with typed variants
//! - [`TimePointSec`]: the second-resolution reference time
//! - [`dispatch_tag`]: runtime tag dispatch onto the static operation types
//!
//! ## Example
//!
//! ```rust
//! use opfork_protocol::{Operation, OperationKind, OperationType, TicketCreateOperation};
//!
//! let op: Operation = TicketCreateOperation::default().into();
//! assert_eq!(op.kind(), TicketCreateOperation::KIND);
//! assert_eq!(OperationKind::from_tag(op.which()), Ok(OperationKind::TicketCreate));
//! ```

pub mod dispatch;
pub mod error;
pub mod operations;
pub mod time;

pub use dispatch::{dispatch_kind, dispatch_tag, OperationVisitor};
pub use error::{ProtocolError, ProtocolResult};
pub use operations::*;
pub use time::TimePointSec;
