//! # opfork: hardfork gating for transaction operations
//!
//! A chain whose set of legal operations grows through point-in-time
//! protocol upgrades must reject an operation until the hardfork that
//! introduced it has taken effect. This crate answers that question for any
//! operation and reference time.
//!
//! - [`protocol`]: the operation registry, typed operations and timestamps
//! - [`chain`]: hardforks, the activation group table, activation schedules
//!   and the [`HardforkVisitor`](chain::HardforkVisitor)
//!
//! ## Quick Start
//!
//! ```rust
//! use opfork::prelude::*;
//!
//! // Validate the operations of an incoming transaction against the head block time.
//! let head_block_time = TimePointSec::parse("2023-03-29T13:59:59").unwrap();
//! let visitor = HardforkVisitor::new(head_block_time);
//!
//! let ops = vec![
//!     Operation::from(TransferOperation::default()),
//!     Operation::from(LimitOrderUpdateOperation::default()),
//! ];
//! assert!(visitor.ensure_all_permitted(&ops).is_err());
//! ```

pub use opfork_chain as chain;
pub use opfork_protocol as protocol;

/// Commonly used types.
pub mod prelude {
    pub use opfork_chain::{
        activation_group, ActivationError, ActivationGroup, ActivationSchedule, Hardfork,
        HardforkVisitor,
    };
    pub use opfork_protocol::{
        dispatch_tag, Operation, OperationKind, OperationType, OperationVisitor, TimePointSec,
        LimitOrderUpdateOperation, TransferOperation,
    };
}
