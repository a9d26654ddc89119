//! The hardfork visitor decides whether an operation may be applied at a
//! reference time.
//!
//! It can be invoked several ways, all of which agree for the same operation
//! kind: with an [`OperationKind`] or a statically typed operation, with a
//! runtime tag, with an [`Operation`] value, or as an [`OperationVisitor`]
//! handed to [`dispatch_tag`](opfork_protocol::dispatch_tag).

use opfork_protocol::{
    Operation, OperationKind, OperationTag, OperationType, OperationVisitor, TimePointSec,
};
use tracing::{debug, trace};

use crate::error::{ActivationError, ActivationResult};
use crate::groups::activation_group;
use crate::schedule::ActivationSchedule;

#[derive(Debug, Clone, Copy)]
pub struct HardforkVisitor<'a> {
    now: TimePointSec,
    schedule: &'a ActivationSchedule,
}

impl HardforkVisitor<'static> {
    /// Creates a visitor using the MainNet schedule.
    ///
    /// `now` is normally the head block time.
    #[must_use]
    pub fn new(now: TimePointSec) -> Self {
        Self::with_schedule(ActivationSchedule::shared_mainnet(), now)
    }
}

impl<'a> HardforkVisitor<'a> {
    #[must_use]
    pub const fn with_schedule(schedule: &'a ActivationSchedule, now: TimePointSec) -> Self {
        Self { now, schedule }
    }

    #[must_use]
    pub const fn now(&self) -> TimePointSec {
        self.now
    }

    #[must_use]
    pub const fn schedule(&self) -> &'a ActivationSchedule {
        self.schedule
    }

    /// Checks whether operations of `kind` are permitted.
    #[must_use]
    pub fn visit_kind(&self, kind: OperationKind) -> bool {
        let group = activation_group(kind);
        let permitted = self.schedule.evaluate(group, self.now);
        trace!(operation = %kind, %group, now = %self.now, permitted, "hardfork check");
        permitted
    }

    /// Checks whether the statically typed operation `Op` is permitted.
    #[must_use]
    pub fn visit_static<Op: OperationType>(&self) -> bool {
        self.visit_kind(Op::KIND)
    }

    /// Checks the operation named by a runtime registry tag.
    ///
    /// A tag outside the registry is an error, never a rejection.
    pub fn visit_tag(&self, tag: OperationTag) -> ActivationResult<bool> {
        let kind = OperationKind::from_tag(tag)?;
        Ok(self.visit_kind(kind))
    }

    /// Checks the active variant of `op`.
    ///
    /// Only the outer operation is considered; use [`Self::ensure_permitted`]
    /// to also cover the operations nested inside a proposal.
    #[must_use]
    pub fn visit_operation(&self, op: &Operation) -> bool {
        self.visit_kind(op.kind())
    }

    /// Rejects `op` if its hardfork, or the hardfork of any operation it
    /// proposes, has not taken effect.
    pub fn ensure_permitted(&self, op: &Operation) -> ActivationResult<()> {
        self.ensure_kind_permitted(op.kind())?;
        op.proposed_operations()
            .try_for_each(|proposed| self.ensure_permitted(proposed))
    }

    fn ensure_kind_permitted(&self, kind: OperationKind) -> ActivationResult<()> {
        if self.visit_kind(kind) {
            return Ok(());
        }

        match activation_group(kind).hardfork() {
            Some(hardfork) => {
                let activation = self.schedule.threshold(hardfork);
                debug!(
                    operation = %kind,
                    %hardfork,
                    %activation,
                    now = %self.now,
                    "operation rejected before hardfork"
                );
                Err(ActivationError::NotYetActive {
                    operation: kind,
                    hardfork,
                    activation,
                    now: self.now,
                })
            }
            None => Ok(()),
        }
    }

    /// Rejects the first operation in `ops` whose hardfork has not taken effect.
    pub fn ensure_all_permitted<'o, I>(&self, ops: I) -> ActivationResult<()>
    where
        I: IntoIterator<Item = &'o Operation>,
    {
        ops.into_iter().try_for_each(|op| self.ensure_permitted(op))
    }
}

impl OperationVisitor for HardforkVisitor<'_> {
    type Output = bool;

    fn visit<Op: OperationType>(&mut self) -> bool {
        self.visit_static::<Op>()
    }
}
