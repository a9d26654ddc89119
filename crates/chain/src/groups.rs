//! The partition of the operation registry into activation groups.
//!
//! [`activation_group`] is the one place an operation is assigned to a
//! hardfork. It matches every [`OperationKind`] explicitly with no wildcard
//! arm, so registering a new operation without classifying it fails to
//! compile. [`verify_partition`] additionally checks the registry ordering
//! rule: operations before [`FIRST_GATED_OPERATION`] are always on, every
//! operation from it onwards is gated.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use opfork_protocol::OperationKind;
use tracing::info;

use crate::error::{ActivationError, ActivationResult};
use crate::hardfork::Hardfork;

/// The first operation introduced by a hardfork; every earlier tag predates
/// hardfork gating.
pub const FIRST_GATED_OPERATION: OperationKind = OperationKind::CustomAuthorityCreate;

/// A set of operations sharing one activation predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivationGroup {
    /// Operations that predate all hardforks.
    AlwaysOn,
    /// Operations permitted once the hardfork has taken effect.
    Gated(Hardfork),
}

impl ActivationGroup {
    #[must_use]
    pub const fn hardfork(self) -> Option<Hardfork> {
        match self {
            Self::AlwaysOn => None,
            Self::Gated(hardfork) => Some(hardfork),
        }
    }
}

impl fmt::Display for ActivationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysOn => f.write_str("always-on"),
            Self::Gated(hardfork) => write!(f, "{hardfork}"),
        }
    }
}

/// Returns the activation group `kind` belongs to.
#[must_use]
pub const fn activation_group(kind: OperationKind) -> ActivationGroup {
    use ActivationGroup::{AlwaysOn, Gated};
    use OperationKind::*;

    match kind {
        Transfer
        | LimitOrderCreate
        | LimitOrderCancel
        | CallOrderUpdate
        | FillOrder
        | AccountCreate
        | AccountUpdate
        | AccountWhitelist
        | AccountUpgrade
        | AccountTransfer
        | AssetCreate
        | AssetUpdate
        | AssetUpdateBitasset
        | AssetUpdateFeedProducers
        | AssetIssue
        | AssetReserve
        | AssetFundFeePool
        | AssetSettle
        | AssetGlobalSettle
        | AssetPublishFeed
        | WitnessCreate
        | WitnessUpdate
        | ProposalCreate
        | ProposalUpdate
        | ProposalDelete
        | WithdrawPermissionCreate
        | WithdrawPermissionUpdate
        | WithdrawPermissionClaim
        | WithdrawPermissionDelete
        | CommitteeMemberCreate
        | CommitteeMemberUpdate
        | CommitteeMemberUpdateGlobalParameters
        | VestingBalanceCreate
        | VestingBalanceWithdraw
        | WorkerCreate
        | Custom
        | Assert
        | BalanceClaim
        | OverrideTransfer
        | TransferToBlind
        | BlindTransfer
        | TransferFromBlind
        | AssetSettleCancel
        | AssetClaimFees
        | FbaDistribute
        | BidCollateral
        | ExecuteBid
        | AssetClaimPool
        | AssetUpdateIssuer
        | HtlcCreate
        | HtlcRedeem
        | HtlcRedeemed
        | HtlcExtend
        | HtlcRefund => AlwaysOn,

        CustomAuthorityCreate | CustomAuthorityUpdate | CustomAuthorityDelete => {
            Gated(Hardfork::CustomAuthority)
        }

        LimitOrderUpdate => Gated(Hardfork::LimitOrderUpdate),

        TankCreate
        | TankUpdate
        | TankDelete
        | TankQuery
        | TapOpen
        | TapConnect
        | AccountFundConnection
        | ConnectionFundAccount => Gated(Hardfork::TanksAndTaps),

        TicketCreate | TicketUpdate => Gated(Hardfork::Tickets),

        LiquidityPoolCreate
        | LiquidityPoolDelete
        | LiquidityPoolDeposit
        | LiquidityPoolWithdraw
        | LiquidityPoolExchange => Gated(Hardfork::LiquidityPool),

        SametFundCreate | SametFundDelete | SametFundUpdate | SametFundBorrow
        | SametFundRepay => Gated(Hardfork::SametFund),

        CreditOfferCreate
        | CreditOfferDelete
        | CreditOfferUpdate
        | CreditOfferAccept
        | CreditDealRepay
        | CreditDealExpired => Gated(Hardfork::CreditOffer),

        CreditDealUpdate => Gated(Hardfork::CreditDealUpdate),

        LiquidityPoolUpdate => Gated(Hardfork::LiquidityPoolUpdate),
    }
}

static GROUP_MEMBERS: Lazy<BTreeMap<ActivationGroup, Vec<OperationKind>>> = Lazy::new(|| {
    let mut members: BTreeMap<ActivationGroup, Vec<OperationKind>> = BTreeMap::new();
    for kind in OperationKind::ALL {
        members.entry(activation_group(*kind)).or_default().push(*kind);
    }
    members
});

/// Operations belonging to `group`, in registry order.
#[must_use]
pub fn members(group: ActivationGroup) -> &'static [OperationKind] {
    GROUP_MEMBERS.get(&group).map(Vec::as_slice).unwrap_or(&[])
}

/// Checks that the group table is consistent with the registry ordering.
pub fn verify_partition() -> ActivationResult<()> {
    for kind in OperationKind::ALL.iter().copied() {
        match (activation_group(kind), kind < FIRST_GATED_OPERATION) {
            (ActivationGroup::AlwaysOn, true) | (ActivationGroup::Gated(_), false) => {}
            (ActivationGroup::AlwaysOn, false) => {
                return Err(ActivationError::Unclassified { operation: kind })
            }
            (ActivationGroup::Gated(hardfork), true) => {
                return Err(ActivationError::Misclassified {
                    operation: kind,
                    hardfork,
                })
            }
        }
    }

    if let Some(hardfork) = Hardfork::ALL
        .into_iter()
        .find(|hardfork| members(ActivationGroup::Gated(*hardfork)).is_empty())
    {
        return Err(ActivationError::EmptyGroup { hardfork });
    }

    info!(
        operations = OperationKind::COUNT,
        gated = OperationKind::COUNT - members(ActivationGroup::AlwaysOn).len(),
        "operation hardfork partition verified"
    );
    Ok(())
}
