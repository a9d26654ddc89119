//! The operation registry.
//!
//! Every operation the protocol recognises is listed exactly once in
//! `define_operations!` with its wire tag. Tags are sequential and the list
//! is append-only: a new operation always receives the next free tag and an
//! existing tag is never reused or reordered.

use std::fmt;
use std::str::FromStr;

use serde::de::{Error as _, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dispatch::OperationVisitor;
use crate::error::{ProtocolError, ProtocolResult};

/// Integer tag naming a position in the operation registry.
pub type OperationTag = u64;

/// Fee attached to an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: i64,
    pub asset_id: u64,
}

/// Fields of an operation whose specific fields are carried opaquely in
/// `payload`; their validation belongs to the evaluators of each operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationBody {
    pub fee: Asset,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Implemented by every statically typed operation.
pub trait OperationType: Into<Operation> {
    /// The registry entry for this operation type.
    const KIND: OperationKind;

    fn fee(&self) -> Asset;
}

/// An operation nested inside another one, such as a proposed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationWrapper {
    pub op: Operation,
}

/// Operation-specific fields of a proposal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalCreatePayload {
    /// Operations applied once the proposal is approved.
    #[serde(default)]
    pub proposed_ops: Vec<OperationWrapper>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Proposes a set of operations for later approval.
///
/// Unlike other operations its proposed operations are typed, so each can
/// be validated before the proposal is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalCreateOperation {
    pub fee: Asset,
    #[serde(default)]
    pub payload: ProposalCreatePayload,
}

impl ProposalCreateOperation {
    #[must_use]
    pub fn new<I>(fee: Asset, proposed: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        Self {
            fee,
            payload: ProposalCreatePayload {
                proposed_ops: proposed.into_iter().map(|op| OperationWrapper { op }).collect(),
                fields: serde_json::Map::new(),
            },
        }
    }
}

impl OperationType for ProposalCreateOperation {
    const KIND: OperationKind = OperationKind::ProposalCreate;

    fn fee(&self) -> Asset {
        self.fee
    }
}

/// Declares the struct of an operation whose fields stay opaque.
macro_rules! operation_struct {
    ($variant:ident, $ty:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(pub OperationBody);

        impl OperationType for $ty {
            const KIND: OperationKind = OperationKind::$variant;

            fn fee(&self) -> Asset {
                self.0.fee
            }
        }
    };
    ($variant:ident, $ty:ident, typed) => {};
}

macro_rules! define_operations {
    ($($tag:literal => $variant:ident($ty:ident, $name:literal $(, $typed:ident)?);)+) => {
        /// One member of the closed set of operation kinds, ordered by tag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum OperationKind {
            $($variant = $tag,)+
        }

        impl OperationKind {
            /// Every operation kind in registry order.
            pub const ALL: &'static [OperationKind] = &[$(OperationKind::$variant,)+];

            /// Number of operations in the registry.
            pub const COUNT: usize = Self::ALL.len();

            /// Resolves a runtime tag, failing for tags outside the registry.
            pub fn from_tag(tag: OperationTag) -> ProtocolResult<Self> {
                match tag {
                    $($tag => Ok(OperationKind::$variant),)+
                    _ => Err(ProtocolError::UnknownOperationTag {
                        tag,
                        count: Self::COUNT,
                    }),
                }
            }

            #[must_use]
            pub const fn tag(self) -> OperationTag {
                self as OperationTag
            }

            /// The snake_case name of the operation.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(OperationKind::$variant => $name,)+
                }
            }
        }

        $(
            operation_struct!($variant, $ty $(, $typed)?);

            impl From<$ty> for Operation {
                fn from(op: $ty) -> Self {
                    Operation::$variant(op)
                }
            }
        )+

        /// A single operation: exactly one of the registry variants.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Operation {
            $($variant($ty),)+
        }

        impl Operation {
            /// An operation of the given kind with default fields.
            #[must_use]
            pub fn default_for(kind: OperationKind) -> Self {
                match kind {
                    $(OperationKind::$variant => Operation::$variant(<$ty>::default()),)+
                }
            }

            #[must_use]
            pub const fn kind(&self) -> OperationKind {
                match self {
                    $(Operation::$variant(_) => OperationKind::$variant,)+
                }
            }

            #[must_use]
            pub fn fee(&self) -> Asset {
                match self {
                    $(Operation::$variant(op) => op.fee(),)+
                }
            }
        }

        impl Serialize for Operation {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(&self.which())?;
                match self {
                    $(Operation::$variant(op) => tuple.serialize_element(op)?,)+
                }
                tuple.end()
            }
        }

        struct OperationSeqVisitor;

        impl<'de> Visitor<'de> for OperationSeqVisitor {
            type Value = Operation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an operation as a [tag, fields] pair")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Operation, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let tag: OperationTag = seq
                    .next_element()?
                    .ok_or_else(|| A::Error::invalid_length(0, &self))?;
                let kind = OperationKind::from_tag(tag).map_err(A::Error::custom)?;
                let op = match kind {
                    $(OperationKind::$variant => {
                        seq.next_element::<$ty>()?.map(Operation::$variant)
                    })+
                };
                op.ok_or_else(|| A::Error::invalid_length(1, &self))
            }
        }

        /// Hands the statically typed operation for `kind` to `visitor`.
        pub(crate) fn visit_kind<V>(kind: OperationKind, visitor: &mut V) -> V::Output
        where
            V: OperationVisitor,
        {
            match kind {
                $(OperationKind::$variant => visitor.visit::<$ty>(),)+
            }
        }
    };
}

define_operations! {
    0 => Transfer(TransferOperation, "transfer");
    1 => LimitOrderCreate(LimitOrderCreateOperation, "limit_order_create");
    2 => LimitOrderCancel(LimitOrderCancelOperation, "limit_order_cancel");
    3 => CallOrderUpdate(CallOrderUpdateOperation, "call_order_update");
    4 => FillOrder(FillOrderOperation, "fill_order");
    5 => AccountCreate(AccountCreateOperation, "account_create");
    6 => AccountUpdate(AccountUpdateOperation, "account_update");
    7 => AccountWhitelist(AccountWhitelistOperation, "account_whitelist");
    8 => AccountUpgrade(AccountUpgradeOperation, "account_upgrade");
    9 => AccountTransfer(AccountTransferOperation, "account_transfer");
    10 => AssetCreate(AssetCreateOperation, "asset_create");
    11 => AssetUpdate(AssetUpdateOperation, "asset_update");
    12 => AssetUpdateBitasset(AssetUpdateBitassetOperation, "asset_update_bitasset");
    13 => AssetUpdateFeedProducers(
        AssetUpdateFeedProducersOperation,
        "asset_update_feed_producers"
    );
    14 => AssetIssue(AssetIssueOperation, "asset_issue");
    15 => AssetReserve(AssetReserveOperation, "asset_reserve");
    16 => AssetFundFeePool(AssetFundFeePoolOperation, "asset_fund_fee_pool");
    17 => AssetSettle(AssetSettleOperation, "asset_settle");
    18 => AssetGlobalSettle(AssetGlobalSettleOperation, "asset_global_settle");
    19 => AssetPublishFeed(AssetPublishFeedOperation, "asset_publish_feed");
    20 => WitnessCreate(WitnessCreateOperation, "witness_create");
    21 => WitnessUpdate(WitnessUpdateOperation, "witness_update");
    22 => ProposalCreate(ProposalCreateOperation, "proposal_create", typed);
    23 => ProposalUpdate(ProposalUpdateOperation, "proposal_update");
    24 => ProposalDelete(ProposalDeleteOperation, "proposal_delete");
    25 => WithdrawPermissionCreate(WithdrawPermissionCreateOperation, "withdraw_permission_create");
    26 => WithdrawPermissionUpdate(WithdrawPermissionUpdateOperation, "withdraw_permission_update");
    27 => WithdrawPermissionClaim(WithdrawPermissionClaimOperation, "withdraw_permission_claim");
    28 => WithdrawPermissionDelete(WithdrawPermissionDeleteOperation, "withdraw_permission_delete");
    29 => CommitteeMemberCreate(CommitteeMemberCreateOperation, "committee_member_create");
    30 => CommitteeMemberUpdate(CommitteeMemberUpdateOperation, "committee_member_update");
    31 => CommitteeMemberUpdateGlobalParameters(
        CommitteeMemberUpdateGlobalParametersOperation,
        "committee_member_update_global_parameters"
    );
    32 => VestingBalanceCreate(VestingBalanceCreateOperation, "vesting_balance_create");
    33 => VestingBalanceWithdraw(VestingBalanceWithdrawOperation, "vesting_balance_withdraw");
    34 => WorkerCreate(WorkerCreateOperation, "worker_create");
    35 => Custom(CustomOperation, "custom");
    36 => Assert(AssertOperation, "assert");
    37 => BalanceClaim(BalanceClaimOperation, "balance_claim");
    38 => OverrideTransfer(OverrideTransferOperation, "override_transfer");
    39 => TransferToBlind(TransferToBlindOperation, "transfer_to_blind");
    40 => BlindTransfer(BlindTransferOperation, "blind_transfer");
    41 => TransferFromBlind(TransferFromBlindOperation, "transfer_from_blind");
    42 => AssetSettleCancel(AssetSettleCancelOperation, "asset_settle_cancel");
    43 => AssetClaimFees(AssetClaimFeesOperation, "asset_claim_fees");
    44 => FbaDistribute(FbaDistributeOperation, "fba_distribute");
    45 => BidCollateral(BidCollateralOperation, "bid_collateral");
    46 => ExecuteBid(ExecuteBidOperation, "execute_bid");
    47 => AssetClaimPool(AssetClaimPoolOperation, "asset_claim_pool");
    48 => AssetUpdateIssuer(AssetUpdateIssuerOperation, "asset_update_issuer");
    49 => HtlcCreate(HtlcCreateOperation, "htlc_create");
    50 => HtlcRedeem(HtlcRedeemOperation, "htlc_redeem");
    51 => HtlcRedeemed(HtlcRedeemedOperation, "htlc_redeemed");
    52 => HtlcExtend(HtlcExtendOperation, "htlc_extend");
    53 => HtlcRefund(HtlcRefundOperation, "htlc_refund");
    54 => CustomAuthorityCreate(CustomAuthorityCreateOperation, "custom_authority_create");
    55 => CustomAuthorityUpdate(CustomAuthorityUpdateOperation, "custom_authority_update");
    56 => CustomAuthorityDelete(CustomAuthorityDeleteOperation, "custom_authority_delete");
    57 => TicketCreate(TicketCreateOperation, "ticket_create");
    58 => TicketUpdate(TicketUpdateOperation, "ticket_update");
    59 => LiquidityPoolCreate(LiquidityPoolCreateOperation, "liquidity_pool_create");
    60 => LiquidityPoolDelete(LiquidityPoolDeleteOperation, "liquidity_pool_delete");
    61 => LiquidityPoolDeposit(LiquidityPoolDepositOperation, "liquidity_pool_deposit");
    62 => LiquidityPoolWithdraw(LiquidityPoolWithdrawOperation, "liquidity_pool_withdraw");
    63 => LiquidityPoolExchange(LiquidityPoolExchangeOperation, "liquidity_pool_exchange");
    64 => SametFundCreate(SametFundCreateOperation, "samet_fund_create");
    65 => SametFundDelete(SametFundDeleteOperation, "samet_fund_delete");
    66 => SametFundUpdate(SametFundUpdateOperation, "samet_fund_update");
    67 => SametFundBorrow(SametFundBorrowOperation, "samet_fund_borrow");
    68 => SametFundRepay(SametFundRepayOperation, "samet_fund_repay");
    69 => CreditOfferCreate(CreditOfferCreateOperation, "credit_offer_create");
    70 => CreditOfferDelete(CreditOfferDeleteOperation, "credit_offer_delete");
    71 => CreditOfferUpdate(CreditOfferUpdateOperation, "credit_offer_update");
    72 => CreditOfferAccept(CreditOfferAcceptOperation, "credit_offer_accept");
    73 => CreditDealRepay(CreditDealRepayOperation, "credit_deal_repay");
    74 => CreditDealExpired(CreditDealExpiredOperation, "credit_deal_expired");
    75 => LiquidityPoolUpdate(LiquidityPoolUpdateOperation, "liquidity_pool_update");
    76 => CreditDealUpdate(CreditDealUpdateOperation, "credit_deal_update");
    77 => LimitOrderUpdate(LimitOrderUpdateOperation, "limit_order_update");
    78 => TankCreate(TankCreateOperation, "tank_create");
    79 => TankUpdate(TankUpdateOperation, "tank_update");
    80 => TankDelete(TankDeleteOperation, "tank_delete");
    81 => TankQuery(TankQueryOperation, "tank_query");
    82 => TapOpen(TapOpenOperation, "tap_open");
    83 => TapConnect(TapConnectOperation, "tap_connect");
    84 => AccountFundConnection(AccountFundConnectionOperation, "account_fund_connection");
    85 => ConnectionFundAccount(ConnectionFundAccountOperation, "connection_fund_account");
}

impl OperationKind {
    /// Virtual operations are produced by the chain itself and never appear in
    /// user-submitted transactions.
    #[must_use]
    pub const fn is_virtual(self) -> bool {
        matches!(
            self,
            Self::FillOrder
                | Self::AssetSettleCancel
                | Self::FbaDistribute
                | Self::ExecuteBid
                | Self::HtlcRedeemed
                | Self::HtlcRefund
                | Self::CreditDealExpired
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix("_operation").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ProtocolError::UnknownOperationName {
                name: s.to_string(),
            })
    }
}

impl TryFrom<OperationTag> for OperationKind {
    type Error = ProtocolError;

    fn try_from(tag: OperationTag) -> Result<Self, Self::Error> {
        Self::from_tag(tag)
    }
}

impl Operation {
    /// The registry tag of the active variant.
    #[must_use]
    pub const fn which(&self) -> OperationTag {
        self.kind().tag()
    }

    /// Operations carried inside this one; empty unless this is a proposal.
    pub fn proposed_operations(&self) -> impl Iterator<Item = &Operation> {
        let wrapped: &[OperationWrapper] = match self {
            Operation::ProposalCreate(proposal) => &proposal.payload.proposed_ops,
            _ => &[],
        };
        wrapped.iter().map(|wrapper| &wrapper.op)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_tuple(2, OperationSeqVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn test_from_tag_accepts_exactly_registry_tags(tag in any::<u64>()) {
            let in_range = tag < OperationKind::COUNT as OperationTag;
            prop_assert_eq!(OperationKind::from_tag(tag).is_ok(), in_range);
            if let Ok(kind) = OperationKind::from_tag(tag) {
                prop_assert_eq!(kind.tag(), tag);
            }
        }
    }

    #[test]
    fn test_tags_are_sequential() {
        for (index, kind) in OperationKind::ALL.iter().enumerate() {
            assert_eq!(kind.tag(), index as OperationTag);
            assert_eq!(OperationKind::from_tag(index as OperationTag), Ok(*kind));
        }
        assert_eq!(OperationKind::COUNT, 86);
    }

    #[test]
    fn test_from_tag_out_of_range() {
        let err = OperationKind::from_tag(OperationKind::COUNT as OperationTag).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnknownOperationTag {
                tag: 86,
                count: 86
            }
        );
        assert!(OperationKind::try_from(u64::MAX).is_err());
    }

    #[test]
    fn test_names_are_unique() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.name().parse::<OperationKind>(), Ok(*kind));
        }
        assert_eq!(
            "credit_offer_accept_operation".parse::<OperationKind>(),
            Ok(OperationKind::CreditOfferAccept)
        );
        assert!("teleport".parse::<OperationKind>().is_err());
    }

    #[test]
    fn test_virtual_operations() {
        let virtual_ops: Vec<_> = OperationKind::ALL
            .iter()
            .filter(|kind| kind.is_virtual())
            .map(|kind| kind.tag())
            .collect();
        assert_eq!(virtual_ops, vec![4, 42, 44, 46, 51, 53, 74]);
    }

    #[test]
    fn test_typed_operation_into_union() {
        let op: Operation = TicketCreateOperation::default().into();
        assert_eq!(op.kind(), OperationKind::TicketCreate);
        assert_eq!(op.which(), 57);
        assert_eq!(TicketCreateOperation::KIND, OperationKind::TicketCreate);
    }

    #[test]
    fn test_operation_wire_form() {
        let op: Operation = TransferOperation(OperationBody {
            fee: Asset {
                amount: 20,
                asset_id: 0,
            },
            payload: json!({ "memo": "hi" }),
        })
        .into();
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(
            value,
            json!([0, { "fee": { "amount": 20, "asset_id": 0 }, "payload": { "memo": "hi" } }])
        );
        let decoded: Operation = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, op);
        assert_eq!(decoded.fee().amount, 20);
    }

    #[test]
    fn test_operation_wire_form_rejects_unknown_tag() {
        let fee = json!({ "fee": { "amount": 0, "asset_id": 0 } });
        let err = serde_json::from_value::<Operation>(json!([86, fee])).unwrap_err();
        assert!(err.to_string().contains("unknown operation tag 86"));
        assert!(serde_json::from_value::<Operation>(json!([0])).is_err());
    }

    #[test]
    fn test_proposal_carries_typed_operations() {
        let value = json!([22, {
            "fee": { "amount": 2, "asset_id": 0 },
            "payload": {
                "fee_paying_account": "1.2.17",
                "proposed_ops": [
                    { "op": [69, { "fee": { "amount": 1, "asset_id": 0 } }] },
                    { "op": [0, { "fee": { "amount": 1, "asset_id": 0 } }] }
                ]
            }
        }]);
        let op: Operation = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(op.kind(), OperationKind::ProposalCreate);

        let nested: Vec<_> = op.proposed_operations().map(Operation::kind).collect();
        assert_eq!(
            nested,
            vec![OperationKind::CreditOfferCreate, OperationKind::Transfer]
        );
        let encoded = serde_json::to_value(&op).unwrap();
        assert_eq!(encoded[1]["payload"]["fee_paying_account"], "1.2.17");
        assert_eq!(serde_json::from_value::<Operation>(encoded).unwrap(), op);
    }

    #[test]
    fn test_only_proposals_nest_operations() {
        let proposal: Operation = ProposalCreateOperation::new(
            Asset::default(),
            [Operation::default_for(OperationKind::TicketCreate)],
        )
        .into();
        assert_eq!(proposal.proposed_operations().count(), 1);

        for kind in OperationKind::ALL {
            let op = Operation::default_for(*kind);
            assert_eq!(op.kind(), *kind);
            assert_eq!(op.proposed_operations().count(), 0);
        }
    }
}
