//! Certificates: stake registration/delegation, stake pool lifecycle,
//! governance committee/DRep credentials, and the legacy genesis-delegate
//! and instantaneous-reward certificates carried for backward
//! compatibility with pre-Conway transactions.
//!
//! `Certificate` is a `#[cbor(flat)]` enum spanning the full 0-18 tag
//! range: the current 17 governance/stake/pool variants (tags 0-4, 7-18)
//! plus the two legacy variants still decodable from pre-Conway
//! transactions (`GenesisKeyDelegation` at tag 5,
//! `MoveInstantaneousRewardsCert` at tag 6).

use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::{KeyValuePairs, Set};
use serde::{Deserialize, Serialize};

use crate::governance::Anchor;
use crate::{
    AddrKeyhash, Coin, Epoch, GenesisDelegateHash, Genesishash, PoolKeyhash, PoolMetadata,
    RewardAccount, ScriptHash, StakeCredential, UnitInterval, VrfKeyhash,
};

pub type DRepCredential = StakeCredential;
pub type CommitteeColdCredential = StakeCredential;
pub type CommitteeHotCredential = StakeCredential;

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
#[cbor(flat)]
pub enum DRep {
    #[n(0)]
    Key(#[n(0)] AddrKeyhash),
    #[n(1)]
    Script(#[n(0)] ScriptHash),
    #[n(2)]
    Abstain,
    #[n(3)]
    NoConfidence,
}

#[derive(Debug, PartialEq, PartialOrd, Clone, Serialize, Deserialize)]
pub enum InstantaneousRewardSource {
    Reserves,
    Treasury,
}

impl<'b, C> Decode<'b, C> for InstantaneousRewardSource {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.u32()? {
            0 => Ok(Self::Reserves),
            1 => Ok(Self::Treasury),
            other => Err(minicbor::decode::Error::message(format!(
                "invalid instantaneous reward source variant {other}"
            ))),
        }
    }
}

impl<C> Encode<C> for InstantaneousRewardSource {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let variant = match self {
            Self::Reserves => 0,
            Self::Treasury => 1,
        };
        e.u32(variant)?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, PartialOrd, Clone, Serialize, Deserialize)]
pub enum InstantaneousRewardTarget {
    StakeCredentials(KeyValuePairs<StakeCredential, i64>),
    OtherAccountingPot(Coin),
}

impl<'b, C> Decode<'b, C> for InstantaneousRewardTarget {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                Ok(Self::StakeCredentials(d.decode_with(ctx)?))
            }
            _ => Ok(Self::OtherAccountingPot(d.decode_with(ctx)?)),
        }
    }
}

impl<C> Encode<C> for InstantaneousRewardTarget {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Self::StakeCredentials(a) => e.encode_with(a, ctx).map(|_| ()),
            Self::OtherAccountingPot(a) => e.encode_with(a, ctx).map(|_| ()),
        }
    }
}

#[derive(Encode, Decode, Debug, PartialEq, PartialOrd, Clone, Serialize, Deserialize)]
pub struct MoveInstantaneousReward {
    #[n(0)]
    pub source: InstantaneousRewardSource,

    #[n(1)]
    pub target: InstantaneousRewardTarget,
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[cbor(flat)]
pub enum Certificate {
    #[n(0)]
    StakeRegistration(#[n(0)] StakeCredential),
    #[n(1)]
    StakeDeregistration(#[n(0)] StakeCredential),
    #[n(2)]
    StakeDelegation(#[n(0)] StakeCredential, #[n(1)] PoolKeyhash),
    #[n(3)]
    PoolRegistration {
        #[n(0)]
        operator: PoolKeyhash,
        #[n(1)]
        vrf_keyhash: VrfKeyhash,
        #[n(2)]
        pledge: Coin,
        #[n(3)]
        cost: Coin,
        #[n(4)]
        margin: UnitInterval,
        #[n(5)]
        reward_account: RewardAccount,
        #[n(6)]
        pool_owners: Set<AddrKeyhash>,
        #[n(7)]
        relays: Vec<crate::Relay>,
        #[n(8)]
        pool_metadata: Option<PoolMetadata>,
    },
    #[n(4)]
    PoolRetirement(#[n(0)] PoolKeyhash, #[n(1)] Epoch),

    /// Shelley-era genesis-delegate-key rotation. Superseded by hard forks,
    /// kept only because it occupies tag 5 in transactions already on
    /// chain.
    #[n(5)]
    GenesisKeyDelegation(
        #[n(0)] Genesishash,
        #[n(1)] GenesisDelegateHash,
        #[n(2)] VrfKeyhash,
    ),
    /// Shelley/Allegra/Mary-era MIR certificate. Disabled on mainnet since
    /// Alonzo but still a valid tag-6 shape for historical transactions.
    #[n(6)]
    MoveInstantaneousRewardsCert(#[n(0)] MoveInstantaneousReward),

    #[n(7)]
    Reg(#[n(0)] StakeCredential, #[n(1)] Coin),
    #[n(8)]
    UnReg(#[n(0)] StakeCredential, #[n(1)] Coin),
    #[n(9)]
    VoteDeleg(#[n(0)] StakeCredential, #[n(1)] DRep),
    #[n(10)]
    StakeVoteDeleg(#[n(0)] StakeCredential, #[n(1)] PoolKeyhash, #[n(2)] DRep),
    #[n(11)]
    StakeRegDeleg(#[n(0)] StakeCredential, #[n(1)] PoolKeyhash, #[n(2)] Coin),
    #[n(12)]
    VoteRegDeleg(#[n(0)] StakeCredential, #[n(1)] DRep, #[n(2)] Coin),
    #[n(13)]
    StakeVoteRegDeleg(
        #[n(0)] StakeCredential,
        #[n(1)] PoolKeyhash,
        #[n(2)] DRep,
        #[n(3)] Coin,
    ),

    #[n(14)]
    AuthCommitteeHot(
        #[n(0)] CommitteeColdCredential,
        #[n(1)] CommitteeHotCredential,
    ),
    #[n(15)]
    ResignCommitteeCold(#[n(0)] CommitteeColdCredential, #[n(1)] Option<Anchor>),
    #[n(16)]
    RegDRepCert(#[n(0)] DRepCredential, #[n(1)] Coin, #[n(2)] Option<Anchor>),
    #[n(17)]
    UnRegDRepCert(#[n(0)] DRepCredential, #[n(1)] Coin),
    #[n(18)]
    UpdateDRepCert(#[n(0)] DRepCredential, #[n(1)] Option<Anchor>),
}
