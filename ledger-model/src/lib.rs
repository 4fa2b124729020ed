//! Ledger data model and CBOR codec for the on-chain transaction format:
//! transaction bodies, witness sets, certificates, governance actions,
//! scripts and the primitive types they are built from.
//!
//! Every type here round-trips through [`minicbor`] using the schema
//! validation facade in `codec_core::validate` for hand-written decoders,
//! and `#[derive(Encode, Decode)]` with `codec-core`'s `Set`/`KeepRaw`
//! wrappers everywhere else.
//!
//! Block, header and KES/operational-certificate types are out of scope:
//! this crate models a transaction and the values reachable from it, not
//! chain-level block production.

pub mod auxiliary_data;
pub mod certificates;
pub mod governance;
pub mod json;
pub mod metadatum;
pub mod native_script;
pub mod plutus_data;
pub mod protocol_params;
pub mod script_data;
pub mod transaction;
pub mod transaction_body;
pub mod transaction_output;
pub mod voting;
pub mod witness_set;

pub use auxiliary_data::{AuxiliaryData, PostAlonzoAuxiliaryData};
pub use certificates::Certificate;
pub use governance::{Anchor, Constitution, GovAction, GovActionId};
pub use metadatum::{Metadata, Metadatum, MetadatumLabel};
pub use native_script::NativeScript;
pub use plutus_data::{BigInt, BoundedBytes, Constr, PlutusData};
pub use protocol_params::{
    CostModels, DRepVotingThresholds, ExUnitPrices, PoolVotingThresholds, ProtocolParamUpdate,
    Update,
};
pub use script_data::{LanguageViews, ScriptData};
pub use transaction::Tx;
pub use transaction_body::TransactionBody;
pub use transaction_output::{
    DatumOption, LegacyTransactionOutput, Mint, Multiasset, PostAlonzoTransactionOutput,
    ScriptRef, TransactionOutput, Value,
};
pub use voting::{Vote, Voter, VotingProcedure, VotingProcedures};
pub use witness_set::{Redeemer, RedeemerTag, Redeemers, RedeemersKey, RedeemersValue, WitnessSet};

pub use codec_core::utils::{
    AnyUInt, Bytes, Int, KeepRaw, KeyValuePairs, MaybeIndefArray, NonEmptyKeyValuePairs,
    NonEmptySet, NonZeroInt, Nullable, PositiveCoin, Set,
};
pub use codec_core::{codec_by_datatype, Fragment};
pub use ledger_crypto::hash::Hash;

use codec_core::error::DecodeError;
use codec_core::minicbor::{self, data::Tag, Decode, Encode};
use codec_core::validate::DecoderExt;
use serde::{Deserialize, Serialize};

// ----- Common type definitions

pub type AddrKeyhash = Hash<28>;

pub type AssetName = Bytes;

pub type Coin = u64;

pub type CostModel = Vec<i64>;

pub type DatumHash = Hash<32>;

pub type DnsName = String;

pub type Epoch = u64;

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, Copy)]
pub struct ExUnits {
    #[n(0)]
    pub mem: u64,

    #[n(1)]
    pub steps: u64,
}

pub type Genesishash = Bytes;

pub type GenesisDelegateHash = Bytes;

pub type IPv4 = Bytes;

pub type IPv6 = Bytes;

#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy,
)]
#[cbor(index_only)]
pub enum NetworkId {
    #[n(0)]
    Testnet,
    #[n(1)]
    Mainnet,
}

impl From<NetworkId> for u8 {
    fn from(network_id: NetworkId) -> u8 {
        match network_id {
            NetworkId::Testnet => 0,
            NetworkId::Mainnet => 1,
        }
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = DecodeError;

    fn try_from(i: u8) -> Result<Self, Self::Error> {
        match i {
            0 => Ok(Self::Testnet),
            1 => Ok(Self::Mainnet),
            other => Err(DecodeError::InvalidCborValue {
                validator: "NetworkId".into(),
                reason: format!("{other} is not 0 (testnet) or 1 (mainnet)"),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct Nonce {
    #[n(0)]
    pub variant: NonceVariant,

    #[n(1)]
    pub hash: Option<Hash<32>>,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
#[cbor(index_only)]
pub enum NonceVariant {
    #[n(0)]
    NeutralNonce,

    #[n(1)]
    Nonce,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
#[cbor(transparent)]
pub struct PlutusScript<const VERSION: usize>(#[n(0)] pub Bytes);

impl<const VERSION: usize> AsRef<[u8]> for PlutusScript<VERSION> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

pub type PolicyId = Hash<28>;

pub type PoolKeyhash = Hash<28>;

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct PoolMetadata {
    #[n(0)]
    pub url: String,

    #[n(1)]
    pub hash: PoolMetadataHash,
}

pub type PoolMetadataHash = Hash<32>;

pub type Port = u32;

pub type PositiveInterval = RationalNumber;

pub type ProtocolVersion = (u64, u64);

/// `rational_number = #6.30([numerator : uint, denominator : uint])`, always
/// tagged 30, always a 2-element array. Decoding validates both through
/// [`DecoderExt`] rather than trusting whatever the derive macro would accept
/// for a bare tuple.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct RationalNumber {
    pub numerator: u64,
    pub denominator: u64,
}

impl<'b, C> minicbor::decode::Decode<'b, C> for RationalNumber {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.expect_tag("RationalNumber", Tag::new(30))?;
        d.expect_array_of("RationalNumber", 2)?;
        let numerator = d.decode_with(ctx)?;
        let denominator = d.decode_with(ctx)?;
        Ok(RationalNumber {
            numerator,
            denominator,
        })
    }
}

impl<C> minicbor::encode::Encode<C> for RationalNumber {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.tag(Tag::new(30))?;
        e.array(2)?;
        e.encode_with(self.numerator, ctx)?;
        e.encode_with(self.denominator, ctx)?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Relay {
    SingleHostAddr(Nullable<Port>, Nullable<IPv4>, Nullable<IPv6>),
    SingleHostName(Nullable<Port>, DnsName),
    MultiHostName(DnsName),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for Relay {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(Relay::SingleHostAddr(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            1 => Ok(Relay::SingleHostName(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            2 => Ok(Relay::MultiHostName(d.decode_with(ctx)?)),
            other => Err(DecodeError::InvalidCborValue {
                validator: "Relay".into(),
                reason: format!("{other} is not a known relay variant"),
            }
            .into()),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for Relay {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Relay::SingleHostAddr(a, b, c) => {
                e.array(4)?;
                e.encode_with(0, ctx)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            Relay::SingleHostName(a, b) => {
                e.array(3)?;
                e.encode_with(1, ctx)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Relay::MultiHostName(a) => {
                e.array(2)?;
                e.encode_with(2, ctx)?;
                e.encode_with(a, ctx)?;
            }
        }
        Ok(())
    }
}

pub type RewardAccount = Bytes;

pub type ScriptHash = Hash<28>;

#[derive(
    Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Hash, Encode, Decode,
)]
#[cbor(flat)]
pub enum StakeCredential {
    #[n(0)]
    AddrKeyhash(#[n(0)] AddrKeyhash),
    #[n(1)]
    ScriptHash(#[n(0)] ScriptHash),
}

pub type TransactionIndex = u32;

#[derive(
    Serialize,
    Deserialize,
    Encode,
    Decode,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    std::hash::Hash,
)]
pub struct TransactionInput {
    #[n(0)]
    pub transaction_id: Hash<32>,

    #[n(1)]
    pub index: u64,
}

pub type UnitInterval = RationalNumber;

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct VrfCert(#[n(0)] pub Bytes, #[n(1)] pub Bytes);

pub type VrfKeyhash = Hash<32>;
