//! Transaction outputs: addresses, values, datums and reference scripts.
//!
//! `Value`/`Multiasset`/`Mint` are grounded on `alonzo/model.rs`'s
//! hand-written `Value` decoder (dispatching on the CBOR major type: a
//! bare uint is ada-only, an array is the multi-asset form).
//! `TransactionOutput`'s Legacy/PostAlonzo split, `DatumOption` and
//! `ScriptRef`/`Script` are grounded on `babbage/model.rs`'s concrete
//! (non-generic) versions, generalized to carry a single Plutus script
//! type parameterized by version rather than babbage's separate
//! `PlutusV1Script`/`PlutusV2Script` fields.

use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::{Bytes, CborWrap, KeyValuePairs, NonZeroInt};
use serde::{Deserialize, Serialize};

use crate::native_script::NativeScript;
use crate::plutus_data::PlutusData;
use crate::{Coin, DatumHash, PlutusScript, PolicyId};

pub type AssetName = Bytes;

pub type Multiasset<A> = KeyValuePairs<PolicyId, KeyValuePairs<AssetName, A>>;

pub type Mint = Multiasset<NonZeroInt>;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Value {
    Coin(Coin),
    Multiasset(Coin, Multiasset<Coin>),
}

impl<'b, C> Decode<'b, C> for Value {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            minicbor::data::Type::U8
            | minicbor::data::Type::U16
            | minicbor::data::Type::U32
            | minicbor::data::Type::U64 => Ok(Value::Coin(d.decode_with(ctx)?)),
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                d.array()?;
                let coin = d.decode_with(ctx)?;
                let multiasset = d.decode_with(ctx)?;
                Ok(Value::Multiasset(coin, multiasset))
            }
            _ => Err(minicbor::decode::Error::message(
                "unknown cbor data type for transaction output value",
            )),
        }
    }
}

impl<C> Encode<C> for Value {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Value::Coin(coin) => {
                e.encode_with(coin, ctx)?;
            }
            Value::Multiasset(coin, other) => {
                e.array(2)?;
                e.encode_with(coin, ctx)?;
                e.encode_with(other, ctx)?;
            }
        }
        Ok(())
    }
}

#[derive(Encode, Decode, Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LegacyTransactionOutput {
    #[n(0)]
    pub address: Bytes,

    #[n(1)]
    pub amount: Value,

    #[n(2)]
    pub datum_hash: Option<DatumHash>,
}

#[derive(Encode, Decode, Debug, PartialEq, Clone, Serialize, Deserialize)]
#[cbor(map)]
pub struct PostAlonzoTransactionOutput {
    #[n(0)]
    pub address: Bytes,

    #[n(1)]
    pub value: Value,

    #[n(2)]
    pub datum_option: Option<DatumOption>,

    #[n(3)]
    pub script_ref: Option<ScriptRef>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum TransactionOutput {
    Legacy(LegacyTransactionOutput),
    PostAlonzo(PostAlonzoTransactionOutput),
}

impl<'b, C> Decode<'b, C> for TransactionOutput {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                Ok(TransactionOutput::Legacy(d.decode_with(ctx)?))
            }
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                Ok(TransactionOutput::PostAlonzo(d.decode_with(ctx)?))
            }
            _ => Err(minicbor::decode::Error::message(
                "invalid type for transaction output",
            )),
        }
    }
}

impl<C> Encode<C> for TransactionOutput {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            TransactionOutput::Legacy(x) => e.encode_with(x, ctx).map(|_| ()),
            TransactionOutput::PostAlonzo(x) => e.encode_with(x, ctx).map(|_| ()),
        }
    }
}

pub type Data = CborWrap<PlutusData>;

/// `datum_option = [ 0, $hash32 // 1, data ]`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DatumOption {
    Hash(DatumHash),
    Data(Data),
}

impl<'b, C> Decode<'b, C> for DatumOption {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        match d.u8()? {
            0 => Ok(Self::Hash(d.decode_with(ctx)?)),
            1 => Ok(Self::Data(d.decode_with(ctx)?)),
            other => Err(minicbor::decode::Error::message(format!(
                "invalid variant {other} for datum option"
            ))),
        }
    }
}

impl<C> Encode<C> for DatumOption {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Self::Hash(x) => {
                e.array(2)?;
                e.encode_with(0, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::Data(x) => {
                e.array(2)?;
                e.encode_with(1, ctx)?;
                e.encode_with(x, ctx)?;
            }
        }
        Ok(())
    }
}

/// `script_ref = #6.24(bytes .cbor script)`
pub type ScriptRef = CborWrap<Script>;

/// `script = [ 0, native_script // 1, plutus_v1_script // 2, plutus_v2_script // 3, plutus_v3_script ]`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Script {
    NativeScript(NativeScript),
    PlutusV1Script(PlutusScript<1>),
    PlutusV2Script(PlutusScript<2>),
    PlutusV3Script(PlutusScript<3>),
}

impl<'b, C> Decode<'b, C> for Script {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        match d.u8()? {
            0 => Ok(Self::NativeScript(d.decode_with(ctx)?)),
            1 => Ok(Self::PlutusV1Script(d.decode_with(ctx)?)),
            2 => Ok(Self::PlutusV2Script(d.decode_with(ctx)?)),
            3 => Ok(Self::PlutusV3Script(d.decode_with(ctx)?)),
            other => Err(minicbor::decode::Error::message(format!(
                "invalid variant {other} for reference script"
            ))),
        }
    }
}

impl<C> Encode<C> for Script {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Self::NativeScript(x) => {
                e.array(2)?;
                e.encode_with(0, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::PlutusV1Script(x) => {
                e.array(2)?;
                e.encode_with(1, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::PlutusV2Script(x) => {
                e.array(2)?;
                e.encode_with(2, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::PlutusV3Script(x) => {
                e.array(2)?;
                e.encode_with(3, ctx)?;
                e.encode_with(x, ctx)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_coin_only_decodes_from_bare_uint() {
        let mut buf = Vec::new();
        minicbor::Encoder::new(&mut buf).u64(1_000_000).unwrap();
        let value: Value = minicbor::decode(&buf).unwrap();
        assert_eq!(value, Value::Coin(1_000_000));
    }

    #[test]
    fn legacy_output_is_array_encoded() {
        let out = TransactionOutput::Legacy(LegacyTransactionOutput {
            address: vec![0u8; 29].into(),
            amount: Value::Coin(5),
            datum_hash: None,
        });
        let bytes = minicbor::to_vec(&out).unwrap();
        let decoded: TransactionOutput = minicbor::decode(&bytes).unwrap();
        assert_eq!(out, decoded);
    }

    #[test]
    fn post_alonzo_output_is_map_encoded() {
        let out = TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
            address: vec![0u8; 29].into(),
            value: Value::Coin(5),
            datum_option: Some(DatumOption::Hash([1u8; 32].into())),
            script_ref: None,
        });
        let bytes = minicbor::to_vec(&out).unwrap();
        let decoded: TransactionOutput = minicbor::decode(&bytes).unwrap();
        assert_eq!(out, decoded);
    }
}
