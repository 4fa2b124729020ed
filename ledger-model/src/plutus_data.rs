//! Plutus `Data` tree: the untyped term format passed to scripts as
//! datums and redeemers.
//!
//! Grounded on `alonzo/model.rs`'s `PlutusData`/`BigInt`/`Constr` and the
//! canonical-encoding version in `plutus_data.rs`, which mimics the
//! encoding quirks of the Haskell `cborg`/`plutus` reference: definite
//! arrays for empty lists and maps, indefinite arrays otherwise, and a
//! 64-byte chunking threshold for bytestrings.

use std::fmt;
use std::ops::Deref;

use num_bigint::BigInt as ArbitraryBigInt;
use serde::{Deserialize, Serialize};

use codec_core::minicbor::data::{IanaTag, Tag, Type};
use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::KeyValuePairs;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum PlutusData {
    Constr(Constr<PlutusData>),
    Map(KeyValuePairs<PlutusData, PlutusData>),
    BigInt(BigInt),
    BoundedBytes(BoundedBytes),
    Array(Vec<PlutusData>),
}

impl<'b, C> Decode<'b, C> for PlutusData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            Type::Tag => {
                let mut probe = d.probe();
                let tag = probe.tag()?;

                if tag == IanaTag::PosBignum.tag() || tag == IanaTag::NegBignum.tag() {
                    Ok(Self::BigInt(d.decode_with(ctx)?))
                } else {
                    match tag.as_u64() {
                        (121..=127) | (1280..=1400) | 102 => Ok(Self::Constr(d.decode_with(ctx)?)),
                        _ => Err(minicbor::decode::Error::message(
                            "unknown tag for plutus data",
                        )),
                    }
                }
            }
            Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32
            | Type::I64 | Type::Int => Ok(Self::BigInt(d.decode_with(ctx)?)),
            Type::Map | Type::MapIndef => Ok(Self::Map(d.decode_with(ctx)?)),
            Type::Bytes => Ok(Self::BoundedBytes(d.decode_with(ctx)?)),
            Type::BytesIndef => {
                let mut full = Vec::new();
                for slice in d.bytes_iter()? {
                    full.extend(slice?);
                }
                Ok(Self::BoundedBytes(BoundedBytes::from(full)))
            }
            Type::Array | Type::ArrayIndef => Ok(Self::Array(d.decode_with(ctx)?)),
            other => Err(minicbor::decode::Error::message(format!(
                "bad cbor data type ({other:?}) for plutus data"
            ))),
        }
    }
}

impl<C> Encode<C> for PlutusData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Self::Constr(a) => e.encode_with(a, ctx).map(|_| ()),
            Self::Map(a) => {
                // Definite-length map to match the canonical plutus encoder.
                e.map(a.len().try_into().unwrap())?;
                for (k, v) in a.iter() {
                    k.encode(e, ctx)?;
                    v.encode(e, ctx)?;
                }
                Ok(())
            }
            Self::BigInt(a) => e.encode_with(a, ctx).map(|_| ()),
            Self::BoundedBytes(a) => e.encode_with(a, ctx).map(|_| ()),
            Self::Array(a) => encode_list(a, e, ctx),
        }
    }
}

/// `big_int = int / big_uint / big_nint`, with `big_uint = #6.2(bounded_bytes)`
/// and `big_nint = #6.3(bounded_bytes)`. Carries arbitrary-precision values
/// via [`num_bigint::BigInt`] rather than a fixed-width integer. The Plutus
/// ledger rule that rejects integers wider than 64 bytes is enforced by
/// [`BoundedBytes`], not by this type.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum BigInt {
    Int(ArbitraryBigInt),
    BigUInt(BoundedBytes),
    BigNInt(BoundedBytes),
}

impl<'b, C> Decode<'b, C> for BigInt {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            Type::U8 | Type::U16 | Type::U32 | Type::U64 => {
                Ok(Self::Int(ArbitraryBigInt::from(d.u64()?)))
            }
            Type::I8 | Type::I16 | Type::I32 | Type::I64 => {
                Ok(Self::Int(ArbitraryBigInt::from(d.i64()?)))
            }
            Type::Int => {
                let i = d.int()?;
                Ok(Self::Int(ArbitraryBigInt::from(i128::from(i))))
            }
            Type::Tag => {
                let tag = d.tag()?;
                if tag == IanaTag::PosBignum.tag() {
                    Ok(Self::BigUInt(d.decode_with(ctx)?))
                } else if tag == IanaTag::NegBignum.tag() {
                    Ok(Self::BigNInt(d.decode_with(ctx)?))
                } else {
                    Err(minicbor::decode::Error::message(
                        "invalid cbor tag for plutus big int",
                    ))
                }
            }
            other => Err(minicbor::decode::Error::message(format!(
                "invalid cbor data type ({other:?}) for plutus big int"
            ))),
        }
    }
}

impl<C> Encode<C> for BigInt {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            BigInt::Int(x) => {
                if let Ok(v) = i64::try_from(x.clone()) {
                    e.encode_with(v, ctx)?;
                } else if let Ok(v) = u64::try_from(x.clone()) {
                    e.encode_with(v, ctx)?;
                } else if x.sign() == num_bigint::Sign::Minus {
                    let bytes = (-x.clone() - 1u8).to_bytes_be().1;
                    e.tag(IanaTag::NegBignum)?;
                    e.bytes(&bytes)?;
                } else {
                    let bytes = x.to_bytes_be().1;
                    e.tag(IanaTag::PosBignum)?;
                    e.bytes(&bytes)?;
                }
            }
            BigInt::BigUInt(x) => {
                e.tag(IanaTag::PosBignum)?;
                e.encode_with(x, ctx)?;
            }
            BigInt::BigNInt(x) => {
                e.tag(IanaTag::NegBignum)?;
                e.encode_with(x, ctx)?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct Constr<A> {
    pub tag: u64,
    pub any_constructor: Option<u64>,
    pub fields: Vec<A>,
}

impl<'b, C, A> Decode<'b, C> for Constr<A>
where
    A: Decode<'b, C>,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let tag = d.tag()?;
        let x = tag.as_u64();
        match x {
            121..=127 | 1280..=1400 => Ok(Constr {
                tag: x,
                fields: d.decode_with(ctx)?,
                any_constructor: None,
            }),
            102 => {
                d.array()?;
                Ok(Constr {
                    tag: x,
                    any_constructor: Some(d.decode_with(ctx)?),
                    fields: d.decode_with(ctx)?,
                })
            }
            _ => Err(minicbor::decode::Error::message(
                "bad tag code for plutus data constructor",
            )),
        }
    }
}

impl<C, A> Encode<C> for Constr<A>
where
    A: Encode<C>,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.tag(Tag::new(self.tag))?;

        match self.tag {
            102 => {
                e.array(2)?;
                e.encode_with(self.any_constructor.unwrap_or_default(), ctx)?;
                encode_list(&self.fields, e, ctx)?;
            }
            _ => {
                encode_list(&self.fields, e, ctx)?;
            }
        }
        Ok(())
    }
}

/// Plutus bytestrings, canonically encoded as in `cardano-ledger`/`plutus`:
/// a single definite byte string up to 64 bytes, chunked indefinite byte
/// strings beyond that.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct BoundedBytes(Vec<u8>);

impl From<Vec<u8>> for BoundedBytes {
    fn from(xs: Vec<u8>) -> Self {
        BoundedBytes(xs)
    }
}

impl From<BoundedBytes> for Vec<u8> {
    fn from(b: BoundedBytes) -> Self {
        b.0
    }
}

impl Deref for BoundedBytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<String> for BoundedBytes {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(BoundedBytes(hex::decode(value)?))
    }
}

impl From<BoundedBytes> for String {
    fn from(b: BoundedBytes) -> Self {
        hex::encode(b.deref())
    }
}

impl fmt::Display for BoundedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl<C> Encode<C> for BoundedBytes {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        const CHUNK_SIZE: usize = 64;
        let bs = &self.0;
        if bs.len() <= CHUNK_SIZE {
            e.bytes(bs)?;
        } else {
            e.begin_bytes()?;
            for chunk in bs.chunks(CHUNK_SIZE) {
                e.bytes(chunk)?;
            }
            e.end()?;
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for BoundedBytes {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let mut res = Vec::new();
        for chunk in d.bytes_iter()? {
            res.extend_from_slice(chunk?);
        }
        Ok(BoundedBytes::from(res))
    }
}

fn encode_list<C, W: minicbor::encode::Write, A: Encode<C>>(
    a: &[A],
    e: &mut minicbor::Encoder<W>,
    ctx: &mut C,
) -> Result<(), minicbor::encode::Error<W::Error>> {
    // Definite 0-length array for empty lists, indefinite otherwise. Mirrors
    // the default list encoder cborg/plutus uses.
    if a.is_empty() {
        e.array(0)?;
    } else {
        e.begin_array()?;
        for v in a {
            e.encode_with(v, ctx)?;
        }
        e.end()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_bytes_roundtrip_short_and_long() {
        let short = BoundedBytes::from(vec![1, 2, 3]);
        let bytes = minicbor::to_vec(&short).unwrap();
        let back: BoundedBytes = minicbor::decode(&bytes).unwrap();
        assert_eq!(short, back);

        let long = BoundedBytes::from(vec![7u8; 130]);
        let bytes = minicbor::to_vec(&long).unwrap();
        let back: BoundedBytes = minicbor::decode(&bytes).unwrap();
        assert_eq!(long, back);
    }

    #[test]
    fn empty_array_is_definite() {
        let data = PlutusData::Array(vec![]);
        let bytes = minicbor::to_vec(&data).unwrap();
        assert_eq!(bytes, vec![0x80]);
    }

    #[test]
    fn nonempty_array_is_indefinite() {
        let data = PlutusData::Array(vec![PlutusData::BigInt(BigInt::Int(1.into()))]);
        let bytes = minicbor::to_vec(&data).unwrap();
        assert_eq!(bytes[0], 0x9f);
        assert_eq!(*bytes.last().unwrap(), 0xff);
    }

    #[test]
    fn big_int_roundtrips_beyond_i64() {
        let huge = ArbitraryBigInt::from(u64::MAX) * ArbitraryBigInt::from(4u8);
        let data = BigInt::Int(huge.clone());
        let bytes = minicbor::to_vec(&data).unwrap();
        let back: BigInt = minicbor::decode(&bytes).unwrap();
        assert_eq!(data, back);
        match back {
            BigInt::BigUInt(_) => {}
            other => panic!("expected tagged bignum encoding, got {other:?}"),
        }
    }
}
