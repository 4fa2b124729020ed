//! Transaction metadata (`transaction_metadatum`).
//!
//! Grounded on `alonzo/model.rs`'s hand-written `Metadatum` decoder. The
//! bounded byte/text string size (64 bytes) is not checked on decode: any
//! string a peer managed to put on the wire is accepted as-is. It's
//! enforced on encode instead, where re-serializing an over-length value
//! is what actually fails.

use codec_core::error::EncodeError;
use codec_core::minicbor::{self, data::Type, Decode, Encode};
use codec_core::utils::{Int, KeyValuePairs};
use codec_core::validate::DecoderExt;
use serde::{Deserialize, Serialize};

pub const MAX_METADATUM_STRING_SIZE: usize = 64;

pub type MetadatumLabel = u64;

pub type Metadata = KeyValuePairs<MetadatumLabel, Metadatum>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum Metadatum {
    Int(Int),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Metadatum>),
    Map(KeyValuePairs<Metadatum, Metadatum>),
}

impl<'b, C> Decode<'b, C> for Metadatum {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            Type::U8 => Ok(Metadatum::Int(d.u8()?.into())),
            Type::U16 => Ok(Metadatum::Int(d.u16()?.into())),
            Type::U32 => Ok(Metadatum::Int(d.u32()?.into())),
            Type::U64 => Ok(Metadatum::Int(
                i64::try_from(d.u64()?)
                    .map_err(|_| minicbor::decode::Error::message("metadatum int out of range"))?
                    .into(),
            )),
            Type::I8 => Ok(Metadatum::Int(d.i8()?.into())),
            Type::I16 => Ok(Metadatum::Int(d.i16()?.into())),
            Type::I32 => Ok(Metadatum::Int(d.i32()?.into())),
            Type::I64 => Ok(Metadatum::Int(d.i64()?.into())),
            Type::Int => Ok(Metadatum::Int(Int(d.int()?))),
            Type::Bytes => {
                let bytes = d.expect_byte_string("Metadatum", None)?;
                Ok(Metadatum::Bytes(bytes.to_vec()))
            }
            Type::BytesIndef => {
                let mut full = Vec::new();
                for chunk in d.bytes_iter()? {
                    full.extend_from_slice(chunk?);
                }
                Ok(Metadatum::Bytes(full))
            }
            Type::String => {
                let text = d.expect_text_string("Metadatum", None)?;
                Ok(Metadatum::Text(text.to_string()))
            }
            Type::StringIndef => {
                let mut full = String::new();
                for chunk in d.str_iter()? {
                    full.push_str(chunk?);
                }
                Ok(Metadatum::Text(full))
            }
            Type::Array | Type::ArrayIndef => Ok(Metadatum::Array(d.decode_with(ctx)?)),
            Type::Map | Type::MapIndef => Ok(Metadatum::Map(d.decode_with(ctx)?)),
            other => Err(minicbor::decode::Error::message(format!(
                "cannot decode {other:?} as a transaction metadatum"
            ))),
        }
    }
}

impl<C> Encode<C> for Metadatum {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Metadatum::Int(a) => e.encode_with(a, ctx)?,
            Metadatum::Bytes(a) => {
                if a.len() > MAX_METADATUM_STRING_SIZE {
                    return Err(EncodeError::BoundedBytesOversize {
                        size: a.len(),
                        max: MAX_METADATUM_STRING_SIZE,
                    }
                    .into_minicbor());
                }
                e.encode_with(a, ctx)?
            }
            Metadatum::Text(a) => {
                if a.len() > MAX_METADATUM_STRING_SIZE {
                    return Err(EncodeError::BoundedBytesOversize {
                        size: a.len(),
                        max: MAX_METADATUM_STRING_SIZE,
                    }
                    .into_minicbor());
                }
                e.encode_with(a, ctx)?
            }
            Metadatum::Array(a) => e.encode_with(a, ctx)?,
            Metadatum::Map(a) => e.encode_with(a, ctx)?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_up_to_64_decode() {
        let payload = vec![0u8; MAX_METADATUM_STRING_SIZE];
        let mut buf = Vec::new();
        minicbor::Encoder::new(&mut buf).bytes(&payload).unwrap();
        let decoded: Metadatum = minicbor::decode(&buf).unwrap();
        assert_eq!(decoded, Metadatum::Bytes(payload));
    }

    #[test]
    fn bytes_over_64_decode_but_reencode_fails() {
        let payload = vec![0u8; MAX_METADATUM_STRING_SIZE + 1];
        let mut buf = Vec::new();
        minicbor::Encoder::new(&mut buf).bytes(&payload).unwrap();
        let decoded: Metadatum = minicbor::decode(&buf).unwrap();
        assert_eq!(decoded, Metadatum::Bytes(payload));

        let mut out = Vec::new();
        let result = minicbor::Encoder::new(&mut out).encode(&decoded);
        assert!(result.is_err());
    }
}
