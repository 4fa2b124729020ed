//! Native (multi-signature) scripts.
//!
//! The JSON projection uses the same string-discriminator shape
//! (`"before"`/`"after"`/`"sig"`/`"all"`/`"any"`/`"atLeast"`) that
//! `cardano-cli`-compatible script files expect, in both directions.

use codec_core::error::DecodeError;
use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::MaybeIndefArray;
use serde::{Deserialize, Serialize};

use crate::AddrKeyhash;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum NativeScript {
    ScriptPubkey(AddrKeyhash),
    ScriptAll(Vec<NativeScript>),
    ScriptAny(Vec<NativeScript>),
    ScriptNOfK(u32, Vec<NativeScript>),
    InvalidBefore(u64),
    InvalidHereafter(u64),
}

impl<'b, C> Decode<'b, C> for NativeScript {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u32()?;

        let script = match variant {
            0 => Self::ScriptPubkey(d.decode_with(ctx)?),
            1 => Self::ScriptAll(decode_scripts(d, ctx)?),
            2 => Self::ScriptAny(decode_scripts(d, ctx)?),
            3 => Self::ScriptNOfK(d.decode_with(ctx)?, decode_scripts(d, ctx)?),
            4 => Self::InvalidBefore(d.decode_with(ctx)?),
            5 => Self::InvalidHereafter(d.decode_with(ctx)?),
            other => {
                return Err(DecodeError::InvalidNativeScriptType(other as u64).into());
            }
        };
        Ok(script)
    }
}

fn decode_scripts<'b, C>(
    d: &mut minicbor::Decoder<'b>,
    ctx: &mut C,
) -> Result<Vec<NativeScript>, minicbor::decode::Error> {
    let inner: MaybeIndefArray<NativeScript> = d.decode_with(ctx)?;
    Ok(inner.into())
}

impl<C> Encode<C> for NativeScript {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            NativeScript::ScriptPubkey(v) => {
                e.array(2)?;
                e.encode_with(0, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::ScriptAll(v) => {
                e.array(2)?;
                e.encode_with(1, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::ScriptAny(v) => {
                e.array(2)?;
                e.encode_with(2, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::ScriptNOfK(n, v) => {
                e.array(3)?;
                e.encode_with(3, ctx)?;
                e.encode_with(n, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::InvalidBefore(v) => {
                e.array(2)?;
                e.encode_with(4, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::InvalidHereafter(v) => {
                e.array(2)?;
                e.encode_with(5, ctx)?;
                e.encode_with(v, ctx)?;
            }
        }
        Ok(())
    }
}

impl NativeScript {
    /// `Blake2b224(0x00 ++ cbor(script))`, the native-script-hash preimage
    /// tag is `0x00`, distinguishing it from the Plutus V1/V2/V3 tags
    /// (`0x01`/`0x02`/`0x03`) used for the same hash space.
    pub fn hash(&self) -> crate::ScriptHash {
        ledger_crypto::hash::Hasher::<224>::hash_tagged_cbor(self, 0)
    }
}

#[cfg(feature = "json")]
impl crate::json::ToCanonicalJson for NativeScript {
    fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            NativeScript::ScriptPubkey(key_hash) => json!({
                "type": "sig",
                "keyHash": key_hash.to_string(),
            }),
            NativeScript::ScriptAll(scripts) => json!({
                "type": "all",
                "scripts": scripts.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
            }),
            NativeScript::ScriptAny(scripts) => json!({
                "type": "any",
                "scripts": scripts.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
            }),
            NativeScript::ScriptNOfK(n, scripts) => json!({
                "type": "atLeast",
                "required": n,
                "scripts": scripts.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
            }),
            NativeScript::InvalidBefore(slot) => json!({
                "type": "before",
                "slot": slot,
            }),
            NativeScript::InvalidHereafter(slot) => json!({
                "type": "after",
                "slot": slot,
            }),
        }
    }
}

#[cfg(feature = "json")]
impl NativeScript {
    /// Parses the inverse of [`crate::json::ToCanonicalJson::to_json`]: the
    /// string-discriminated object shape used by `cardano-cli`'s native
    /// script files.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DecodeError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DecodeError::InvalidJson("native script must be an object".into()))?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DecodeError::InvalidJson("missing native script \"type\"".into()))?;

        match ty {
            "sig" => {
                let key_hash = obj
                    .get("keyHash")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| DecodeError::InvalidJson("sig script missing keyHash".into()))?;
                let bytes = hex::decode(key_hash)
                    .map_err(|e| DecodeError::InvalidJson(format!("bad keyHash hex: {e}")))?;
                let hash: [u8; 28] = bytes
                    .try_into()
                    .map_err(|_| DecodeError::InvalidJson("keyHash must be 28 bytes".into()))?;
                Ok(NativeScript::ScriptPubkey(hash.into()))
            }
            "all" => Ok(NativeScript::ScriptAll(parse_script_list(obj)?)),
            "any" => Ok(NativeScript::ScriptAny(parse_script_list(obj)?)),
            "atLeast" => {
                let required = obj
                    .get("required")
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| DecodeError::InvalidJson("atLeast missing required".into()))?;
                Ok(NativeScript::ScriptNOfK(
                    required as u32,
                    parse_script_list(obj)?,
                ))
            }
            "before" => Ok(NativeScript::InvalidBefore(parse_slot(obj)?)),
            "after" => Ok(NativeScript::InvalidHereafter(parse_slot(obj)?)),
            other => Err(DecodeError::InvalidJson(format!(
                "unknown native script type {other:?}"
            ))),
        }
    }
}

#[cfg(feature = "json")]
fn parse_slot(obj: &serde_json::Map<String, serde_json::Value>) -> Result<u64, DecodeError> {
    obj.get("slot")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| DecodeError::InvalidJson("missing slot".into()))
}

#[cfg(feature = "json")]
fn parse_script_list(
    obj: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<NativeScript>, DecodeError> {
    obj.get("scripts")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DecodeError::InvalidJson("missing scripts array".into()))?
        .iter()
        .map(NativeScript::from_json)
        .collect()
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::json::ToCanonicalJson;

    #[test]
    fn json_roundtrip_all_of_sig_and_before() {
        let script = NativeScript::ScriptAll(vec![
            NativeScript::ScriptPubkey([9u8; 28].into()),
            NativeScript::InvalidBefore(100),
        ]);
        let json = script.to_json();
        let back = NativeScript::from_json(&json).unwrap();
        assert_eq!(script, back);
    }

    #[test]
    fn hash_is_stable() {
        let script = NativeScript::ScriptPubkey([1u8; 28].into());
        assert_eq!(script.hash(), script.hash());
    }
}
