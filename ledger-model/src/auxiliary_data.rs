//! Transaction metadata and the scripts that accompany it.
//!
//! `AuxiliaryData` has three CBOR shapes depending on era: Shelley is a bare
//! metadata map; Shelley-MA is a 2-element array of metadata plus native
//! scripts; Alonzo-forward is CBOR tag 259 wrapping a `#[cbor(map)]` struct
//! (`auxiliary_data = metadata / [ ... ] / #6.259({ ... })` per the Alonzo
//! CDDL). `PostAlonzoAuxiliaryData` is extended with a `plutus_v3_scripts`
//! field over its Babbage-era shape.

use codec_core::minicbor::{self, data::Tag, Decode, Encode};
use codec_core::utils::MaybeIndefArray;
use serde::{Deserialize, Serialize};

use crate::metadatum::Metadata;
use crate::native_script::NativeScript;
use crate::PlutusScript;

#[derive(Encode, Decode, Debug, PartialEq, Clone, Serialize, Deserialize)]
#[cbor(map)]
pub struct PostAlonzoAuxiliaryData {
    #[n(0)]
    pub metadata: Option<Metadata>,

    #[n(1)]
    pub native_scripts: Option<MaybeIndefArray<NativeScript>>,

    #[n(2)]
    pub plutus_v1_scripts: Option<MaybeIndefArray<PlutusScript<1>>>,

    #[n(3)]
    pub plutus_v2_scripts: Option<MaybeIndefArray<PlutusScript<2>>>,

    #[n(4)]
    pub plutus_v3_scripts: Option<MaybeIndefArray<PlutusScript<3>>>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum AuxiliaryData {
    Shelley(Metadata),
    ShelleyMa {
        transaction_metadata: Metadata,
        auxiliary_scripts: Option<MaybeIndefArray<NativeScript>>,
    },
    PostAlonzo(PostAlonzoAuxiliaryData),
}

impl<'b, C> Decode<'b, C> for AuxiliaryData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                Ok(AuxiliaryData::Shelley(d.decode_with(ctx)?))
            }
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                d.array()?;
                let transaction_metadata = d.decode_with(ctx)?;
                let auxiliary_scripts = d.decode_with(ctx)?;
                Ok(AuxiliaryData::ShelleyMa {
                    transaction_metadata,
                    auxiliary_scripts,
                })
            }
            minicbor::data::Type::Tag => {
                d.tag()?;
                Ok(AuxiliaryData::PostAlonzo(d.decode_with(ctx)?))
            }
            _ => Err(minicbor::decode::Error::message(
                "cannot infer auxiliary data variant from cbor data type",
            )),
        }
    }
}

impl<C> Encode<C> for AuxiliaryData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            AuxiliaryData::Shelley(m) => {
                e.encode_with(m, ctx)?;
            }
            AuxiliaryData::ShelleyMa {
                transaction_metadata,
                auxiliary_scripts,
            } => {
                e.array(2)?;
                e.encode_with(transaction_metadata, ctx)?;
                e.encode_with(auxiliary_scripts, ctx)?;
            }
            AuxiliaryData::PostAlonzo(v) => {
                e.tag(Tag::Unassigned(259))?;
                e.encode_with(v, ctx)?;
            }
        }
        Ok(())
    }
}

impl AuxiliaryData {
    pub fn hash(&self) -> ledger_crypto::hash::Hash<32> {
        ledger_crypto::hash::Hasher::<256>::hash_cbor(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_core::utils::KeyValuePairs;

    #[test]
    fn shelley_variant_round_trips() {
        let data = AuxiliaryData::Shelley(KeyValuePairs::from(vec![]));
        let bytes = minicbor::to_vec(&data).unwrap();
        let decoded: AuxiliaryData = minicbor::decode(&bytes).unwrap();
        assert_eq!(data, decoded);
    }

    #[test]
    fn post_alonzo_variant_is_tag_259_wrapped() {
        let data = AuxiliaryData::PostAlonzo(PostAlonzoAuxiliaryData {
            metadata: None,
            native_scripts: None,
            plutus_v1_scripts: None,
            plutus_v2_scripts: None,
            plutus_v3_scripts: None,
        });
        let bytes = minicbor::to_vec(&data).unwrap();
        let mut decoder = minicbor::Decoder::new(&bytes);
        assert_eq!(decoder.tag().unwrap(), Tag::Unassigned(259));
    }
}
