//! The script integrity hash preimage: redeemers, reference datums and
//! per-language cost model "language views", all CBOR-concatenated in a
//! specific order.
//!
//! Grounded on `conway/script_data.rs`: `LanguageViews`'s hand-written
//! `Encode` orders non-zero-keyed languages ascending, then PlutusV1 last
//! with each of its keys and values individually double-CBOR-wrapped as a
//! byte string (a historical quirk of the reference implementation that
//! on-chain hashes must reproduce byte-for-byte), and `ScriptData::hash`'s
//! four-branch conditional.

use std::collections::BTreeMap;

use codec_core::minicbor::{self, Encode};
use codec_core::utils::{KeepRaw, NonEmptySet};
use serde::{Deserialize, Serialize};

use crate::plutus_data::PlutusData;
use crate::witness_set::{Redeemers, WitnessSet};
use crate::CostModel;

pub type PlutusVersion = u8;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageViews(pub BTreeMap<PlutusVersion, CostModel>);

impl FromIterator<(PlutusVersion, CostModel)> for LanguageViews {
    fn from_iter<I: IntoIterator<Item = (PlutusVersion, CostModel)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<C> Encode<C> for LanguageViews {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let mut canonical_order: Vec<u8> =
            self.0.keys().copied().filter(|&k| k != 0).collect();
        canonical_order.sort();
        // PlutusV1 (key 0) is encoded last, with both key and value wrapped
        // as CBOR-bytes-of-CBOR: `0x4100` / `0x5820...` rather than the
        // plain integer / array encoding every other language uses.
        if self.0.contains_key(&0) {
            canonical_order.push(0);
        }

        e.map(self.0.len() as u64)?;
        for lang in canonical_order {
            let cost_model = self.0.get(&lang).expect("key came from self.0");
            match lang {
                0 => {
                    let mut inner = Vec::new();
                    let mut sub = minicbor::Encoder::new(&mut inner);
                    sub.begin_array().expect("infallible");
                    for v in cost_model.iter() {
                        sub.encode_with(v, ctx).expect("infallible");
                    }
                    sub.end().expect("infallible");
                    e.bytes(&minicbor::to_vec(0).expect("infallible"))?;
                    e.bytes(&inner)?;
                }
                _ => {
                    e.encode(lang)?;
                    e.encode(cost_model)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScriptData<'b> {
    pub redeemers: Option<Redeemers>,
    pub datums: Option<KeepRaw<'b, NonEmptySet<KeepRaw<'b, PlutusData>>>>,
    pub language_views: Option<LanguageViews>,
}

impl ScriptData<'_> {
    /// `Blake2b256` of the redeemers, datums and language views,
    /// CBOR-concatenated in that order. A present-but-empty redeemers or
    /// language-views section is still encoded as the empty map `0xa0`,
    /// not omitted. Only datums are skipped entirely when absent.
    pub fn hash(&self) -> ledger_crypto::hash::Hash<32> {
        let mut buf = Vec::new();

        if let Some(redeemers) = &self.redeemers {
            minicbor::encode(redeemers, &mut buf).expect("infallible");
        } else {
            buf.push(0xa0);
        }

        if let Some(datums) = &self.datums {
            minicbor::encode(datums, &mut buf).expect("infallible");
        }

        if let Some(language_views) = &self.language_views {
            minicbor::encode(language_views, &mut buf).expect("infallible");
        } else {
            buf.push(0xa0);
        }

        ledger_crypto::hash::Hasher::<256>::hash(&buf)
    }
}

impl<'b> ScriptData<'b> {
    /// Builds the script data record for a witness set, or `None` if there
    /// is nothing requiring a script integrity hash at all (no redeemers
    /// and no datums). Language views are only carried when redeemers are
    /// present. Plutus V1/V2/V3 scripts referenced only via output datums
    /// don't need their cost models folded into the hash.
    pub fn build_for(
        witness: &WitnessSet<'b>,
        language_views_opt: &Option<LanguageViews>,
    ) -> Option<Self> {
        let redeemers = witness.redeemer.as_ref().map(|x| x.to_owned().unwrap());
        let datums = witness.plutus_data.clone();

        if redeemers.is_none() && datums.is_none() {
            return None;
        }

        let language_views = if redeemers.is_some() && language_views_opt.is_some() {
            language_views_opt.clone()
        } else {
            None
        };

        Some(ScriptData {
            redeemers,
            datums,
            language_views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_views_puts_plutus_v1_last_and_double_wrapped() {
        let views: LanguageViews = [(1u8, vec![1i64, 2]), (0u8, vec![3i64])]
            .into_iter()
            .collect();
        let bytes = minicbor::to_vec(&views).unwrap();
        // map(2) { 1: [1,2], 0: bytes(bytes([3])) }, key 0 must be last.
        let mut d = minicbor::Decoder::new(&bytes);
        assert_eq!(d.map().unwrap(), Some(2));
        assert_eq!(d.u8().unwrap(), 1);
        let _: Vec<i64> = d.decode().unwrap();
        assert_eq!(d.bytes().unwrap().len(), 2);
        d.bytes().unwrap();
    }

    #[test]
    fn empty_script_data_hashes_two_empty_maps() {
        let data = ScriptData {
            redeemers: None,
            datums: None,
            language_views: None,
        };
        let mut expected = Vec::new();
        expected.push(0xa0);
        expected.push(0xa0);
        let hash = ledger_crypto::hash::Hasher::<256>::hash(&expected);
        assert_eq!(data.hash(), hash);
    }
}
