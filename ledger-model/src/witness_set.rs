//! Transaction witnesses: key/bootstrap signatures, scripts, Plutus
//! datums and redeemers.
//!
//! Grounded on `conway/model.rs`'s `WitnessSet`/`Redeemer`/`RedeemerTag`
//! (6 variants: `Vote`/`Propose` added over the Alonzo 4-variant original)
//! and `alonzo/model.rs`'s `VKeyWitness`/`BootstrapWitness`.

use std::collections::BTreeMap;

use codec_core::codec_by_datatype;
use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::{KeepRaw, NonEmptySet};
use serde::{Deserialize, Serialize};

use crate::native_script::NativeScript;
use crate::plutus_data::PlutusData;
use crate::{Bytes, ExUnits, PlutusScript};

#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct VKeyWitness {
    #[n(0)]
    pub vkey: Bytes,

    #[n(1)]
    pub signature: Bytes,
}

#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct BootstrapWitness {
    #[n(0)]
    pub public_key: Bytes,

    #[n(1)]
    pub signature: Bytes,

    #[n(2)]
    pub chain_code: Bytes,

    #[n(3)]
    pub attributes: Bytes,
}

#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord,
)]
#[cbor(index_only)]
pub enum RedeemerTag {
    #[n(0)]
    Spend,
    #[n(1)]
    Mint,
    #[n(2)]
    Cert,
    #[n(3)]
    Reward,
    #[n(4)]
    Vote,
    #[n(5)]
    Propose,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct Redeemer {
    #[n(0)]
    pub tag: RedeemerTag,

    #[n(1)]
    pub index: u32,

    #[n(2)]
    pub data: PlutusData,

    #[n(3)]
    pub ex_units: ExUnits,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct RedeemersKey {
    #[n(0)]
    pub tag: RedeemerTag,
    #[n(1)]
    pub index: u32,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct RedeemersValue {
    #[n(0)]
    pub data: PlutusData,
    #[n(1)]
    pub ex_units: ExUnits,
}

/// `redeemers = [* redeemer] / {* redeemers_key => redeemers_value}`, both
/// shapes were used on chain depending on era; Conway accepts either on
/// decode but encoders are free to pick the map form.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Redeemers {
    List(Vec<Redeemer>),
    Map(BTreeMap<RedeemersKey, RedeemersValue>),
}

codec_by_datatype! {
    Redeemers,
    Array | ArrayIndef => List,
    Map | MapIndef => Map,
    ()
}

impl From<BTreeMap<RedeemersKey, RedeemersValue>> for Redeemers {
    fn from(value: BTreeMap<RedeemersKey, RedeemersValue>) -> Self {
        Redeemers::Map(value)
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Clone)]
#[cbor(map)]
pub struct WitnessSet<'b> {
    #[n(0)]
    pub vkeywitness: Option<NonEmptySet<VKeyWitness>>,

    #[n(1)]
    pub native_script: Option<NonEmptySet<KeepRaw<'b, NativeScript>>>,

    #[n(2)]
    pub bootstrap_witness: Option<NonEmptySet<BootstrapWitness>>,

    #[n(3)]
    pub plutus_v1_script: Option<NonEmptySet<PlutusScript<1>>>,

    #[b(4)]
    pub plutus_data: Option<KeepRaw<'b, NonEmptySet<KeepRaw<'b, PlutusData>>>>,

    #[n(5)]
    pub redeemer: Option<KeepRaw<'b, Redeemers>>,

    #[n(6)]
    pub plutus_v2_script: Option<NonEmptySet<PlutusScript<2>>>,

    #[n(7)]
    pub plutus_v3_script: Option<NonEmptySet<PlutusScript<3>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeemers_list_and_map_both_decode() {
        let list = Redeemers::List(vec![]);
        let bytes = minicbor::to_vec(&list).unwrap();
        let decoded: Redeemers = minicbor::decode(&bytes).unwrap();
        assert!(matches!(decoded, Redeemers::List(v) if v.is_empty()));

        let map = Redeemers::Map(BTreeMap::new());
        let bytes = minicbor::to_vec(&map).unwrap();
        let decoded: Redeemers = minicbor::decode(&bytes).unwrap();
        assert!(matches!(decoded, Redeemers::Map(m) if m.is_empty()));
    }

    #[test]
    fn empty_witness_set_round_trips() {
        let ws = WitnessSet {
            vkeywitness: None,
            native_script: None,
            bootstrap_witness: None,
            plutus_v1_script: None,
            plutus_data: None,
            redeemer: None,
            plutus_v2_script: None,
            plutus_v3_script: None,
        };
        let bytes = minicbor::to_vec(&ws).unwrap();
        let decoded: WitnessSet = minicbor::decode(&bytes).unwrap();
        assert_eq!(ws, decoded);
    }
}
