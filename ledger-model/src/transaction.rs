//! The top-level transaction envelope: body, witnesses, the validation
//! outcome flag and optional auxiliary data.
//!
//! Grounded on `conway/model.rs`'s `Tx`. Body and witness set are kept as
//! [`KeepRaw`] so their exact CBOR bytes survive a decode/re-encode round
//! trip, needed for hash-over-the-original-bytes checks (transaction id,
//! script data hash) that must not be perturbed by map key reordering or
//! canonical-vs-non-canonical integer width choices a derived encoder
//! might otherwise introduce.

use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::{KeepRaw, Nullable};
use serde::{Deserialize, Serialize};

use crate::auxiliary_data::AuxiliaryData;
use crate::transaction_body::TransactionBody;
use crate::witness_set::WitnessSet;

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Tx<'b> {
    #[b(0)]
    pub transaction_body: KeepRaw<'b, TransactionBody>,

    #[n(1)]
    pub transaction_witness_set: KeepRaw<'b, WitnessSet<'b>>,

    #[n(2)]
    pub success: bool,

    #[n(3)]
    pub auxiliary_data: Nullable<KeepRaw<'b, AuxiliaryData>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_core::utils::Set;
    use crate::transaction_output::TransactionOutput;

    #[test]
    fn minimal_valid_tx_round_trips() {
        let mut body_bytes = Vec::new();
        let mut e = minicbor::Encoder::new(&mut body_bytes);
        e.map(3).unwrap();
        e.u8(0).unwrap();
        e.encode(Set::<crate::TransactionInput>::from(vec![])).unwrap();
        e.u8(1).unwrap();
        e.encode(Vec::<TransactionOutput>::new()).unwrap();
        e.u8(2).unwrap();
        e.u32(0).unwrap();

        let witness_bytes = minicbor::to_vec(WitnessSet {
            vkeywitness: None,
            native_script: None,
            bootstrap_witness: None,
            plutus_v1_script: None,
            plutus_data: None,
            redeemer: None,
            plutus_v2_script: None,
            plutus_v3_script: None,
        })
        .unwrap();

        let mut buf = vec![0x84]; // array(4)
        buf.extend_from_slice(&body_bytes);
        buf.extend_from_slice(&witness_bytes);
        buf.push(0xf5); // true
        buf.push(0xf6); // null

        let tx: Tx = minicbor::decode(&buf).unwrap();
        assert!(tx.success);
        assert!(matches!(tx.auxiliary_data, Nullable::Null));
    }
}
