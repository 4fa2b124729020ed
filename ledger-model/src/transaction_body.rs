//! The transaction body: a sparse CBOR map over a fixed, non-contiguous
//! key set (0-5, 7-9, 11, 13-22). Keys 6, 10 and 12 are reserved gaps
//! left by retired fields (MIR-via-body, a dropped Mary-era field, and a
//! since-renumbered field respectively) and must be rejected the same as
//! any other unknown key, not silently ignored. So this is a hand-written
//! decoder over `codec_core::validate::DecoderExt` rather than a
//! `#[cbor(map)]` derive, which skips keys it doesn't recognize.
//!
//! Grounded on `conway/model.rs`'s `TransactionBody`.

use std::collections::BTreeMap;

use codec_core::error::DecodeError;
use codec_core::minicbor::{self, Decode, Encode};
use codec_core::utils::{NonEmptySet, PositiveCoin, Set};
use codec_core::validate::DecoderExt;
use serde::{Deserialize, Serialize};

use crate::certificates::Certificate;
use crate::transaction_output::{Mint, TransactionOutput};
use crate::voting::VotingProcedures;
use crate::{AddrKeyhash, Anchor, Coin, NetworkId, RewardAccount, TransactionInput};

/// the min committee size, governance action validity period, and one
/// deposit field are all carried on the protocol parameter side, not on
/// the action record, hence the slimmer proposal body below.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ProposalProcedure {
    #[n(0)]
    pub deposit: Coin,
    #[n(1)]
    pub reward_account: RewardAccount,
    #[n(2)]
    pub gov_action: crate::governance::GovAction,
    #[n(3)]
    pub anchor: Anchor,
}

const RESERVED_KEYS: &[u64] = &[6, 10, 12];
const MAX_KEY: u64 = 22;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TransactionBody {
    pub inputs: Set<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: Coin,
    pub ttl: Option<u64>,
    pub certificates: Option<NonEmptySet<Certificate>>,
    pub withdrawals: Option<BTreeMap<RewardAccount, Coin>>,
    pub auxiliary_data_hash: Option<crate::Hash<32>>,
    pub validity_interval_start: Option<u64>,
    pub mint: Option<Mint>,
    pub script_data_hash: Option<crate::Hash<32>>,
    pub collateral: Option<NonEmptySet<TransactionInput>>,
    pub required_signers: Option<NonEmptySet<AddrKeyhash>>,
    pub network_id: Option<NetworkId>,
    pub collateral_return: Option<TransactionOutput>,
    pub total_collateral: Option<Coin>,
    pub reference_inputs: Option<NonEmptySet<TransactionInput>>,
    pub voting_procedures: Option<VotingProcedures>,
    pub proposal_procedures: Option<NonEmptySet<ProposalProcedure>>,
    pub treasury_value: Option<Coin>,
    pub donation: Option<PositiveCoin>,
}

impl<'b, C> Decode<'b, C> for TransactionBody {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        const VALIDATOR: &str = "TransactionBody";

        let mut inputs = None;
        let mut outputs = None;
        let mut fee = None;
        let mut ttl = None;
        let mut certificates = None;
        let mut withdrawals = None;
        let mut auxiliary_data_hash = None;
        let mut validity_interval_start = None;
        let mut mint = None;
        let mut script_data_hash = None;
        let mut collateral = None;
        let mut required_signers = None;
        let mut network_id = None;
        let mut collateral_return = None;
        let mut total_collateral = None;
        let mut reference_inputs = None;
        let mut voting_procedures = None;
        let mut proposal_procedures = None;
        let mut treasury_value = None;
        let mut donation = None;

        let mut seen = [false; (MAX_KEY + 1) as usize];

        let len = d.map()?;
        let indefinite = len.is_none();
        let mut remaining = len.unwrap_or(u64::MAX);

        loop {
            if indefinite {
                if d.datatype()? == minicbor::data::Type::Break {
                    d.skip()?;
                    break;
                }
            } else if remaining == 0 {
                break;
            }

            let key = d.expect_uint_in_range(VALIDATOR, 0, u64::MAX)?;

            if key <= MAX_KEY && !RESERVED_KEYS.contains(&key) {
                if seen[key as usize] {
                    return Err(
                        DecodeError::DuplicatedCborMapKey { validator: VALIDATOR.into(), key }.into(),
                    );
                }
                seen[key as usize] = true;
            } else {
                return Err(
                    DecodeError::InvalidCborMapKey { validator: VALIDATOR.into(), key }.into(),
                );
            }

            match key {
                0 => inputs = Some(d.decode_with(ctx)?),
                1 => outputs = Some(d.decode_with(ctx)?),
                2 => fee = Some(d.decode_with(ctx)?),
                3 => ttl = Some(d.decode_with(ctx)?),
                4 => certificates = Some(d.decode_with(ctx)?),
                5 => withdrawals = Some(d.decode_with(ctx)?),
                7 => auxiliary_data_hash = Some(d.decode_with(ctx)?),
                8 => validity_interval_start = Some(d.decode_with(ctx)?),
                9 => mint = Some(d.decode_with(ctx)?),
                11 => script_data_hash = Some(d.decode_with(ctx)?),
                13 => collateral = Some(d.decode_with(ctx)?),
                14 => required_signers = Some(d.decode_with(ctx)?),
                15 => {
                    let n: u8 = d.decode_with(ctx)?;
                    network_id = Some(NetworkId::try_from(n).map_err(|e| {
                        minicbor::decode::Error::message(e.to_string())
                    })?);
                }
                16 => collateral_return = Some(d.decode_with(ctx)?),
                17 => total_collateral = Some(d.decode_with(ctx)?),
                18 => reference_inputs = Some(d.decode_with(ctx)?),
                19 => voting_procedures = Some(d.decode_with(ctx)?),
                20 => proposal_procedures = Some(d.decode_with(ctx)?),
                21 => treasury_value = Some(d.decode_with(ctx)?),
                22 => donation = Some(d.decode_with(ctx)?),
                _ => unreachable!("rejected above"),
            }

            if !indefinite {
                remaining -= 1;
            }
        }

        let missing = |field: &str| {
            minicbor::decode::Error::message(format!("transaction body missing field {field}"))
        };

        Ok(TransactionBody {
            inputs: inputs.ok_or_else(|| missing("inputs"))?,
            outputs: outputs.ok_or_else(|| missing("outputs"))?,
            fee: fee.ok_or_else(|| missing("fee"))?,
            ttl,
            certificates,
            withdrawals,
            auxiliary_data_hash,
            validity_interval_start,
            mint,
            script_data_hash,
            collateral,
            required_signers,
            network_id,
            collateral_return,
            total_collateral,
            reference_inputs,
            voting_procedures,
            proposal_procedures,
            treasury_value,
            donation,
        })
    }
}

impl<C> Encode<C> for TransactionBody {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let mut n = 3;
        n += self.ttl.is_some() as u64;
        n += self.certificates.is_some() as u64;
        n += self.withdrawals.is_some() as u64;
        n += self.auxiliary_data_hash.is_some() as u64;
        n += self.validity_interval_start.is_some() as u64;
        n += self.mint.is_some() as u64;
        n += self.script_data_hash.is_some() as u64;
        n += self.collateral.is_some() as u64;
        n += self.required_signers.is_some() as u64;
        n += self.network_id.is_some() as u64;
        n += self.collateral_return.is_some() as u64;
        n += self.total_collateral.is_some() as u64;
        n += self.reference_inputs.is_some() as u64;
        n += self.voting_procedures.is_some() as u64;
        n += self.proposal_procedures.is_some() as u64;
        n += self.treasury_value.is_some() as u64;
        n += self.donation.is_some() as u64;

        e.map(n)?;

        e.encode_with(0, ctx)?;
        e.encode_with(&self.inputs, ctx)?;
        e.encode_with(1, ctx)?;
        e.encode_with(&self.outputs, ctx)?;
        e.encode_with(2, ctx)?;
        e.encode_with(self.fee, ctx)?;

        if let Some(v) = &self.ttl {
            e.encode_with(3, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.certificates {
            e.encode_with(4, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.withdrawals {
            e.encode_with(5, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.auxiliary_data_hash {
            e.encode_with(7, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.validity_interval_start {
            e.encode_with(8, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.mint {
            e.encode_with(9, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.script_data_hash {
            e.encode_with(11, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.collateral {
            e.encode_with(13, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.required_signers {
            e.encode_with(14, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.network_id {
            e.encode_with(15, ctx)?;
            e.encode_with(u8::from(*v), ctx)?;
        }
        if let Some(v) = &self.collateral_return {
            e.encode_with(16, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.total_collateral {
            e.encode_with(17, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.reference_inputs {
            e.encode_with(18, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.voting_procedures {
            e.encode_with(19, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.proposal_procedures {
            e.encode_with(20, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.treasury_value {
            e.encode_with(21, ctx)?;
            e.encode_with(v, ctx)?;
        }
        if let Some(v) = &self.donation {
            e.encode_with(22, ctx)?;
            e.encode_with(v, ctx)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_body_map(extra_key: Option<u64>) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        let n = if extra_key.is_some() { 4 } else { 3 };
        e.map(n).unwrap();
        e.u8(0).unwrap();
        e.encode(Set::<TransactionInput>::from(vec![])).unwrap();
        e.u8(1).unwrap();
        e.encode(Vec::<TransactionOutput>::new()).unwrap();
        e.u8(2).unwrap();
        e.u32(0).unwrap();
        if let Some(k) = extra_key {
            e.u64(k).unwrap();
            e.u8(0).unwrap();
        }
        buf
    }

    #[test]
    fn minimal_body_decodes() {
        let buf = minimal_body_map(None);
        let body: TransactionBody = minicbor::decode(&buf).unwrap();
        assert_eq!(body.fee, 0);
    }

    #[test]
    fn reserved_key_10_is_rejected() {
        let buf = minimal_body_map(Some(10));
        let result: Result<TransactionBody, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }

    #[test]
    fn reserved_key_12_is_rejected() {
        let buf = minimal_body_map(Some(12));
        let result: Result<TransactionBody, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_key_0_is_rejected() {
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        e.map(4).unwrap();
        e.u8(0).unwrap();
        e.encode(Set::<TransactionInput>::from(vec![])).unwrap();
        e.u8(0).unwrap();
        e.encode(Set::<TransactionInput>::from(vec![])).unwrap();
        e.u8(1).unwrap();
        e.encode(Vec::<TransactionOutput>::new()).unwrap();
        e.u8(2).unwrap();
        e.u32(0).unwrap();
        let result: Result<TransactionBody, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }
}
