//! Protocol parameter updates and the per-language cost model tables.
//!
//! `ProtocolParamUpdate` is a sparse map over a specific set of integer
//! keys with two reserved gaps (12-15, 34+). `Update` is the
//! governance-action-less "hard fork via multi-genesis-signature" path,
//! still carried for backward compatibility.

use std::collections::BTreeMap;

use codec_core::error::DecodeError;
use codec_core::minicbor::{self, Decode, Encode};
use codec_core::validate::DecoderExt;
use serde::{Deserialize, Serialize};

use crate::{Coin, CostModel, Epoch, ExUnits, Genesishash, RationalNumber, UnitInterval};

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct ExUnitPrices {
    #[n(0)]
    pub mem_price: RationalNumber,

    #[n(1)]
    pub step_price: RationalNumber,
}

/// Per-Plutus-language cost model vectors, keyed 0 (V1), 1 (V2), 2 (V3).
/// Unknown keys are preserved rather than rejected: a future language
/// version showing up in a map we don't yet know the name for should
/// round-trip, not fail to decode.
#[derive(Serialize, Deserialize, Encode, Debug, PartialEq, Eq, Clone, Default)]
#[cbor(map)]
pub struct CostModels {
    #[n(0)]
    pub plutus_v1: Option<CostModel>,

    #[n(1)]
    pub plutus_v2: Option<CostModel>,

    #[n(2)]
    pub plutus_v3: Option<CostModel>,

    #[cbor(skip)]
    pub unknown: BTreeMap<u64, CostModel>,
}

/// Exact cost-model vector lengths per Plutus language version. A cost
/// model decodes only when its operation count matches its language's
/// entry exactly, not a minimum, not a maximum.
const EXPECTED_OPERATION_COUNT: [(u64, &str, usize); 3] =
    [(0, "PlutusV1", 166), (1, "PlutusV2", 175), (2, "PlutusV3", 179)];

impl<'b, C> Decode<'b, C> for CostModels {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let models: BTreeMap<u64, CostModel> = d.decode_with(ctx)?;

        let mut out = CostModels::default();
        for (k, v) in models {
            if let Some((_, language, expected)) =
                EXPECTED_OPERATION_COUNT.iter().find(|(key, _, _)| *key == k)
            {
                if v.len() != *expected {
                    return Err(codec_core::error::DecodeError::InvalidPlutusCostModel {
                        language: language.to_string(),
                        expected: *expected,
                        actual: v.len(),
                    }
                    .into());
                }
            }

            match k {
                0 => out.plutus_v1 = Some(v),
                1 => out.plutus_v2 = Some(v),
                2 => out.plutus_v3 = Some(v),
                other => {
                    out.unknown.insert(other, v);
                }
            }
        }
        Ok(out)
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct PoolVotingThresholds {
    #[n(0)]
    pub motion_no_confidence: UnitInterval,
    #[n(1)]
    pub committee_normal: UnitInterval,
    #[n(2)]
    pub committee_no_confidence: UnitInterval,
    #[n(3)]
    pub hard_fork_initiation: UnitInterval,
    #[n(4)]
    pub security_voting_threshold: UnitInterval,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct DRepVotingThresholds {
    #[n(0)]
    pub motion_no_confidence: UnitInterval,
    #[n(1)]
    pub committee_normal: UnitInterval,
    #[n(2)]
    pub committee_no_confidence: UnitInterval,
    #[n(3)]
    pub update_constitution: UnitInterval,
    #[n(4)]
    pub hard_fork_initiation: UnitInterval,
    #[n(5)]
    pub pp_network_group: UnitInterval,
    #[n(6)]
    pub pp_economic_group: UnitInterval,
    #[n(7)]
    pub pp_technical_group: UnitInterval,
    #[n(8)]
    pub pp_governance_group: UnitInterval,
    #[n(9)]
    pub treasury_withdrawal: UnitInterval,
}

/// `protocol_param_update`: a sparse map over a fixed key set. Keys
/// 12-15 and anything past 33 are reserved/unused; a CBOR map carrying
/// them must fail with `invalid-cbor-map-key` the same as
/// `TransactionBody`'s reserved gaps, so this is hand-written over
/// `DecoderExt` rather than a `#[cbor(map)]` derive.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct ProtocolParamUpdate {
    pub minfee_a: Option<u64>,
    pub minfee_b: Option<u64>,
    pub max_block_body_size: Option<u64>,
    pub max_transaction_size: Option<u64>,
    pub max_block_header_size: Option<u64>,
    pub key_deposit: Option<Coin>,
    pub pool_deposit: Option<Coin>,
    pub maximum_epoch: Option<Epoch>,
    pub desired_number_of_stake_pools: Option<u64>,
    pub pool_pledge_influence: Option<RationalNumber>,
    pub expansion_rate: Option<UnitInterval>,
    pub treasury_growth_rate: Option<UnitInterval>,

    pub min_pool_cost: Option<Coin>,
    pub ada_per_utxo_byte: Option<Coin>,
    pub cost_models_for_script_languages: Option<CostModels>,
    pub execution_costs: Option<ExUnitPrices>,
    pub max_tx_ex_units: Option<ExUnits>,
    pub max_block_ex_units: Option<ExUnits>,
    pub max_value_size: Option<u64>,
    pub collateral_percentage: Option<u64>,
    pub max_collateral_inputs: Option<u64>,

    pub pool_voting_thresholds: Option<PoolVotingThresholds>,
    pub drep_voting_thresholds: Option<DRepVotingThresholds>,
    pub min_committee_size: Option<u64>,
    pub committee_term_limit: Option<Epoch>,
    pub governance_action_validity_period: Option<Epoch>,
    pub governance_action_deposit: Option<Coin>,
    pub drep_deposit: Option<Coin>,
    pub drep_inactivity_period: Option<Epoch>,
    pub minfee_refscript_cost_per_byte: Option<UnitInterval>,
}

const PPU_RESERVED_KEYS: &[u64] = &[12, 13, 14, 15];
const PPU_MAX_KEY: u64 = 33;

impl<'b, C> Decode<'b, C> for ProtocolParamUpdate {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        const VALIDATOR: &str = "ProtocolParamUpdate";

        let mut out = ProtocolParamUpdate::default();
        let mut seen = [false; (PPU_MAX_KEY + 1) as usize];

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

            if key <= PPU_MAX_KEY && !PPU_RESERVED_KEYS.contains(&key) {
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
                0 => out.minfee_a = Some(d.decode_with(ctx)?),
                1 => out.minfee_b = Some(d.decode_with(ctx)?),
                2 => out.max_block_body_size = Some(d.decode_with(ctx)?),
                3 => out.max_transaction_size = Some(d.decode_with(ctx)?),
                4 => out.max_block_header_size = Some(d.decode_with(ctx)?),
                5 => out.key_deposit = Some(d.decode_with(ctx)?),
                6 => out.pool_deposit = Some(d.decode_with(ctx)?),
                7 => out.maximum_epoch = Some(d.decode_with(ctx)?),
                8 => out.desired_number_of_stake_pools = Some(d.decode_with(ctx)?),
                9 => out.pool_pledge_influence = Some(d.decode_with(ctx)?),
                10 => out.expansion_rate = Some(d.decode_with(ctx)?),
                11 => out.treasury_growth_rate = Some(d.decode_with(ctx)?),
                16 => out.min_pool_cost = Some(d.decode_with(ctx)?),
                17 => out.ada_per_utxo_byte = Some(d.decode_with(ctx)?),
                18 => out.cost_models_for_script_languages = Some(d.decode_with(ctx)?),
                19 => out.execution_costs = Some(d.decode_with(ctx)?),
                20 => out.max_tx_ex_units = Some(d.decode_with(ctx)?),
                21 => out.max_block_ex_units = Some(d.decode_with(ctx)?),
                22 => out.max_value_size = Some(d.decode_with(ctx)?),
                23 => out.collateral_percentage = Some(d.decode_with(ctx)?),
                24 => out.max_collateral_inputs = Some(d.decode_with(ctx)?),
                25 => out.pool_voting_thresholds = Some(d.decode_with(ctx)?),
                26 => out.drep_voting_thresholds = Some(d.decode_with(ctx)?),
                27 => out.min_committee_size = Some(d.decode_with(ctx)?),
                28 => out.committee_term_limit = Some(d.decode_with(ctx)?),
                29 => out.governance_action_validity_period = Some(d.decode_with(ctx)?),
                30 => out.governance_action_deposit = Some(d.decode_with(ctx)?),
                31 => out.drep_deposit = Some(d.decode_with(ctx)?),
                32 => out.drep_inactivity_period = Some(d.decode_with(ctx)?),
                33 => out.minfee_refscript_cost_per_byte = Some(d.decode_with(ctx)?),
                _ => unreachable!("rejected above"),
            }

            if !indefinite {
                remaining -= 1;
            }
        }

        Ok(out)
    }
}

impl<C> Encode<C> for ProtocolParamUpdate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let mut n = 0u64;
        n += self.minfee_a.is_some() as u64;
        n += self.minfee_b.is_some() as u64;
        n += self.max_block_body_size.is_some() as u64;
        n += self.max_transaction_size.is_some() as u64;
        n += self.max_block_header_size.is_some() as u64;
        n += self.key_deposit.is_some() as u64;
        n += self.pool_deposit.is_some() as u64;
        n += self.maximum_epoch.is_some() as u64;
        n += self.desired_number_of_stake_pools.is_some() as u64;
        n += self.pool_pledge_influence.is_some() as u64;
        n += self.expansion_rate.is_some() as u64;
        n += self.treasury_growth_rate.is_some() as u64;
        n += self.min_pool_cost.is_some() as u64;
        n += self.ada_per_utxo_byte.is_some() as u64;
        n += self.cost_models_for_script_languages.is_some() as u64;
        n += self.execution_costs.is_some() as u64;
        n += self.max_tx_ex_units.is_some() as u64;
        n += self.max_block_ex_units.is_some() as u64;
        n += self.max_value_size.is_some() as u64;
        n += self.collateral_percentage.is_some() as u64;
        n += self.max_collateral_inputs.is_some() as u64;
        n += self.pool_voting_thresholds.is_some() as u64;
        n += self.drep_voting_thresholds.is_some() as u64;
        n += self.min_committee_size.is_some() as u64;
        n += self.committee_term_limit.is_some() as u64;
        n += self.governance_action_validity_period.is_some() as u64;
        n += self.governance_action_deposit.is_some() as u64;
        n += self.drep_deposit.is_some() as u64;
        n += self.drep_inactivity_period.is_some() as u64;
        n += self.minfee_refscript_cost_per_byte.is_some() as u64;

        e.map(n)?;

        macro_rules! put {
            ($key:expr, $field:expr) => {
                if let Some(v) = &$field {
                    e.encode_with($key, ctx)?;
                    e.encode_with(v, ctx)?;
                }
            };
        }

        put!(0, self.minfee_a);
        put!(1, self.minfee_b);
        put!(2, self.max_block_body_size);
        put!(3, self.max_transaction_size);
        put!(4, self.max_block_header_size);
        put!(5, self.key_deposit);
        put!(6, self.pool_deposit);
        put!(7, self.maximum_epoch);
        put!(8, self.desired_number_of_stake_pools);
        put!(9, self.pool_pledge_influence);
        put!(10, self.expansion_rate);
        put!(11, self.treasury_growth_rate);
        put!(16, self.min_pool_cost);
        put!(17, self.ada_per_utxo_byte);
        put!(18, self.cost_models_for_script_languages);
        put!(19, self.execution_costs);
        put!(20, self.max_tx_ex_units);
        put!(21, self.max_block_ex_units);
        put!(22, self.max_value_size);
        put!(23, self.collateral_percentage);
        put!(24, self.max_collateral_inputs);
        put!(25, self.pool_voting_thresholds);
        put!(26, self.drep_voting_thresholds);
        put!(27, self.min_committee_size);
        put!(28, self.committee_term_limit);
        put!(29, self.governance_action_validity_period);
        put!(30, self.governance_action_deposit);
        put!(31, self.drep_deposit);
        put!(32, self.drep_inactivity_period);
        put!(33, self.minfee_refscript_cost_per_byte);

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct Update {
    #[n(0)]
    pub proposed_protocol_parameter_updates: BTreeMap<Genesishash, ProtocolParamUpdate>,

    #[n(1)]
    pub epoch: Epoch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_v1_cost_model(operation_count: usize) -> Vec<u8> {
        let mut models = BTreeMap::new();
        models.insert(0u64, vec![0i64; operation_count]);
        minicbor::to_vec(&models).unwrap()
    }

    #[test]
    fn v1_cost_model_with_165_ops_is_rejected() {
        let bytes = encode_v1_cost_model(165);
        let result: Result<CostModels, _> = minicbor::decode(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn v1_cost_model_with_166_ops_decodes() {
        let bytes = encode_v1_cost_model(166);
        let models: CostModels = minicbor::decode(&bytes).unwrap();
        assert_eq!(models.plutus_v1.unwrap().len(), 166);
    }

    #[test]
    fn v1_cost_model_with_167_ops_is_rejected() {
        let bytes = encode_v1_cost_model(167);
        let result: Result<CostModels, _> = minicbor::decode(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn v3_cost_model_with_179_ops_decodes() {
        let mut models = BTreeMap::new();
        models.insert(2u64, (0i64..179).collect::<Vec<_>>());
        let bytes = minicbor::to_vec(&models).unwrap();
        let decoded: CostModels = minicbor::decode(&bytes).unwrap();
        assert_eq!(decoded.plutus_v3.unwrap().last(), Some(&178));
    }

    #[test]
    fn empty_update_round_trips() {
        let update = ProtocolParamUpdate::default();
        let bytes = minicbor::to_vec(&update).unwrap();
        let decoded: ProtocolParamUpdate = minicbor::decode(&bytes).unwrap();
        assert_eq!(update, decoded);
    }

    #[test]
    fn single_field_round_trips() {
        let mut update = ProtocolParamUpdate::default();
        update.minfee_a = Some(44);
        let bytes = minicbor::to_vec(&update).unwrap();
        let decoded: ProtocolParamUpdate = minicbor::decode(&bytes).unwrap();
        assert_eq!(decoded.minfee_a, Some(44));
    }

    #[test]
    fn reserved_key_12_is_rejected() {
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        e.map(1).unwrap();
        e.u8(12).unwrap();
        e.u8(0).unwrap();
        let result: Result<ProtocolParamUpdate, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }

    #[test]
    fn reserved_key_15_is_rejected() {
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        e.map(1).unwrap();
        e.u8(15).unwrap();
        e.u8(0).unwrap();
        let result: Result<ProtocolParamUpdate, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }

    #[test]
    fn key_past_max_is_rejected() {
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        e.map(1).unwrap();
        e.u8(34).unwrap();
        e.u8(0).unwrap();
        let result: Result<ProtocolParamUpdate, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_key_0_is_rejected() {
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        e.map(2).unwrap();
        e.u8(0).unwrap();
        e.u8(1).unwrap();
        e.u8(0).unwrap();
        e.u8(2).unwrap();
        let result: Result<ProtocolParamUpdate, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }
}
