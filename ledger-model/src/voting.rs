//! Conway-era governance voting: voters, votes and voting procedures.
//!
//! `Voter`'s variants are declared out of tag order on purpose: the
//! derived `Ord` follows declaration order, and callers that sort voters
//! expect constitutional committee members, then DReps, then stake pools,
//! not the raw tag numbering.

use std::collections::BTreeMap;

use codec_core::minicbor::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::certificates::{CommitteeColdCredential, DRepCredential};
use crate::governance::{Anchor, GovActionId};
use crate::PoolKeyhash;

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[cbor(index_only)]
pub enum Vote {
    #[n(0)]
    No,
    #[n(1)]
    Yes,
    #[n(2)]
    Abstain,
}

/// !! NOTE / IMPORTANT !!
/// Declaration order here is deliberately NOT tag order (`ConstitutionalCommitteeScript`
/// is tag 2 but declared first). The derived `Ord`/`PartialOrd` follow
/// declaration order, and `VotingProcedures`' `BTreeMap<Voter, _>` relies on
/// that ordering to group committee votes ahead of DRep and pool votes
/// regardless of which credential kind sorts lower numerically.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
#[cbor(flat)]
pub enum Voter {
    #[n(2)]
    ConstitutionalCommitteeScript(#[n(0)] CommitteeColdCredential),
    #[n(0)]
    ConstitutionalCommitteeKey(#[n(0)] CommitteeColdCredential),
    #[n(3)]
    DRepScript(#[n(0)] DRepCredential),
    #[n(1)]
    DRepKey(#[n(0)] DRepCredential),
    #[n(4)]
    StakePoolKey(#[n(0)] PoolKeyhash),
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct VotingProcedure {
    #[n(0)]
    pub vote: Vote,

    #[n(1)]
    pub anchor: Option<Anchor>,
}

pub type VotingProcedures = BTreeMap<Voter, BTreeMap<GovActionId, VotingProcedure>>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Voter::ConstitutionalCommitteeScript([0u8; 28].into()), Voter::ConstitutionalCommitteeKey([0u8; 28].into()) ; "committee script before committee key")]
    #[test_case(Voter::ConstitutionalCommitteeKey([0u8; 28].into()), Voter::DRepScript([0u8; 28].into()) ; "committee before drep")]
    #[test_case(Voter::DRepScript([0u8; 28].into()), Voter::DRepKey([0u8; 28].into())  ; "drep script before drep key")]
    #[test_case(Voter::DRepKey([0u8; 28].into()), Voter::StakePoolKey([0u8; 28].into()) ; "drep before pool")]
    fn voter_ordering(lesser: Voter, greater: Voter) {
        assert!(lesser < greater);
    }
}
