//! `ToCanonicalJson`: the canonical JSON projection used for
//! `cardano-cli`-compatible datum/script files, available behind the
//! `json` feature.
//!
//! The `PlutusData` shape (`constructor`/`fields`, `map` of `k`/`v` pairs,
//! `int`, `bytes`) mirrors `cardano-api`'s `ScriptData` JSON encoder.

use serde_json::json;

use crate::plutus_data::{BigInt, PlutusData};

pub trait ToCanonicalJson {
    fn to_json(&self) -> serde_json::Value;
}

impl ToCanonicalJson for PlutusData {
    fn to_json(&self) -> serde_json::Value {
        match self {
            PlutusData::Constr(x) => {
                let constructor = x.any_constructor.unwrap_or(x.tag);
                let fields: Vec<_> = x.fields.iter().map(|i| i.to_json()).collect();
                json!({ "constructor": constructor, "fields": fields })
            }
            PlutusData::Map(x) => {
                let map: Vec<_> = x
                    .iter()
                    .map(|(k, v)| json!({ "k": k.to_json(), "v": v.to_json() }))
                    .collect();
                json!({ "map": map })
            }
            PlutusData::BigInt(int) => match int {
                BigInt::Int(n) => json!({ "int": n.to_string() }),
                // The CDDL allows arbitrary-length bignums, but there is no
                // corresponding JSON shape in the reference implementation
                // to follow; hex-encoded bytes is this crate's own choice.
                BigInt::BigUInt(x) => json!({ "biguint": hex::encode(x.as_slice()) }),
                BigInt::BigNInt(x) => json!({ "bignint": hex::encode(x.as_slice()) }),
            },
            PlutusData::BoundedBytes(x) => json!({ "bytes": x.to_string() }),
            PlutusData::Array(x) => {
                let list: Vec<_> = x.iter().map(|i| i.to_json()).collect();
                json!({ "list": list })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plutus_data::{BoundedBytes, Constr};

    #[test]
    fn constr_shape() {
        let data = PlutusData::Constr(Constr {
            tag: 121,
            any_constructor: None,
            fields: vec![PlutusData::BigInt(BigInt::Int(1.into()))],
        });
        let json = data.to_json();
        assert_eq!(json["constructor"], 121);
        assert_eq!(json["fields"][0]["int"], "1");
    }

    #[test]
    fn bytes_shape_is_hex() {
        let data = PlutusData::BoundedBytes(BoundedBytes::from(vec![0xde, 0xad]));
        assert_eq!(data.to_json()["bytes"], "dead");
    }
}
