//! CBOR encoding interface and shared codec utilities for the on-chain
//! ledger data model.
//!
//! This crate provides the foundation every composite ledger type builds
//! on: the shared `minicbor` re-export, a library of round-trip-friendly
//! wrapper types (sets, sparse key-value collections, tag wrappers,
//! raw-byte-preserving decode), a typed error taxonomy, and a
//! schema-validation facade for hand-written `Decode` implementations.

/// Shared re-export of the minicbor CBOR codec.
pub use minicbor;

/// Round-trip friendly common helper structs (`Set`, `KeepRaw`, `Bytes`, ...).
pub mod utils;

/// Error taxonomy for decode/encode failures.
pub mod error;

/// CBOR schema-validation facade: contextual `expect_*` helpers over
/// `minicbor::Decoder`.
pub mod validate;

pub trait Fragment: Sized + for<'b> minicbor::Decode<'b, ()> + minicbor::Encode<()> {}

impl<T> Fragment for T where T: for<'b> minicbor::Decode<'b, ()> + minicbor::Encode<()> + Sized {}

/// Generates `Decode`/`Encode` for an enum whose variants are distinguished
/// by CBOR shape rather than by a leading integer discriminator: a set of
/// single-field variants selected by `minicbor` data type, plus an optional
/// "many" variant decoded from a fixed-size array.
#[macro_export]
macro_rules! codec_by_datatype {
    (
        $enum_name:ident $( < $lifetime:lifetime > )?,
        $( $( $cbortype:ident )|* => $one_f:ident ),*,
        ($( $( $vars:ident ),+ => $many_f:ident )?)
    ) => {
        impl<$( $lifetime, )? '__b $(:$lifetime)?,  C> minicbor::decode::Decode<'__b, C> for $enum_name $(<$lifetime>)? {
            fn decode(d: &mut minicbor::Decoder<'__b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
                match d.datatype()? {
                    $( minicbor::data::Type::Array => {
                        d.array()?;
                        Ok($enum_name::$many_f($({ let $vars = d.decode_with(ctx)?; $vars }, )+ ))
                    }, )?
                    $( $( minicbor::data::Type::$cbortype )|* => Ok($enum_name::$one_f(d.decode_with(ctx)?)), )*
                    _ => Err(minicbor::decode::Error::message(
                            "Unknown cbor data type for this macro-defined enum.")
                    ),
                }
            }
        }

        impl< $( $lifetime, )? C> minicbor::encode::Encode<C> for $enum_name $(<$lifetime>)?  {
            fn encode<W: minicbor::encode::Write>(
                &self,
                e: &mut minicbor::Encoder<W>,
                ctx: &mut C,
            ) -> Result<(), minicbor::encode::Error<W::Error>> {
                match self {
                    $( $enum_name::$many_f ($( $vars ),+) => {
                        e.array(2)?;
                        $( e.encode_with($vars, ctx)?; )+
                    }, )?
                    $( $enum_name::$one_f(__x666) => {
                        e.encode_with(__x666, ctx)?;
                    } )*
                };

                Ok(())
            }
        }
    }
}
