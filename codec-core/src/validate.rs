//! Schema-validation facade over [`minicbor::Decoder`].
//!
//! Hand-written `Decode` impls throughout the ledger model call into this
//! extension trait instead of building ad hoc `minicbor::decode::Error`
//! messages inline. Every method takes a `validator` name (typically the
//! Rust type being decoded) so failures read the same way across the
//! whole codec: `"There was an error decoding '<validator>', expected
//! '<friendly-expected>' (<numeric>) but got '<friendly-actual>' (<numeric>)."`

use minicbor::data::{Tag, Type};
use minicbor::Decoder;

use crate::error::DecodeError;

fn type_code(ty: Type) -> i64 {
    // Stable small integer per minicbor::data::Type variant, used purely
    // for the numeric part of the contextual error message.
    match ty {
        Type::Bool => 0,
        Type::U8 => 1,
        Type::U16 => 2,
        Type::U32 => 3,
        Type::U64 => 4,
        Type::I8 => 5,
        Type::I16 => 6,
        Type::I32 => 7,
        Type::I64 => 8,
        Type::Int => 9,
        Type::F16 => 10,
        Type::F32 => 11,
        Type::F64 => 12,
        Type::Bytes => 13,
        Type::BytesIndef => 14,
        Type::String => 15,
        Type::StringIndef => 16,
        Type::Array => 17,
        Type::ArrayIndef => 18,
        Type::Map => 19,
        Type::MapIndef => 20,
        Type::Tag => 21,
        Type::Simple => 22,
        Type::Null => 23,
        Type::Undefined => 24,
        Type::Break => 25,
        Type::Unknown(n) => 1000 + n as i64,
    }
}

fn friendly(ty: Type) -> String {
    format!("{ty:?}")
}

/// Contextual `expect_*` helpers mirroring the operations of a CBOR
/// schema-validation facade: array-of-N, uint-in-range, sized byte/text
/// strings, end-of-array/map, tag expectation, and enum-by-integer.
pub trait DecoderExt<'b> {
    fn expect_array_of(
        &mut self,
        validator: &str,
        n: u64,
    ) -> Result<Option<u64>, DecodeError>;

    fn expect_uint_in_range(
        &mut self,
        validator: &str,
        lo: u64,
        hi: u64,
    ) -> Result<u64, DecodeError>;

    fn expect_byte_string(
        &mut self,
        validator: &str,
        max_size: Option<usize>,
    ) -> Result<&'b [u8], DecodeError>;

    fn expect_text_string(
        &mut self,
        validator: &str,
        max_size: Option<usize>,
    ) -> Result<&'b str, DecodeError>;

    fn expect_end_of_array(&mut self, validator: &str) -> Result<(), DecodeError>;

    fn expect_end_of_map(&mut self, validator: &str) -> Result<(), DecodeError>;

    fn expect_tag(&mut self, validator: &str, tag: Tag) -> Result<(), DecodeError>;

    fn expect_enum(
        &mut self,
        validator: &str,
        expected: &[u64],
        stringify: impl Fn(u64) -> String,
    ) -> Result<u64, DecodeError>;
}

impl<'b> DecoderExt<'b> for Decoder<'b> {
    fn expect_array_of(&mut self, validator: &str, n: u64) -> Result<Option<u64>, DecodeError> {
        let ty = self.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        match ty {
            Type::Array => {
                let len = self.array().map_err(|e| DecodeError::Decoding(e.to_string()))?;
                match len {
                    Some(len) if len == n => Ok(Some(len)),
                    Some(len) => Err(DecodeError::InvalidCborArraySize {
                        validator: validator.to_string(),
                        expected: n as usize,
                        actual: len as usize,
                    }),
                    None => unreachable!("Type::Array always has a definite length"),
                }
            }
            Type::ArrayIndef => {
                // Indefinite-length arrays are tolerated wherever a fixed
                // length is expected (tested contractually): probe ahead
                // to count elements without disturbing the decoder.
                self.array().map_err(|e| DecodeError::Decoding(e.to_string()))?;
                let mut probe = self.probe();
                let mut count = 0u64;
                loop {
                    if probe.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))? == Type::Break {
                        break;
                    }
                    probe.skip().map_err(|e| DecodeError::Decoding(e.to_string()))?;
                    count += 1;
                }
                if count != n {
                    return Err(DecodeError::InvalidCborArraySize {
                        validator: validator.to_string(),
                        expected: n as usize,
                        actual: count as usize,
                    });
                }
                Ok(None)
            }
            other => Err(DecodeError::unexpected_type(
                validator,
                "array",
                type_code(Type::Array),
                friendly(other),
                type_code(other),
            )),
        }
    }

    fn expect_uint_in_range(
        &mut self,
        validator: &str,
        lo: u64,
        hi: u64,
    ) -> Result<u64, DecodeError> {
        let ty = self.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        let n = match ty {
            Type::U8 | Type::U16 | Type::U32 | Type::U64 => {
                self.u64().map_err(|e| DecodeError::Decoding(e.to_string()))?
            }
            other => {
                return Err(DecodeError::unexpected_type(
                    validator,
                    "unsigned int",
                    type_code(Type::U64),
                    friendly(other),
                    type_code(other),
                ))
            }
        };
        if n < lo || n > hi {
            return Err(DecodeError::InvalidCborValue {
                validator: validator.to_string(),
                reason: format!("{n} is not within [{lo}, {hi}]"),
            });
        }
        Ok(n)
    }

    fn expect_byte_string(
        &mut self,
        validator: &str,
        max_size: Option<usize>,
    ) -> Result<&'b [u8], DecodeError> {
        let ty = self.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        if ty != Type::Bytes {
            return Err(DecodeError::unexpected_type(
                validator,
                "byte string",
                type_code(Type::Bytes),
                friendly(ty),
                type_code(ty),
            ));
        }
        let bytes = self.bytes().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        if let Some(max) = max_size {
            if bytes.len() > max {
                return Err(DecodeError::InvalidMetadatumBoundedBytesSize { size: bytes.len() });
            }
        }
        Ok(bytes)
    }

    fn expect_text_string(
        &mut self,
        validator: &str,
        max_size: Option<usize>,
    ) -> Result<&'b str, DecodeError> {
        let ty = self.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        if ty != Type::String {
            return Err(DecodeError::unexpected_type(
                validator,
                "text string",
                type_code(Type::String),
                friendly(ty),
                type_code(ty),
            ));
        }
        let s = self.str().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        if let Some(max) = max_size {
            if s.len() > max {
                return Err(DecodeError::InvalidMetadatumTextStringSize { size: s.len() });
            }
        }
        Ok(s)
    }

    fn expect_end_of_array(&mut self, validator: &str) -> Result<(), DecodeError> {
        match self.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))? {
            Type::Break => {
                self.skip().map_err(|e| DecodeError::Decoding(e.to_string()))?;
                Ok(())
            }
            other => Err(DecodeError::InvalidCborValue {
                validator: validator.to_string(),
                reason: format!("expected end of array, found {}", friendly(other)),
            }),
        }
    }

    fn expect_end_of_map(&mut self, validator: &str) -> Result<(), DecodeError> {
        self.expect_end_of_array(validator)
    }

    fn expect_tag(&mut self, validator: &str, tag: Tag) -> Result<(), DecodeError> {
        let ty = self.datatype().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        if ty != Type::Tag {
            return Err(DecodeError::unexpected_type(
                validator,
                "tag",
                type_code(Type::Tag),
                friendly(ty),
                type_code(ty),
            ));
        }
        let found = self.tag().map_err(|e| DecodeError::Decoding(e.to_string()))?;
        if found != tag {
            return Err(DecodeError::InvalidCborValue {
                validator: validator.to_string(),
                reason: format!("expected tag {tag:?}, found {found:?}"),
            });
        }
        Ok(())
    }

    fn expect_enum(
        &mut self,
        validator: &str,
        expected: &[u64],
        stringify: impl Fn(u64) -> String,
    ) -> Result<u64, DecodeError> {
        let n = self.expect_uint_in_range(validator, 0, u64::MAX)?;
        if !expected.contains(&n) {
            return Err(DecodeError::InvalidCborValue {
                validator: validator.to_string(),
                reason: format!(
                    "{} is not one of the expected variants: {}",
                    stringify(n),
                    expected.iter().map(|v| stringify(*v)).collect::<Vec<_>>().join(", ")
                ),
            });
        }
        Ok(n)
    }
}
