//! Error taxonomy shared by every decode/encode operation in the codec.
//!
//! Replaces the reference-counted "last-error string on an object" idiom
//! with ordinary typed `Result` propagation: every fallible operation
//! returns `Result<T, DecodeError>` or `Result<T, EncodeError>` and the
//! error is surfaced to the immediate caller, never stashed on a shared
//! handle.

use thiserror::Error;

/// Errors produced while turning CBOR bytes into a typed ledger value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("There was an error decoding '{validator}', expected '{expected}' ({expected_code}) but got '{actual}' ({actual_code}).")]
    UnexpectedCborType {
        validator: String,
        expected: String,
        expected_code: i64,
        actual: String,
        actual_code: i64,
    },

    #[error("invalid cbor value for '{validator}': {reason}")]
    InvalidCborValue { validator: String, reason: String },

    #[error("invalid array size for '{validator}': expected {expected} elements, got {actual}")]
    InvalidCborArraySize {
        validator: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid or reserved map key {key} while decoding '{validator}'")]
    InvalidCborMapKey { validator: String, key: u64 },

    #[error("duplicated map key {key} while decoding '{validator}'")]
    DuplicatedCborMapKey { validator: String, key: u64 },

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("index out of bounds: index {index} >= len {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid metadatum conversion: {0}")]
    InvalidMetadatumConversion(String),

    #[error("invalid metadatum text string size: {size} exceeds maximum of 64")]
    InvalidMetadatumTextStringSize { size: usize },

    #[error("invalid metadatum bounded bytes size: {size} exceeds maximum of 64")]
    InvalidMetadatumBoundedBytesSize { size: usize },

    #[error("invalid certificate type: {0}")]
    InvalidCertificateType(u64),

    #[error("invalid native script type: {0}")]
    InvalidNativeScriptType(u64),

    #[error("invalid script language: {0}")]
    InvalidScriptLanguage(u64),

    #[error("invalid plutus cost model: language {language} expects {expected} operations, got {actual}")]
    InvalidPlutusCostModel {
        language: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid json: {0}")]
    InvalidJson(String),
}

impl DecodeError {
    pub fn unexpected_type(
        validator: impl Into<String>,
        expected: impl Into<String>,
        expected_code: i64,
        actual: impl Into<String>,
        actual_code: i64,
    ) -> Self {
        Self::UnexpectedCborType {
            validator: validator.into(),
            expected: expected.into(),
            expected_code,
            actual: actual.into(),
            actual_code,
        }
    }
}

impl From<DecodeError> for minicbor::decode::Error {
    fn from(value: DecodeError) -> Self {
        minicbor::decode::Error::message(value.to_string())
    }
}

/// Errors produced while turning a typed ledger value back into CBOR bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("bounded bytes of size {size} exceed the maximum chunk size of {max}")]
    BoundedBytesOversize { size: usize, max: usize },

    #[error("null element encountered inside a collection that requires dense elements")]
    NullElementInCollection,
}

impl EncodeError {
    /// Lifts this error into a `minicbor::encode::Error<W>` for any writer
    /// error type, for use at the point an encoder call site needs to
    /// return `Result<_, minicbor::encode::Error<W::Error>>`.
    pub fn into_minicbor<W>(self) -> minicbor::encode::Error<W> {
        minicbor::encode::Error::message(self.to_string())
    }
}
