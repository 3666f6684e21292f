//! Error type.

/// GCM errors.
///
/// Every variant describes a caller error detected before any output is
/// written, except [`Error::TagMismatch`], which is reported by decryption
/// when the message is not authentic. None of them are transient.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Nonce is not exactly 96 bits.
    #[error("nonce must be {expected} bytes, got {actual}")]
    InvalidNonceLength {
        /// Required nonce length in bytes.
        expected: usize,
        /// Length of the nonce provided.
        actual: usize,
    },

    /// Message or associated data is too long to be processed without
    /// exhausting the 32-bit block counter.
    #[error("message length exceeds the GCM limit")]
    LengthOverflow,

    /// Output buffer is shorter than the input.
    #[error("output buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Required buffer length in bytes.
        needed: usize,
        /// Length of the buffer provided.
        actual: usize,
    },

    /// Authentication tag did not match the ciphertext and associated data.
    #[error("authentication tag mismatch")]
    TagMismatch,
}

impl From<Error> for aead::Error {
    fn from(_: Error) -> Self {
        aead::Error
    }
}
