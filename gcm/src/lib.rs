//! **Galois/Counter Mode** (GCM): Authenticated Encryption with Associated
//! Data (AEAD) over any 128-bit block cipher, as specified in
//! [NIST SP 800-38D].
//!
//! Encryption runs a fixed pipeline for every message:
//!
//! 1. the hash subkey `H = E(K, 0^128)` is derived once, when the [`Gcm`]
//!    instance is created;
//! 2. the 96-bit nonce gives the initial counter block `J0 = N || 0^31 || 1`;
//! 3. counter mode starting at `inc32(J0)` turns plaintext into ciphertext;
//! 4. GHASH absorbs the associated data, the ciphertext and their bit-lengths;
//! 5. the tag is the GHASH output XORed with `E(K, J0)`.
//!
//! Decryption verifies the tag in constant time before any plaintext is
//! released.
//!
//! Nonces must be unique per key. This is not, and cannot be, checked here.
//!
//! # Usage
//!
#![cfg_attr(all(feature = "aes", feature = "alloc"), doc = "```")]
#![cfg_attr(not(all(feature = "aes", feature = "alloc")), doc = "```ignore")]
//! use gcm::{
//!     aead::{Aead, KeyInit},
//!     Aes128Gcm,
//! };
//!
//! # fn main() -> Result<(), gcm::Error> {
//! let cipher = Aes128Gcm::new(&[42u8; 16].into());
//! let nonce = [7u8; 12]; // 96-bits; unique per message
//!
//! // caller-owned buffers with a detached tag
//! let plaintext = b"plaintext message";
//! let mut ciphertext = [0u8; 17];
//! let tag = cipher.encrypt_detached(&nonce, b"header", plaintext, &mut ciphertext)?;
//!
//! let mut decrypted = [0u8; 17];
//! cipher.decrypt_detached(&nonce, b"header", &ciphertext, &tag, &mut decrypted)?;
//! assert_eq!(&decrypted, plaintext);
//!
//! // or through the `aead` traits, with the tag appended
//! let sealed = cipher.encrypt(&nonce.into(), plaintext.as_ref()).unwrap();
//! assert_eq!(&sealed[..17], &ciphertext[..]);
//! # Ok(())
//! # }
//! ```
//!
//! [NIST SP 800-38D]: https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38d.pdf

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

#[cfg(test)]
extern crate std;

mod ctr;
mod error;

pub use crate::error::Error;
pub use aead::{self, AeadCore, AeadInPlace, Key, KeyInit, KeySizeUser};
pub use cipher;
pub use ghash;

#[cfg(feature = "aes")]
pub use aes;

#[cfg(feature = "sm4")]
pub use sm4;

use crate::ctr::Ctr32;
use cipher::{
    consts::{U0, U12, U16},
    generic_array::GenericArray,
    BlockCipher, BlockEncrypt, BlockSizeUser,
};
use core::fmt::{self, Debug};
use ghash::{Accumulator, GHash};
use subtle::ConstantTimeEq;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Size of a GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Maximum length of associated data in bytes: `2^64 - 1` bits.
pub const A_MAX: u64 = (1 << 61) - 1;

/// Maximum length of plaintext in bytes: `2^39 - 256` bits, i.e. `2^32 - 2`
/// blocks, which is every counter value after `J0` before the 32-bit counter
/// field wraps.
pub const P_MAX: u64 = (1 << 36) - 32;

/// Maximum length of ciphertext in bytes.
pub const C_MAX: u64 = P_MAX;

/// Block size of the underlying cipher.
const BLOCK_SIZE: usize = ghash::BLOCK_SIZE;

/// GCM nonces (96-bits).
pub type Nonce = GenericArray<u8, U12>;

/// GCM tags (128-bits).
pub type Tag = GenericArray<u8, U16>;

/// Cipher block.
type Block = GenericArray<u8, U16>;

/// AES-GCM with a 128-bit key and 96-bit nonce.
#[cfg(feature = "aes")]
#[cfg_attr(docsrs, doc(cfg(feature = "aes")))]
pub type Aes128Gcm = Gcm<aes::Aes128>;

/// AES-GCM with a 256-bit key and 96-bit nonce.
#[cfg(feature = "aes")]
#[cfg_attr(docsrs, doc(cfg(feature = "aes")))]
pub type Aes256Gcm = Gcm<aes::Aes256>;

/// SM4-GCM with a 128-bit key and 96-bit nonce (RFC 8998).
#[cfg(feature = "sm4")]
#[cfg_attr(docsrs, doc(cfg(feature = "sm4")))]
pub type Sm4Gcm = Gcm<sm4::Sm4>;

/// GCM: generic over a 128-bit block cipher.
///
/// Any cipher implementing the [`cipher`] traits with a 16-byte block can be
/// used, e.g. AES or SM4 (see `Aes128Gcm` and `Sm4Gcm`).
///
/// An instance holds only key-derived material: the cipher's key schedule and
/// the GHASH subkey `H`. Every call is independent; there is no state carried
/// from one message to the next.
#[derive(Clone)]
pub struct Gcm<C> {
    /// Encryption cipher.
    cipher: C,

    /// GHASH keyed with `H = E(K, 0^128)`.
    ghash: GHash,
}

impl<C> KeySizeUser for Gcm<C>
where
    C: KeySizeUser,
{
    type KeySize = C::KeySize;
}

impl<C> KeyInit for Gcm<C>
where
    C: BlockSizeUser<BlockSize = U16> + BlockEncrypt + KeyInit,
{
    fn new(key: &Key<Self>) -> Self {
        C::new(key).into()
    }
}

impl<C> From<C> for Gcm<C>
where
    C: BlockSizeUser<BlockSize = U16> + BlockEncrypt,
{
    fn from(cipher: C) -> Self {
        let mut ghash_key = ghash::Key::default();
        cipher.encrypt_block(&mut ghash_key);

        let ghash = GHash::new(&ghash_key);

        #[cfg(feature = "zeroize")]
        ghash_key.as_mut_slice().zeroize();

        Self { cipher, ghash }
    }
}

impl<C> AeadCore for Gcm<C> {
    type NonceSize = U12;
    type TagSize = U16;
    type CiphertextOverhead = U0;
}

impl<C> AeadInPlace for Gcm<C>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt,
{
    fn encrypt_in_place_detached(
        &self,
        nonce: &aead::Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> aead::Result<aead::Tag<Self>> {
        check_lengths(associated_data, buffer.len(), P_MAX)?;
        Ok(self.seal(&init_j0(nonce)?, associated_data, buffer)?)
    }

    fn decrypt_in_place_detached(
        &self,
        nonce: &aead::Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &aead::Tag<Self>,
    ) -> aead::Result<()> {
        check_lengths(associated_data, buffer.len(), C_MAX)?;
        Ok(self.open(&init_j0(nonce)?, associated_data, buffer, tag)?)
    }
}

impl<C> Gcm<C>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt,
{
    /// Encrypt `plaintext` into `ciphertext` and return the authentication tag.
    ///
    /// Exactly `plaintext.len()` bytes are written to the front of
    /// `ciphertext`; any remaining bytes are left untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNonceLength`] if `nonce` is not 12 bytes
    /// - [`Error::LengthOverflow`] if `plaintext` exceeds [`P_MAX`] or
    ///   `associated_data` exceeds [`A_MAX`]
    /// - [`Error::BufferTooSmall`] if `ciphertext` is shorter than `plaintext`
    ///
    /// All checks happen before `ciphertext` is written.
    #[doc(alias = "encrypt_aead")]
    pub fn encrypt_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        plaintext: &[u8],
        ciphertext: &mut [u8],
    ) -> Result<Tag, Error> {
        let j0 = init_j0(nonce)?;
        check_lengths(associated_data, plaintext.len(), P_MAX)?;
        let ciphertext = output_prefix(ciphertext, plaintext.len())?;

        ciphertext.copy_from_slice(plaintext);
        self.seal(&j0, associated_data, ciphertext)
    }

    /// Verify `tag` over `associated_data` and `ciphertext`, then decrypt
    /// `ciphertext` into `plaintext`.
    ///
    /// The tag comparison is constant-time. Nothing is written to `plaintext`
    /// unless the tag is valid, in which case exactly `ciphertext.len()` bytes
    /// are written to its front.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNonceLength`] if `nonce` is not 12 bytes
    /// - [`Error::LengthOverflow`] if `ciphertext` exceeds [`C_MAX`] or
    ///   `associated_data` exceeds [`A_MAX`]
    /// - [`Error::BufferTooSmall`] if `plaintext` is shorter than `ciphertext`
    /// - [`Error::TagMismatch`] if the message is not authentic
    pub fn decrypt_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        ciphertext: &[u8],
        tag: &Tag,
        plaintext: &mut [u8],
    ) -> Result<(), Error> {
        let j0 = init_j0(nonce)?;
        check_lengths(associated_data, ciphertext.len(), C_MAX)?;
        let plaintext = output_prefix(plaintext, ciphertext.len())?;

        let (mut ctr, mask) = self.init_ctr(&j0)?;
        self.verify_tag(mask, associated_data, ciphertext, tag)?;

        plaintext.copy_from_slice(ciphertext);
        ctr.apply_keystream(plaintext)
    }

    /// Encrypt `buffer` in place and compute its tag. Lengths must already be
    /// validated.
    fn seal(&self, j0: &Block, associated_data: &[u8], buffer: &mut [u8]) -> Result<Tag, Error> {
        let (mut ctr, mask) = self.init_ctr(j0)?;
        ctr.apply_keystream(buffer)?;
        Ok(self.compute_tag(mask, associated_data, buffer))
    }

    /// Verify the tag over `buffer`, then decrypt it in place. Lengths must
    /// already be validated.
    fn open(
        &self,
        j0: &Block,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &Tag,
    ) -> Result<(), Error> {
        let (mut ctr, mask) = self.init_ctr(j0)?;
        self.verify_tag(mask, associated_data, buffer, tag)?;
        ctr.apply_keystream(buffer)
    }

    /// Initialize counter mode at `J0`.
    ///
    /// Returns the keystream generator positioned at `inc32(J0)` along with
    /// the tag mask `E(K, J0)`.
    fn init_ctr(&self, j0: &Block) -> Result<(Ctr32<'_, C>, Block), Error> {
        let mut ctr = Ctr32::new(&self.cipher, j0);
        let mut tag_mask = Block::default();
        ctr.write_keystream_block(&mut tag_mask)?;
        Ok((ctr, tag_mask))
    }

    /// Authenticate the ciphertext and associated data using GHASH and mask
    /// the result, producing the tag.
    #[allow(unused_mut)]
    fn compute_tag(&self, mut mask: Block, associated_data: &[u8], ciphertext: &[u8]) -> Tag {
        let mut accumulator = Accumulator::with_ghash(self.ghash.clone(), associated_data);
        accumulator.update(ciphertext);

        let mut tag = accumulator.finalize();
        for (a, b) in tag.iter_mut().zip(mask.iter()) {
            *a ^= *b;
        }

        #[cfg(feature = "zeroize")]
        mask.as_mut_slice().zeroize();

        tag
    }

    /// Recompute the tag and compare it against `tag` in constant time.
    fn verify_tag(
        &self,
        mask: Block,
        associated_data: &[u8],
        ciphertext: &[u8],
        tag: &Tag,
    ) -> Result<(), Error> {
        let expected = self.compute_tag(mask, associated_data, ciphertext);

        if expected.as_slice().ct_eq(tag.as_slice()).into() {
            Ok(())
        } else {
            Err(Error::TagMismatch)
        }
    }
}

impl<C> Debug for Gcm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gcm").finish_non_exhaustive()
    }
}

/// Build `J0 = N || 0^31 || 1` from a 96-bit nonce.
///
/// See NIST SP 800-38D §7.1, step 2.
fn init_j0(nonce: &[u8]) -> Result<Block, Error> {
    if nonce.len() != NONCE_SIZE {
        return Err(Error::InvalidNonceLength {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }

    let mut j0 = Block::default();
    j0[..NONCE_SIZE].copy_from_slice(nonce);
    j0[BLOCK_SIZE - 1] = 1;
    Ok(j0)
}

/// Reject messages whose lengths exceed the GCM limits.
fn check_lengths(associated_data: &[u8], text_len: usize, text_max: u64) -> Result<(), Error> {
    if text_len as u64 > text_max || associated_data.len() as u64 > A_MAX {
        return Err(Error::LengthOverflow);
    }
    Ok(())
}

/// The first `len` bytes of an output buffer.
fn output_prefix(buffer: &mut [u8], len: usize) -> Result<&mut [u8], Error> {
    let actual = buffer.len();
    buffer.get_mut(..len).ok_or(Error::BufferTooSmall {
        needed: len,
        actual,
    })
}
