//! **GHASH**: universal hash over GF(2^128) used by Galois/Counter Mode (GCM)
//! for message authentication, together with the GCM [`Accumulator`] which
//! authenticates associated data, ciphertext and their bit-lengths.
//!
//! ## Implementation Notes
//!
//! The implementation of GHASH found in this crate internally uses the
//! [`polyval`] crate, which provides a similar universal hash function used by
//! AES-GCM-SIV (RFC 8452).
//!
//! By implementing GHASH in terms of POLYVAL, the two universal hash functions
//! can share a common core, meaning any optimization work (e.g. CPU-specific
//! SIMD implementations) which happens upstream in the `polyval` crate
//! benefits GHASH as well.
//!
//! From RFC 8452 Appendix A:
//! <https://tools.ietf.org/html/rfc8452#appendix-A>
//!
//! > GHASH and POLYVAL both operate in GF(2^128), although with different
//! > irreducible polynomials: POLYVAL works modulo x^128 + x^127 + x^126 +
//! > x^121 + 1 and GHASH works modulo x^128 + x^7 + x^2 + x + 1.  Note
//! > that these irreducible polynomials are the "reverse" of each other.
//!
//! # Usage
//!
//! ```
//! use ghash::Accumulator;
//! use hex_literal::hex;
//!
//! // H = AES-128(0^128, 0^128), C = a single ciphertext block
//! let h = hex!("66e94bd4ef8a2c3b884cfa59ca342b2e");
//! let mut acc = Accumulator::new(&h.into(), b"");
//! acc.update(&hex!("0388dace60b6a392f328c2b971b2fe78"));
//!
//! assert_eq!(
//!     acc.finalize().as_slice(),
//!     &hex!("f38cbb1ad69223dcc3457ae5b6b0f885")
//! );
//! ```
//!
//! [`polyval`]: https://github.com/RustCrypto/universal-hashes/tree/master/polyval

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod accumulator;

pub use crate::accumulator::Accumulator;
pub use polyval::universal_hash;

use polyval::Polyval;
use universal_hash::{
    consts::U16,
    crypto_common::{BlockSizeUser, KeySizeUser, ParBlocksSizeUser},
    KeyInit, ParBlocks, Reset, UhfBackend, UhfClosure, UniversalHash,
};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Size of a GHASH block in bytes
pub const BLOCK_SIZE: usize = 16;

/// GHASH keys (16-bytes)
pub type Key = universal_hash::Key<GHash>;

/// GHASH blocks (16-bytes)
pub type Block = universal_hash::Block<GHash>;

/// GHASH tags (16-bytes)
pub type Tag = universal_hash::Block<GHash>;

/// **GHASH**: universal hash over GF(2^128) used by GCM.
///
/// Each processed block `X` updates the state as `Y = (Y ^ X) * H`, with the
/// product taken modulo `x^128 + x^7 + x^2 + x + 1` in GCM's bit order.
#[derive(Clone)]
pub struct GHash(Polyval);

impl KeySizeUser for GHash {
    type KeySize = U16;
}

impl KeyInit for GHash {
    /// Initialize GHASH with the given `H` field element
    #[inline]
    fn new(h: &Key) -> Self {
        let mut h = *h;
        h.reverse();

        #[allow(unused_mut)]
        let mut h_polyval = polyval::mulx(&h);

        #[cfg(feature = "zeroize")]
        h.as_mut_slice().zeroize();

        #[allow(clippy::let_and_return)]
        let result = GHash(Polyval::new(&h_polyval));

        #[cfg(feature = "zeroize")]
        h_polyval.as_mut_slice().zeroize();

        result
    }
}

/// Byte-reversing shim which presents a POLYVAL backend as a GHASH backend.
struct GHashBackend<'b, B: UhfBackend>(&'b mut B);

impl<B: UhfBackend> BlockSizeUser for GHashBackend<'_, B> {
    type BlockSize = B::BlockSize;
}

impl<B: UhfBackend> ParBlocksSizeUser for GHashBackend<'_, B> {
    type ParBlocksSize = B::ParBlocksSize;
}

impl<B: UhfBackend> UhfBackend for GHashBackend<'_, B> {
    fn proc_block(&mut self, x: &universal_hash::Block<B>) {
        let mut x = x.clone();
        x.reverse();
        self.0.proc_block(&x);
    }

    fn proc_par_blocks(&mut self, blocks: &ParBlocks<Self>) {
        let mut blocks = blocks.clone();
        for block in blocks.iter_mut() {
            block.reverse();
        }
        self.0.proc_par_blocks(&blocks);
    }
}

impl BlockSizeUser for GHash {
    type BlockSize = U16;
}

impl UniversalHash for GHash {
    fn update_with_backend(&mut self, f: impl UhfClosure<BlockSize = Self::BlockSize>) {
        struct GHashClosure<C: UhfClosure>(C);

        impl<C: UhfClosure> BlockSizeUser for GHashClosure<C> {
            type BlockSize = C::BlockSize;
        }

        impl<C: UhfClosure> UhfClosure for GHashClosure<C> {
            fn call<B: UhfBackend<BlockSize = Self::BlockSize>>(self, backend: &mut B) {
                self.0.call(&mut GHashBackend(backend));
            }
        }

        self.0.update_with_backend(GHashClosure(f));
    }

    /// Get GHASH output
    #[inline]
    fn finalize(self) -> Tag {
        let mut output = self.0.finalize();
        output.reverse();
        output
    }
}

impl Reset for GHash {
    fn reset(&mut self) {
        self.0.reset();
    }
}

opaque_debug::implement!(GHash);

#[cfg(test)]
mod tests {
    use crate::{universal_hash::UniversalHash, GHash, KeyInit, BLOCK_SIZE};
    use hex_literal::hex;

    //
    // Values taken from test case 2 of "The Galois/Counter Mode of Operation"
    // <https://csrc.nist.rip/groups/ST/toolkit/BCM/documents/proposedmodes/gcm/gcm-spec.pdf>
    //

    const H: [u8; BLOCK_SIZE] = hex!("66e94bd4ef8a2c3b884cfa59ca342b2e");
    const X_1: [u8; BLOCK_SIZE] = hex!("0388dace60b6a392f328c2b971b2fe78");

    /// (0 ^ X_1) * H
    const X_1_TIMES_H: [u8; BLOCK_SIZE] = hex!("5e2ec746917062882c85b0685353deb7");

    #[test]
    fn single_block_multiplies_by_h() {
        let mut ghash = GHash::new(&H.into());
        ghash.update(&[X_1.into()]);
        assert_eq!(&X_1_TIMES_H[..], ghash.finalize().as_slice());
    }

    #[test]
    fn zero_block_stays_zero() {
        let mut ghash = GHash::new(&H.into());
        ghash.update(&[Default::default(), Default::default()]);
        assert_eq!(&[0u8; BLOCK_SIZE][..], ghash.finalize().as_slice());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut ghash = GHash::new(&H.into());
        ghash.update(&[H.into()]);
        let _ = ghash.finalize_reset();

        ghash.update(&[X_1.into()]);
        assert_eq!(&X_1_TIMES_H[..], ghash.finalize().as_slice());
    }
}
