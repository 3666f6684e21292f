//! GCM authenticator: GHASH over `A || pad || C || pad || [len(A)]64 || [len(C)]64`.
//!
//! See NIST SP 800-38D §7.1, steps 5 and 6:
//! <https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38d.pdf>

use crate::{Block, GHash, Key, Tag, BLOCK_SIZE};
use core::{
    fmt::{self, Debug},
    slice,
};
use crate::universal_hash::{KeyInit, UniversalHash};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Streaming GHASH accumulator for GCM.
///
/// Associated data is absorbed when the accumulator is created, which fixes
/// the `A`-then-`C` ordering GCM requires. Ciphertext may then be supplied in
/// chunks of any size: partial blocks are buffered so that zero padding is
/// only ever inserted at the end of the ciphertext, never between chunks.
///
/// Memory use is a single block regardless of the message length; the padded
/// `A || C || lengths` string is never materialized.
#[derive(Clone)]
pub struct Accumulator {
    /// Keyed GHASH state `Y`.
    ghash: GHash,

    /// Ciphertext bytes not yet forming a full block.
    buffer: Block,

    /// Number of valid bytes in `buffer`.
    pos: usize,

    /// Associated data length in bytes.
    aad_len: u64,

    /// Ciphertext length in bytes.
    text_len: u64,
}

impl Accumulator {
    /// Create an accumulator keyed with `H` and absorb the associated data.
    #[must_use]
    pub fn new(h: &Key, associated_data: &[u8]) -> Self {
        Self::with_ghash(GHash::new(h), associated_data)
    }

    /// Create an accumulator from an already-keyed [`GHash`] instance and absorb
    /// the associated data.
    ///
    /// `ghash` must not have processed any input.
    #[must_use]
    pub fn with_ghash(mut ghash: GHash, associated_data: &[u8]) -> Self {
        ghash.update_padded(associated_data);

        Self {
            ghash,
            buffer: Block::default(),
            pos: 0,
            aad_len: associated_data.len() as u64,
            text_len: 0,
        }
    }

    /// Absorb the next chunk of ciphertext.
    pub fn update(&mut self, mut ciphertext: &[u8]) {
        self.text_len += ciphertext.len() as u64;

        if self.pos > 0 {
            let n = core::cmp::min(BLOCK_SIZE - self.pos, ciphertext.len());
            let (head, rest) = ciphertext.split_at(n);
            self.buffer[self.pos..self.pos + n].copy_from_slice(head);
            self.pos += n;
            ciphertext = rest;

            if self.pos < BLOCK_SIZE {
                return;
            }

            self.ghash.update(slice::from_ref(&self.buffer));
            self.pos = 0;
        }

        let (blocks, tail) = ciphertext.split_at(ciphertext.len() - ciphertext.len() % BLOCK_SIZE);

        // `blocks` is a whole number of blocks, so no padding is applied here
        self.ghash.update_padded(blocks);

        self.buffer[..tail.len()].copy_from_slice(tail);
        self.pos = tail.len();
    }

    /// Number of associated data bytes absorbed.
    #[must_use]
    pub fn aad_len(&self) -> u64 {
        self.aad_len
    }

    /// Number of ciphertext bytes absorbed so far.
    #[must_use]
    pub fn text_len(&self) -> u64 {
        self.text_len
    }

    /// Pad the final ciphertext block, absorb the length block and return the
    /// raw GHASH output `Y`.
    ///
    /// The result is not yet a GCM tag: it still has to be masked with the
    /// encryption of the initial counter block.
    #[must_use]
    pub fn finalize(mut self) -> Tag {
        if self.pos > 0 {
            self.buffer[self.pos..].fill(0);
            self.ghash.update(slice::from_ref(&self.buffer));
        }

        #[cfg(feature = "zeroize")]
        self.buffer.as_mut_slice().zeroize();

        let mut lengths = Block::default();
        lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(self.text_len * 8).to_be_bytes());
        self.ghash.update(slice::from_ref(&lengths));

        self.ghash.finalize()
    }
}

impl Debug for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("aad_len", &self.aad_len)
            .field("text_len", &self.text_len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Accumulator;
    use hex_literal::hex;

    const H: [u8; 16] = hex!("b83b533708bf535d0aa6e52980d53b78");
    const AAD: [u8; 20] = hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");

    #[test]
    fn tracks_lengths() {
        let mut acc = Accumulator::new(&H.into(), &AAD);
        acc.update(&[0u8; 7]);
        acc.update(&[0u8; 30]);

        assert_eq!(acc.aad_len(), 20);
        assert_eq!(acc.text_len(), 37);
    }

    #[test]
    fn empty_updates_are_ignored() {
        let mut chunked = Accumulator::new(&H.into(), &AAD);
        chunked.update(&[]);
        chunked.update(&[0xab; 5]);
        chunked.update(&[]);

        let mut whole = Accumulator::new(&H.into(), &AAD);
        whole.update(&[0xab; 5]);

        assert_eq!(chunked.finalize(), whole.finalize());
    }

    #[test]
    fn length_block_only() {
        // With no input the only block is all-zero lengths, and (0 ^ 0) * H = 0
        let acc = Accumulator::new(&H.into(), b"");
        assert_eq!(acc.finalize().as_slice(), &[0u8; 16]);
    }
}
