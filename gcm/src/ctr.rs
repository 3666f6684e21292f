//! Counter mode keystream with a 32-bit big endian counter (`inc32`).

use crate::{Block, Error, BLOCK_SIZE};
use cipher::{consts::U16, BlockEncrypt, BlockSizeUser};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Number of counter blocks encrypted per cipher invocation.
const PAR_BLOCKS: usize = 2;

/// Size of the counter space: the counter field is 32 bits wide.
const COUNTER_SPACE: u64 = 1 << 32;

/// Offset of the counter field within a counter block.
const COUNTER_OFFSET: usize = BLOCK_SIZE - 4;

/// GCM keystream generator.
///
/// Counter blocks are `nonce || [counter]32`. The first block produced is
/// `E(K, J0)`, the tag mask; message keystream starts at `inc32(J0)`.
/// Generation refuses to continue once the counter field would wrap.
pub(crate) struct Ctr32<'c, C> {
    cipher: &'c C,

    /// Leftmost 96 bits of every counter block.
    nonce: [u8; COUNTER_OFFSET],

    /// Next counter value. Reaching `COUNTER_SPACE` means exhausted.
    counter: u64,
}

impl<'c, C> Ctr32<'c, C>
where
    C: BlockEncrypt + BlockSizeUser<BlockSize = U16>,
{
    /// Position a keystream generator at `j0`.
    pub(crate) fn new(cipher: &'c C, j0: &Block) -> Self {
        let mut nonce = [0u8; COUNTER_OFFSET];
        nonce.copy_from_slice(&j0[..COUNTER_OFFSET]);
        let mut counter = [0u8; 4];
        counter.copy_from_slice(&j0[COUNTER_OFFSET..]);

        Self {
            cipher,
            nonce,
            counter: u64::from(u32::from_be_bytes(counter)),
        }
    }

    /// Number of keystream blocks which can still be produced.
    pub(crate) fn remaining_blocks(&self) -> u64 {
        COUNTER_SPACE - self.counter
    }

    /// Write the next keystream block into `block`.
    pub(crate) fn write_keystream_block(&mut self, block: &mut Block) -> Result<(), Error> {
        self.next_counter_block(block)?;
        self.cipher.encrypt_block(block);
        Ok(())
    }

    /// XOR the keystream into `buffer`.
    ///
    /// Returns [`Error::LengthOverflow`] without modifying `buffer` if it would
    /// exhaust the counter space.
    pub(crate) fn apply_keystream(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        let blocks_needed = (buffer.len() as u64).div_ceil(BLOCK_SIZE as u64);
        if blocks_needed > self.remaining_blocks() {
            return Err(Error::LengthOverflow);
        }

        for chunk in buffer.chunks_mut(BLOCK_SIZE * PAR_BLOCKS) {
            let mut keystream: [Block; PAR_BLOCKS] = Default::default();

            // only the last chunk may be short; it never gets surplus blocks
            let keystream = &mut keystream[..chunk.len().div_ceil(BLOCK_SIZE)];
            for block in keystream.iter_mut() {
                self.next_counter_block(block)?;
            }
            self.cipher.encrypt_blocks(keystream);

            for (a, b) in chunk.iter_mut().zip(keystream.iter().flatten()) {
                *a ^= *b;
            }

            #[cfg(feature = "zeroize")]
            keystream.iter_mut().for_each(|block| block.as_mut_slice().zeroize());
        }

        Ok(())
    }

    /// Fill `block` with the next counter block and advance the counter.
    fn next_counter_block(&mut self, block: &mut Block) -> Result<(), Error> {
        let counter = u32::try_from(self.counter).map_err(|_| Error::LengthOverflow)?;
        block[..COUNTER_OFFSET].copy_from_slice(&self.nonce);
        block[COUNTER_OFFSET..].copy_from_slice(&counter.to_be_bytes());
        self.counter += 1;
        Ok(())
    }
}
