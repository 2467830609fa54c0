use std::io::{self, Write};

use crate::constants::MEM_SIZE;

// Program images are flat little-endian words. Anything past MEM_SIZE words is
// dropped, as is an odd trailing byte.
pub fn words_from_image(image: &[u8]) -> impl Iterator<Item = u16> + '_ {
    image
        .chunks_exact(2)
        .take(MEM_SIZE)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

////////////////////////////////////////////////////////////////////////////////

pub trait WriteU16 {
    fn write_u16(&mut self, val: u16) -> io::Result<()>;
}

impl<T: Write> WriteU16 for T {
    fn write_u16(&mut self, val: u16) -> io::Result<()> {
        let lower = val as u8;
        let upper = (val >> u8::BITS) as u8;
        self.write_all(&[lower, upper])
    }
}

pub fn image_from_words(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 2);
    for word in words {
        // Writes into a Vec can't fail.
        let _ = out.write_u16(*word);
    }
    out
}
