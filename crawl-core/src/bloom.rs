/// Seed table for the filter's k hash functions; the first `k` entries are
/// used. Matches the source's fixed table exactly so the filter's false
/// positive behavior is reproducible.
const SEEDS: [u64; 11] = [5, 7, 11, 13, 31, 37, 61, 67, 71, 73, 79];

/// RSHash: a running multiplicative accumulator over `bytes`, seeded with
/// `seed`. `a` starts at 63689 and is re-multiplied by `seed` after every
/// byte; the result is masked to 31 bits.
fn rs_hash(bytes: &[u8], seed: u64) -> u64 {
    let mut a: u64 = 63689;
    let mut hash: u64 = 0;
    for &byte in bytes {
        hash = hash.wrapping_mul(a).wrapping_add(byte as u64);
        a = a.wrapping_mul(seed);
    }
    hash & 0x7FFF_FFFF
}

/// A fixed-size Bloom filter: `m` bits, tuned for `n` intended inserts.
///
/// `test` both tests and inserts in one call: it returns `true` iff the URL
/// had never been seen before (at least one of its k bits was still 0),
/// and in that same call sets all k bits, so a second identical URL can
/// never pass again. Intended for single-threaded use (the filter stage
/// owns it exclusively); the read-modify-write across its k bits is not
/// made atomic across concurrent callers.
pub struct BloomFilter {
    bits: Vec<u64>,
    m: usize,
    k: usize,
}

impl BloomFilter {
    pub fn new(m: usize, n: usize) -> Self {
        let k = ((m as f64 / n as f64) * std::f64::consts::LN_2).floor() as usize;
        let k = k.clamp(1, SEEDS.len());
        let words = m.div_ceil(64);
        BloomFilter {
            bits: vec![0u64; words],
            m,
            k,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Tests whether `url` has been seen before; if not, records it.
    /// Returns `true` when `url` is new (i.e. it passes the filter).
    pub fn test(&mut self, url: &str) -> bool {
        let bytes = url.as_bytes();
        let mut already_set = true;

        let indices: Vec<usize> = SEEDS[..self.k]
            .iter()
            .map(|&seed| (rs_hash(bytes, seed) as usize) % self.m)
            .collect();

        for &idx in &indices {
            already_set &= self.bit(idx);
        }

        for &idx in &indices {
            self.set_bit(idx);
        }

        !already_set
    }

    fn bit(&self, idx: usize) -> bool {
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    fn set_bit(&mut self, idx: usize) {
        self.bits[idx / 64] |= 1 << (idx % 64);
    }
}
