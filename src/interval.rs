//! Rank-set compaction and pivot caches.
//!
//! Multi-key selection needs two bookkeeping structures, both created once
//! per top-level call and discarded with it:
//!
//! - a compaction of the caller's rank collection into a sorted, duplicate
//!   free array, with the working representation (small array / dense
//!   bitmap / sparse hash set) chosen statically from count and span;
//! - a [`PivotCache`] recording which positions already hold their final
//!   sorted value, so later frames skip ranges another frame resolved.
//!
//! The cache is a pure accelerator: every answer it gives is conservative
//! (`contains` may miss, `previous_pivot`/`next_pivot` may be `None`), and
//! driver correctness never depends on it. That is what lets the `Hash`
//! variant serve enormous sparse spans without tracking every position.

/// Rank count at or below which plain sort-and-dedup wins outright.
const SMALL_RANKS: usize = 64;

/// Span is "dense" when one bitmap word covers at least one rank.
const DENSE_WORDS_PER_RANK: usize = 64;

/// Spans at or below this always get the bitmap cache (128 KiB of words).
const BIT_SPAN_MAX: usize = 1 << 20;

/// Rank count at or below which the run-list cache stays cheap to mutate.
const RUN_RANKS_MAX: usize = 64;

/// Ranges added to the hash cache wider than this are recorded by their
/// endpoints only (sparse membership).
const HASH_RANGE_MAX: usize = 64;

// ===========================================================================
// Rank compaction
// ===========================================================================

/// Sorted, deduplicated copy of `ranks`. Representation chosen from count
/// and span; all three paths produce identical output.
pub fn compact_ranks(ranks: &[usize]) -> Vec<usize> {
    if ranks.len() <= SMALL_RANKS {
        return compact_by_sort(ranks);
    }
    let min = ranks.iter().copied().min().unwrap_or(0);
    let max = ranks.iter().copied().max().unwrap_or(0);
    let span = max - min + 1;
    if span / DENSE_WORDS_PER_RANK <= ranks.len() {
        compact_by_bitmap(ranks, min, max)
    } else {
        compact_by_hash(ranks)
    }
}

fn compact_by_sort(ranks: &[usize]) -> Vec<usize> {
    let mut ks = ranks.to_vec();
    ks.sort_unstable();
    ks.dedup();
    ks
}

fn compact_by_bitmap(ranks: &[usize], min: usize, max: usize) -> Vec<usize> {
    let words = (max - min) / 64 + 1;
    let mut bits = vec![0u64; words];
    for &k in ranks {
        bits[(k - min) >> 6] |= 1 << ((k - min) & 63);
    }
    let mut ks = Vec::with_capacity(ranks.len().min(max - min + 1));
    for (w, &word) in bits.iter().enumerate() {
        let mut word = word;
        while word != 0 {
            let b = word.trailing_zeros() as usize;
            ks.push(min + (w << 6) + b);
            word &= word - 1;
        }
    }
    ks
}

fn compact_by_hash(ranks: &[usize]) -> Vec<usize> {
    let mut set = IndexHash::with_capacity(ranks.len());
    let mut ks = Vec::with_capacity(ranks.len());
    for &k in ranks {
        if set.insert(k) {
            ks.push(k);
        }
    }
    ks.sort_unstable();
    ks
}

// ===========================================================================
// Open-addressing index set
// ===========================================================================

/// Open-addressing set of positions: multiplicative hash, power-of-two
/// capacity, linear probing. Positions are slice indices, so `u64::MAX` is
/// free to serve as the empty sentinel.
pub struct IndexHash {
    slots: Vec<u64>,
    mask: usize,
    len: usize,
}

const EMPTY: u64 = u64::MAX;

impl IndexHash {
    pub fn with_capacity(expected: usize) -> Self {
        let cap = (expected.max(8) * 2).next_power_of_two();
        IndexHash {
            slots: vec![EMPTY; cap],
            mask: cap - 1,
            len: 0,
        }
    }

    fn slot_of(&self, i: usize) -> usize {
        let h = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        ((h >> 32) ^ h) as usize & self.mask
    }

    /// Inserts `i`; returns whether it was newly added.
    pub fn insert(&mut self, i: usize) -> bool {
        debug_assert_ne!(i as u64, EMPTY);
        if self.len * 10 >= self.slots.len() * 7 {
            self.grow();
        }
        let mut s = self.slot_of(i);
        loop {
            let cur = self.slots[s];
            if cur == EMPTY {
                self.slots[s] = i as u64;
                self.len += 1;
                return true;
            }
            if cur == i as u64 {
                return false;
            }
            s = (s + 1) & self.mask;
        }
    }

    pub fn contains(&self, i: usize) -> bool {
        let mut s = self.slot_of(i);
        loop {
            let cur = self.slots[s];
            if cur == EMPTY {
                return false;
            }
            if cur == i as u64 {
                return true;
            }
            s = (s + 1) & self.mask;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn grow(&mut self) {
        let old = std::mem::replace(&mut self.slots, vec![EMPTY; (self.mask + 1) * 2]);
        self.mask = self.slots.len() - 1;
        self.len = 0;
        for word in old {
            if word != EMPTY {
                self.insert(word as usize);
            }
        }
    }
}

// ===========================================================================
// Pivot cache
// ===========================================================================

/// Positions of `[left, right]` already holding their final sorted value.
///
/// The representation is a static choice made once per call: a dense bitmap
/// when the span is modest, a sorted run list when the rank count is small,
/// and a sparse hash set otherwise.
pub enum PivotCache {
    Runs(RunCache),
    Bits(BitCache),
    Hash(HashCache),
}

impl PivotCache {
    pub fn new(left: usize, right: usize, rank_count: usize) -> Self {
        let span = right - left + 1;
        if span <= BIT_SPAN_MAX {
            PivotCache::Bits(BitCache::new(left, right))
        } else if rank_count <= RUN_RANKS_MAX {
            PivotCache::Runs(RunCache::new(left, right))
        } else {
            PivotCache::Hash(HashCache::new(left, right, rank_count))
        }
    }

    pub fn left(&self) -> usize {
        match self {
            PivotCache::Runs(c) => c.left,
            PivotCache::Bits(c) => c.left,
            PivotCache::Hash(c) => c.left,
        }
    }

    pub fn right(&self) -> usize {
        match self {
            PivotCache::Runs(c) => c.right,
            PivotCache::Bits(c) => c.right,
            PivotCache::Hash(c) => c.right,
        }
    }

    /// Nearest resolved position at or below `i`, if known.
    pub fn previous_pivot(&self, i: usize) -> Option<usize> {
        match self {
            PivotCache::Runs(c) => c.previous_pivot(i),
            PivotCache::Bits(c) => c.previous_pivot(i),
            PivotCache::Hash(_) => None,
        }
    }

    /// Nearest resolved position at or above `i`, if known.
    pub fn next_pivot(&self, i: usize) -> Option<usize> {
        match self {
            PivotCache::Runs(c) => c.next_pivot(i),
            PivotCache::Bits(c) => c.next_pivot(i),
            PivotCache::Hash(_) => None,
        }
    }

    pub fn add(&mut self, i: usize) {
        self.add_range(i, i);
    }

    /// Marks all of `[lo, hi]` resolved.
    pub fn add_range(&mut self, lo: usize, hi: usize) {
        debug_assert!(self.left() <= lo && lo <= hi && hi <= self.right());
        match self {
            PivotCache::Runs(c) => c.add_range(lo, hi),
            PivotCache::Bits(c) => c.add_range(lo, hi),
            PivotCache::Hash(c) => c.add_range(lo, hi),
        }
    }

    /// Whether `i` is known resolved. May answer `false` for positions the
    /// sparse variant chose not to track.
    pub fn contains(&self, i: usize) -> bool {
        match self {
            PivotCache::Runs(c) => c.contains(i),
            PivotCache::Bits(c) => c.contains(i),
            PivotCache::Hash(c) => c.set.contains(i),
        }
    }
}

/// Sorted disjoint resolved runs; best for few, far-apart pivots.
pub struct RunCache {
    left: usize,
    right: usize,
    runs: Vec<(usize, usize)>,
}

impl RunCache {
    fn new(left: usize, right: usize) -> Self {
        RunCache {
            left,
            right,
            runs: Vec::new(),
        }
    }

    fn add_range(&mut self, mut lo: usize, mut hi: usize) {
        // First run that could merge with [lo, hi], then every run starting
        // inside or adjacent to it.
        let i = self.runs.partition_point(|&(_, e)| e + 1 < lo);
        let mut j = i;
        while j < self.runs.len() && self.runs[j].0 <= hi + 1 {
            lo = lo.min(self.runs[j].0);
            hi = hi.max(self.runs[j].1);
            j += 1;
        }
        self.runs.splice(i..j, [(lo, hi)]);
    }

    fn previous_pivot(&self, i: usize) -> Option<usize> {
        let p = self.runs.partition_point(|&(s, _)| s <= i);
        if p == 0 {
            return None;
        }
        let (_, e) = self.runs[p - 1];
        Some(e.min(i))
    }

    fn next_pivot(&self, i: usize) -> Option<usize> {
        let p = self.runs.partition_point(|&(_, e)| e < i);
        if p == self.runs.len() {
            return None;
        }
        let (s, _) = self.runs[p];
        Some(s.max(i))
    }

    fn contains(&self, i: usize) -> bool {
        let p = self.runs.partition_point(|&(s, _)| s <= i);
        p > 0 && self.runs[p - 1].1 >= i
    }
}

/// Dense bitmap over the span; word scans answer previous/next.
pub struct BitCache {
    left: usize,
    right: usize,
    words: Vec<u64>,
}

impl BitCache {
    fn new(left: usize, right: usize) -> Self {
        BitCache {
            left,
            right,
            words: vec![0; (right - left) / 64 + 1],
        }
    }

    fn add_range(&mut self, lo: usize, hi: usize) {
        let (w1, b1) = ((lo - self.left) >> 6, (lo - self.left) & 63);
        let (w2, b2) = ((hi - self.left) >> 6, (hi - self.left) & 63);
        let head = !0u64 << b1;
        let tail = !0u64 >> (63 - b2);
        if w1 == w2 {
            self.words[w1] |= head & tail;
        } else {
            self.words[w1] |= head;
            for w in &mut self.words[w1 + 1..w2] {
                *w = !0;
            }
            self.words[w2] |= tail;
        }
    }

    fn contains(&self, i: usize) -> bool {
        let o = i - self.left;
        self.words[o >> 6] & (1 << (o & 63)) != 0
    }

    fn previous_pivot(&self, i: usize) -> Option<usize> {
        let o = i.min(self.right) - self.left;
        let (mut w, b) = (o >> 6, o & 63);
        let mut word = self.words[w] & (!0u64 >> (63 - b));
        loop {
            if word != 0 {
                let bit = 63 - word.leading_zeros() as usize;
                return Some(self.left + (w << 6) + bit);
            }
            if w == 0 {
                return None;
            }
            w -= 1;
            word = self.words[w];
        }
    }

    fn next_pivot(&self, i: usize) -> Option<usize> {
        if i > self.right {
            return None;
        }
        let o = i.max(self.left) - self.left;
        let (mut w, b) = (o >> 6, o & 63);
        let mut word = self.words[w] & (!0u64 << b);
        loop {
            if word != 0 {
                let bit = word.trailing_zeros() as usize;
                let pos = self.left + (w << 6) + bit;
                return if pos <= self.right { Some(pos) } else { None };
            }
            w += 1;
            if w == self.words.len() {
                return None;
            }
            word = self.words[w];
        }
    }
}

/// Sparse point set for enormous spans. Wide ranges are recorded by their
/// endpoints only, so `contains` is allowed to miss (the cache contract).
pub struct HashCache {
    left: usize,
    right: usize,
    set: IndexHash,
}

impl HashCache {
    fn new(left: usize, right: usize, rank_count: usize) -> Self {
        HashCache {
            left,
            right,
            set: IndexHash::with_capacity(rank_count * 4),
        }
    }

    fn add_range(&mut self, lo: usize, hi: usize) {
        if hi - lo <= HASH_RANGE_MAX {
            for i in lo..=hi {
                self.set.insert(i);
            }
        } else {
            self.set.insert(lo);
            self.set.insert(hi);
        }
    }
}
