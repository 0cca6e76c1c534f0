//! Mapping between SVWF indexes `(n, m, l)` and positions in a coefficient
//! sequence.
//!
//! A mapper fixes a bijection between the `2 * nmax` valid index triples of
//! a truncated expansion and the positions `0..2 * nmax` of a coefficient
//! vector, where `nmax = 2 nrank mrank - mrank (mrank - 1) + nrank` counts
//! the independent `(n, m)` pairs. Positions are grouped into [`Block`]s of
//! symmetry-equivalent indexes; how finely the blocks are carved is the
//! strategy choice of the concrete mappers in [`crate::mappers`].
//!
//! Mappers are built once and queried read-only afterwards. The
//! [`MapperRegistry`] caches built mappers by `(symmetry, nrank, mrank)` and
//! picks the best-fitting registered factory for new requests. The registry
//! is an explicitly constructed object passed by reference; it holds no
//! global state and is not thread-safe.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::index::{Block, Index, Offset, WaveType};
use crate::symmetry::Symmetry;


/// Relation between indexes `(n, m, l)` and positions in a coefficient
/// sequence, frozen after construction.
#[derive(Debug, Clone)]
pub struct Mapper {
    nrank: i32,
    mrank: i32,
    /// Number of independent `(n, m)` pairs for the given ranks.
    nmax: usize,
    symmetry: Symmetry,
    blocks: Vec<Block>,
    /// position -> dense index slot
    map_inv: Vec<usize>,
    /// dense index slot -> index
    map: Vec<Option<Index>>,
    /// position -> block id, filled by `freeze`
    block_of: Vec<usize>,
}

impl Mapper {
    /// Allocates an empty mapper for the given ranks; the concrete mappers
    /// fill it with blocks and bindings.
    pub(crate) fn with_ranks(symmetry: Symmetry, nrank: i32, mrank: i32) -> Result<Self> {
        if nrank < 1 {
            return Err(Error::MapperConfig(format!(
                "nrank must be at least 1 (nrank = {nrank})"
            )));
        }
        if mrank < 0 || mrank > nrank {
            return Err(Error::MapperConfig(format!(
                "mrank must lie in 0..=nrank (nrank = {nrank}, mrank = {mrank})"
            )));
        }

        let nmax = (2 * nrank * mrank - mrank * (mrank - 1) + nrank) as usize;
        Ok(Self {
            nrank,
            mrank,
            nmax,
            symmetry,
            blocks: Vec::new(),
            map_inv: vec![0; 2 * nmax],
            map: vec![None; 2 * nmax],
            block_of: Vec::new(),
        })
    }

    /// Appends an empty block starting at `offset`, returning its id.
    pub(crate) fn push_block(&mut self, offset: usize) -> usize {
        let id = self.blocks.len();
        self.blocks.push(Block::new(id, offset));
        id
    }

    pub(crate) fn set_block_parent(&mut self, block: usize, parent: usize) {
        self.blocks[block].set_parent(parent);
    }

    /// Appends the index `(n, m, l)` to the given block, assigning it the
    /// block's next position.
    pub(crate) fn bind(&mut self, block: usize, n: i32, m: i32, l: WaveType) -> Result<()> {
        let key = self.hash_index(n, m, l)?;
        let position = self.blocks[block].push();
        self.map_inv[position] = key;
        self.map[key] = Some(Index::new(position, n, m, l));
        Ok(())
    }

    /// Verifies that construction bound every index exactly once and builds
    /// the position -> block lookup.
    pub(crate) fn freeze(&mut self) -> Result<()> {
        let count = self.count();
        let mut block_of = vec![usize::MAX; count];
        for block in &self.blocks {
            for position in block.positions() {
                if position >= count || block_of[position] != usize::MAX {
                    return Err(Error::MapperConfig(
                        "blocks do not partition the position range".into(),
                    ));
                }
                block_of[position] = block.id();
            }
        }
        if block_of.iter().any(|&b| b == usize::MAX) || self.map.iter().any(Option::is_none) {
            return Err(Error::MapperConfig(
                "construction left unbound positions".into(),
            ));
        }
        self.block_of = block_of;
        Ok(())
    }

    /// Number of elements in the sequence.
    pub fn count(&self) -> usize {
        2 * self.nmax
    }

    pub fn nrank(&self) -> i32 {
        self.nrank
    }

    pub fn mrank(&self) -> i32 {
        self.mrank
    }

    pub fn symmetry(&self) -> &Symmetry {
        &self.symmetry
    }

    /// The equivalence-class blocks, in position order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: usize) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Iterates over the indexes bound to one block.
    pub fn block_indexes(&self, id: usize) -> impl Iterator<Item = Index> + '_ {
        self.blocks
            .get(id)
            .map(|b| b.positions())
            .unwrap_or(0..0)
            .filter_map(move |position| self.index(position).ok())
    }

    /// Dense slot uniquely determined by `(n, m, l)`, independent of the
    /// symmetry: `m = 0` first, then positive `m` bands, then negative.
    fn hash_index(&self, n: i32, m: i32, l: WaveType) -> Result<usize> {
        let ml = m.abs();
        if n <= 0 {
            return Err(Error::ArgumentOutOfRange(format!("n must be positive (n = {n})")));
        }
        if n > self.nrank {
            return Err(Error::ArgumentOutOfRange(format!(
                "n must not exceed nrank (n = {n}, nrank = {})",
                self.nrank
            )));
        }
        if ml > self.mrank {
            return Err(Error::ArgumentOutOfRange(format!(
                "|m| must not exceed mrank (m = {m}, mrank = {})",
                self.mrank
            )));
        }
        if ml > n {
            return Err(Error::ArgumentOutOfRange(format!(
                "|m| must not exceed n (n = {n}, m = {m})"
            )));
        }

        // indexes per positive band: nrank * b - b (b - 1) / 2
        let band = |b: i32| self.nrank * b - b * (b - 1) / 2;
        let res = if m == 0 {
            n - 1
        } else if m > 0 {
            self.nrank + band(m - 1) + n - m
        } else {
            self.nrank + band(self.mrank) + band(-m - 1) + n + m
        };

        let mut res = res as usize;
        if let WaveType::N = l {
            res += self.nmax;
        }
        Ok(res)
    }

    /// Position encoded by `(block, offset)`, validated against the block
    /// layout.
    fn hash_offset(&self, block: usize, offset: usize) -> Result<usize> {
        let b = self.blocks.get(block).ok_or_else(|| {
            Error::ArgumentOutOfRange(format!(
                "block id out of range (block = {block}, blocks = {})",
                self.blocks.len()
            ))
        })?;
        if offset >= b.len() {
            return Err(Error::ArgumentOutOfRange(format!(
                "offset out of range within block (offset = {offset}, length = {})",
                b.len()
            )));
        }
        Ok(b.offset() + offset)
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.count() {
            return Err(Error::ArgumentOutOfRange(format!(
                "position out of range (position = {position}, count = {})",
                self.count()
            )));
        }
        Ok(())
    }

    /// Index `(n, m, l)` stored at `position`.
    pub fn index(&self, position: usize) -> Result<Index> {
        self.check_position(position)?;
        let slot = self.map_inv[position];
        self.map[slot].ok_or_else(|| {
            Error::MapperConfig("position queried before construction finished".into())
        })
    }

    /// Index stored at `(block, offset)`.
    pub fn index_at(&self, block: usize, offset: usize) -> Result<Index> {
        let position = self.hash_offset(block, offset)?;
        self.index(position)
    }

    /// Block coordinates of `position`.
    pub fn offset(&self, position: usize) -> Result<Offset> {
        self.check_position(position)?;
        let block = self.block_of[position];
        Ok(Offset {
            position,
            block,
            offset: position - self.blocks[block].offset(),
        })
    }

    /// Block coordinates of the index `(n, m, l)`.
    pub fn offset_of(&self, n: i32, m: i32, l: WaveType) -> Result<Offset> {
        let slot = self.hash_index(n, m, l)?;
        let index = self.map[slot].ok_or_else(|| {
            Error::MapperConfig("index queried before construction finished".into())
        })?;
        self.offset(index.position)
    }
}

/// Builds mappers for the symmetries it understands.
pub trait MapperFactory {
    /// Creates a mapper instance.
    fn create(&self, symmetry: &Symmetry, nrank: i32, mrank: i32) -> Result<Mapper>;

    /// Scores how well this factory's strategy suits the given symmetry.
    /// The registry uses the factory with the highest positive score.
    fn weigh(&self, symmetry: &Symmetry) -> i32;
}

/// Collection of mapper factories plus a cache of built mappers.
///
/// Construct one per scattering run (or per test) and pass it by reference;
/// there is no global instance.
#[derive(Default)]
pub struct MapperRegistry {
    factories: Vec<Box<dyn MapperFactory>>,
    mappers: Vec<Rc<Mapper>>,
}

impl MapperRegistry {
    /// An empty registry with no factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory. Registration order breaks weight ties: a later
    /// factory replaces an earlier choice only with a strictly higher score.
    pub fn register(&mut self, factory: Box<dyn MapperFactory>) {
        self.factories.push(factory);
    }

    /// Returns the cached mapper for `(symmetry, nrank, mrank)`, building it
    /// through the best-scoring factory on a miss.
    pub fn mapper(&mut self, symmetry: &Symmetry, nrank: i32, mrank: i32) -> Result<Rc<Mapper>> {
        if let Some(existing) = self
            .mappers
            .iter()
            .find(|m| m.symmetry() == symmetry && m.nrank() == nrank && m.mrank() == mrank)
        {
            return Ok(Rc::clone(existing));
        }

        let mut best_weight = 0;
        let mut best: Option<&dyn MapperFactory> = None;
        for factory in &self.factories {
            let weight = factory.weigh(symmetry);
            if weight > best_weight {
                best_weight = weight;
                best = Some(factory.as_ref());
            }
        }
        let factory = best.ok_or(Error::NoSuitableMapper)?;

        let mapper = Rc::new(factory.create(symmetry, nrank, mrank)?);
        self.mappers.push(Rc::clone(&mapper));
        Ok(mapper)
    }
}
