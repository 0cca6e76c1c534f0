//! Concrete mapping strategies.
//!
//! All strategies enumerate the same `2 * nmax` index triples; they differ
//! only in how finely the position range is carved into equivalence-class
//! blocks:
//!
//! - [`General`] groups triples by a composite key built from the rotational
//!   residue of `m` and the reflection parities, the finest symmetry-driven
//!   grouping and the one that actually compresses storage.
//! - [`Sphere`] gives every triple its own block, for spherical scatterers
//!   where each coefficient already stands alone.
//! - [`GeneralDoicu`] keeps a single undifferentiated block in the ordering
//!   of Doicu's reference implementation, for interoperability with
//!   literature conventions.

use itertools::iproduct;
use std::collections::HashMap;

use crate::error::Result;
use crate::index::WaveType;
use crate::mapper::{Mapper, MapperFactory, MapperRegistry};
use crate::symmetry::Symmetry;


/// Composite block key: rotational residue of `m` plus the active
/// reflection parities, packed into decimal digits.
fn block_key(symmetry: &Symmetry, mrank: i32, n: i32, m: i32, l: WaveType) -> i32 {
    let fold = match symmetry.rotate_phi {
        0 => 2 * mrank + 2, // continuous rotation: every m is its own residue
        f => f,
    };
    let rot = m.rem_euclid(fold);

    let par_z = if symmetry.reflection_z {
        (n + m + l.ordinal()).rem_euclid(2)
    } else {
        0
    };
    let par_y = if symmetry.reflection_y {
        (m + l.ordinal()).rem_euclid(2)
    } else {
        0
    };

    par_z + 10 * par_y + 100 * rot
}

/// Enumeration order of Doicu's reference implementation: wave type
/// outermost, then `|m|` ascending with the positive sign first, then `n`.
fn doicu_order(nrank: i32, mrank: i32) -> Vec<(WaveType, i32, i32)> {
    let mut out = Vec::new();
    for l in WaveType::both() {
        for m in 0..=mrank {
            let signed = if m == 0 { vec![0] } else { vec![m, -m] };
            for ml in signed {
                for n in ml.abs().max(1)..=nrank {
                    out.push((l, ml, n));
                }
            }
        }
    }
    out
}

/// Mapper for general symmetry: one block per composite symmetry key.
pub struct General;

impl General {
    /// Builds the mapper, grouping `(n, m, l)` by [`block_key`] and linking
    /// each negative-`m` block to the block holding its mirrored triples.
    pub fn build(symmetry: Symmetry, nrank: i32, mrank: i32) -> Result<Mapper> {
        let mut map = Mapper::with_ranks(symmetry, nrank, mrank)?;

        // count the members of every key, in first-seen order
        let mut key_counts: Vec<(i32, usize)> = Vec::new();
        for (l, n) in iproduct!(WaveType::both(), 1..=nrank) {
            let nm = n.min(mrank);
            for m in -nm..=nm {
                let key = block_key(map.symmetry(), mrank, n, m, l);
                match key_counts.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, count)) => *count += 1,
                    None => key_counts.push((key, 1)),
                }
            }
        }

        // lay the blocks out contiguously in key discovery order
        let mut block_of_key = HashMap::with_capacity(key_counts.len());
        let mut position = 0;
        for &(key, count) in &key_counts {
            let id = map.push_block(position);
            block_of_key.insert(key, id);
            position += count;
        }

        // bind the triples and record the mirror relation
        for (l, n) in iproduct!(WaveType::both(), 1..=nrank) {
            let nm = n.min(mrank);
            for m in -nm..=nm {
                let key = block_key(map.symmetry(), mrank, n, m, l);
                let id = block_of_key[&key];
                map.bind(id, n, m, l)?;

                if m < 0 && map.blocks()[id].parent().is_none() {
                    let mirror_key = block_key(map.symmetry(), mrank, n, -m, l);
                    map.set_block_parent(id, block_of_key[&mirror_key]);
                }
            }
        }

        map.freeze()?;
        Ok(map)
    }
}

impl MapperFactory for General {
    fn create(&self, symmetry: &Symmetry, nrank: i32, mrank: i32) -> Result<Mapper> {
        General::build(symmetry.clone(), nrank, mrank)
    }

    fn weigh(&self, _symmetry: &Symmetry) -> i32 {
        1
    }
}

/// Mapper for spherical symmetry: one block per index triple.
pub struct Sphere;

impl Sphere {
    pub fn build(symmetry: Symmetry, nrank: i32, mrank: i32) -> Result<Mapper> {
        let mut map = Mapper::with_ranks(symmetry, nrank, mrank)?;

        let mut position = 0;
        for (l, m, n) in doicu_order(nrank, mrank) {
            let id = map.push_block(position);
            map.bind(id, n, m, l)?;
            position += 1;
        }

        map.freeze()?;
        Ok(map)
    }
}

impl MapperFactory for Sphere {
    fn create(&self, symmetry: &Symmetry, nrank: i32, mrank: i32) -> Result<Mapper> {
        Sphere::build(symmetry.clone(), nrank, mrank)
    }

    fn weigh(&self, symmetry: &Symmetry) -> i32 {
        if symmetry.is_spherical() {
            2
        } else {
            0
        }
    }
}

/// Mapper using the item ordering of A. Doicu's implementation: a single
/// block, no compression.
pub struct GeneralDoicu;

impl GeneralDoicu {
    pub fn build(symmetry: Symmetry, nrank: i32, mrank: i32) -> Result<Mapper> {
        let mut map = Mapper::with_ranks(symmetry, nrank, mrank)?;

        let id = map.push_block(0);
        for (l, m, n) in doicu_order(nrank, mrank) {
            map.bind(id, n, m, l)?;
        }

        map.freeze()?;
        Ok(map)
    }
}

impl MapperFactory for GeneralDoicu {
    fn create(&self, symmetry: &Symmetry, nrank: i32, mrank: i32) -> Result<Mapper> {
        GeneralDoicu::build(symmetry.clone(), nrank, mrank)
    }

    fn weigh(&self, _symmetry: &Symmetry) -> i32 {
        1
    }
}

/// Registry with the stock strategies: [`General`] first (the tie-breaking
/// fallback), then [`GeneralDoicu`], then [`Sphere`] which outweighs both
/// for spherical symmetry.
pub fn default_registry() -> MapperRegistry {
    let mut registry = MapperRegistry::new();
    registry.register(Box::new(General));
    registry.register(Box::new(GeneralDoicu));
    registry.register(Box::new(Sphere));
    registry
}
