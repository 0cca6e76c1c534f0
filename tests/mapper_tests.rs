use itertools::iproduct;

use tmat::index::WaveType;
use tmat::mappers::{default_registry, General, GeneralDoicu, Sphere};
use tmat::settings::load_default_config;
use tmat::symmetry::{Plane, Rotation, Symmetry};

fn symmetry_grid() -> Vec<Symmetry> {
    vec![
        Symmetry::new(),
        Symmetry::new().reflect(Plane::Y),
        Symmetry::new().reflect(Plane::Z),
        Symmetry::new().reflect(Plane::Y).reflect(Plane::Z),
        Symmetry::new().rotate(Rotation::AxisZ, 2),
        Symmetry::new().rotate(Rotation::AxisZ, 4).reflect(Plane::Y),
        Symmetry::new().rotate(Rotation::AxisZ, 0),
        Symmetry::new().rotate(Rotation::All, 0),
    ]
}

#[test]
fn every_strategy_is_a_bijection() {
    for (sym, (nrank, mrank)) in iproduct!(symmetry_grid(), [(1, 0), (3, 2), (5, 5), (6, 3)]) {
        let maps = [
            General::build(sym.clone(), nrank, mrank).unwrap(),
            Sphere::build(sym.clone(), nrank, mrank).unwrap(),
            GeneralDoicu::build(sym.clone(), nrank, mrank).unwrap(),
        ];
        for map in &maps {
            // every position resolves, positions are exactly 0..count
            let mut seen = vec![false; map.count()];
            for p in 0..map.count() {
                let idx = map.index(p).unwrap();
                assert_eq!(idx.position, p);
                assert!(!seen[p], "position {p} produced twice");
                seen[p] = true;

                // round trip through the triple
                let offset = map.offset_of(idx.n, idx.m, idx.l).unwrap();
                assert_eq!(offset.position, p);
                // and through the block coordinates
                let again = map.index_at(offset.block, offset.offset).unwrap();
                assert_eq!(again, idx);
            }
            assert!(seen.iter().all(|&s| s));
        }
    }
}

#[test]
fn blocks_partition_the_sequence() {
    let sym = Symmetry::new().reflect(Plane::Y).rotate(Rotation::AxisZ, 3);
    let map = General::build(sym, 5, 4).unwrap();
    let total: usize = map.blocks().iter().map(|b| b.len()).sum();
    assert_eq!(total, map.count());
    for block in map.blocks() {
        for p in block.positions() {
            assert_eq!(map.offset(p).unwrap().block, block.id());
        }
    }
}

#[test]
fn negative_m_blocks_are_slaves_within_the_same_mapper() {
    let sym = Symmetry::new().reflect(Plane::Y).rotate(Rotation::AxisZ, 5);
    let map = General::build(sym, 4, 4).unwrap();
    for p in 0..map.count() {
        let idx = map.index(p).unwrap();
        if idx.m >= 0 {
            continue;
        }
        let block = map.block(map.offset(p).unwrap().block).unwrap();
        let parent = block.parent().expect("negative-m block must be a slave");
        assert!(parent < map.blocks().len());
        let mirrored = map.offset_of(idx.n, -idx.m, idx.l).unwrap();
        assert_eq!(mirrored.block, parent);
    }
}

#[test]
fn queries_reject_out_of_range_input() {
    let map = General::build(Symmetry::new(), 3, 2).unwrap();
    assert!(map.index(map.count()).is_err());
    assert!(map.offset(map.count()).is_err());
    assert!(map.offset_of(-1, 0, WaveType::M).is_err());
    assert!(map.offset_of(1, 2, WaveType::N).is_err());
    assert!(map.offset_of(4, 0, WaveType::M).is_err());
}

#[test]
fn registry_serves_settings_driven_problems() {
    let settings = load_default_config().unwrap();
    let mut registry = default_registry();
    let map = registry
        .mapper(&settings.symmetry(), settings.nrank, settings.mrank)
        .unwrap();
    assert_eq!(map.nrank(), settings.nrank);

    // a second request for the same problem reuses the cached mapper
    let again = registry
        .mapper(&settings.symmetry(), settings.nrank, settings.mrank)
        .unwrap();
    assert!(std::rc::Rc::ptr_eq(&map, &again));
}
