mod common;

use std::path::Path;

use common::{add_band, add_ion_dynamics, add_magnetism, builder, container};
use vaspout::{Config, Container, Error, StepReader};
use vaspout_io::{MemoryStore, Store, StoreError};

fn fixture() -> MemoryStore {
    let mut b = builder(6, 4, 0);
    add_magnetism(&mut b, 2);
    add_band(&mut b, false);
    add_ion_dynamics(&mut b);
    b.finish().unwrap()
}

fn memory_opener(store: MemoryStore) -> impl FnOnce(&Path) -> Result<Box<dyn Store>, StoreError> {
    move |_| Ok(Box::new(store) as Box<dyn Store>)
}

#[test]
fn open_directory_resolves_default_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("vaspout.h5");
    std::fs::write(&file, b"").unwrap();

    let c = Container::open_with(dir.path(), &Config::default(), memory_opener(fixture())).unwrap();
    assert_eq!(c.path(), Some(file.as_path()));
    assert_eq!(c.version().unwrap().to_string(), "6.4.0");
}

#[test]
fn open_with_custom_filename() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("relax.h5"), b"").unwrap();
    let config = Config::default().with_default_filename("relax.h5");

    let c = Container::open_with(dir.path(), &config, memory_opener(fixture())).unwrap();
    assert!(c.path().unwrap().ends_with("relax.h5"));
}

#[test]
fn open_missing_file_is_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Container::open_with(dir.path(), &Config::default(), memory_opener(fixture()))
        .unwrap_err();
    match err {
        Error::Access(message) => assert!(message.contains("vaspout.h5")),
        other => panic!("expected access error, got {other:?}"),
    }
}

#[test]
fn backend_failure_is_access_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vaspout.h5"), b"not hdf5").unwrap();
    let err = Container::open_with(dir.path(), &Config::default(), |_| {
        Err(StoreError::Backend("unable to open file".into()))
    })
    .unwrap_err();
    match err {
        Error::Access(message) => assert!(message.contains("unable to open file")),
        other => panic!("expected access error, got {other:?}"),
    }
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_default_filename("");
    assert!(matches!(
        Container::open_with(dir.path(), &config, memory_opener(fixture())),
        Err(Error::Config(_))
    ));
}

#[test]
fn every_accessor_fails_after_close() {
    let c = Container::from_store(fixture()).unwrap();
    let structure = c.structure().unwrap();
    let band = c.band().unwrap().into_default().unwrap();
    let magnetism = c.magnetism().unwrap().unwrap();
    let energies = StepReader::new(c.get("intermediate/ion_dynamics/energies").unwrap(), "energies");
    c.close();

    let closed = |result: Result<(), Error>| matches!(result, Err(Error::Access(_)));
    assert!(closed(c.version().map(drop)));
    assert!(closed(c.exists("results").map(drop)));
    assert!(closed(c.get("results/positions/scale").map(drop)));
    assert!(closed(c.safe_get("charge/charge").map(drop)));
    assert!(closed(c.read_scalar("results/positions/scale").map(drop)));
    assert!(closed(c.topology().map(drop)));
    assert!(closed(c.cell().map(drop)));
    assert!(closed(c.structure().map(drop)));
    assert!(closed(c.magnetism().map(drop)));
    assert!(closed(c.energy().map(drop)));
    assert!(closed(c.trajectory().map(drop)));
    assert!(closed(c.density().map(drop)));
    assert!(closed(c.force().map(drop)));
    assert!(closed(c.stress().map(drop)));
    assert!(closed(c.kpoints().map(drop)));
    assert!(closed(c.projectors().map(drop)));
    assert!(closed(c.band().map(drop)));
    assert!(closed(c.dos().map(drop)));
    assert!(closed(c.dielectric_function().map(drop)));
    assert!(closed(c.dielectric_tensor().map(drop)));
    assert!(closed(c.force_constant().map(drop)));
    assert!(closed(c.exciton_density().map(drop)));

    // handles inside records assembled before closing
    assert!(closed(structure.positions.read().map(drop)));
    assert!(closed(structure.cell.lattice_vectors.shape().map(drop)));
    assert!(closed(structure.topology.ion_types.read_strings().map(drop)));
    assert!(closed(band.eigenvalues.read_f64().map(drop)));
    assert!(closed(band.kpoints.coordinates.dtype().map(drop)));
    assert!(closed(magnetism.charges(-1).map(drop)));
    assert!(closed(magnetism.moments(..).map(drop)));
    assert!(closed(energies.len().map(drop)));
    assert!(closed(energies.read(0).map(drop)));
    assert!(!structure.positions.is_valid());
}

#[test]
fn drop_closes_the_store() {
    let handle = {
        let c = container(builder(6, 4, 0));
        c.get("results/positions/position_ions").unwrap()
    };
    assert!(!handle.is_valid());
    assert!(matches!(handle.read(), Err(Error::Access(message)) if message == "I/O operation on closed file."));
}

#[test]
fn scalars_are_read_eagerly() {
    let c = container(builder(6, 4, 0));
    let cell = c.cell().unwrap();
    c.close();
    assert_eq!(cell.scale, 3.9);
}
