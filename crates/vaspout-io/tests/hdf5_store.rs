#![cfg(feature = "hdf5")]

use hdf5::types::VarLenUnicode;
use ndarray::{arr1, arr2};
use vaspout_io::{DType, Hdf5Store, Scalar, Store, StoreError};

fn write_fixture(path: &std::path::Path) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;
    let version = file.create_group("version")?;
    version.new_dataset::<i64>().create("major")?.write_scalar(&6i64)?;
    let positions = file.create_group("results")?.create_group("positions")?;
    positions
        .new_dataset::<f64>()
        .shape([2, 3])
        .create("lattice_vectors")?
        .write(&arr2(&[[1.0, 0.0, 0.0], [0.0, 2.0, 0.0]]))?;
    positions
        .new_dataset::<i32>()
        .shape([3])
        .create("number_ion_types")?
        .write(&arr1(&[1, 1, 3]))?;
    let names: Vec<VarLenUnicode> = ["Sr  ", "Ti", "O"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    positions
        .new_dataset::<VarLenUnicode>()
        .shape([3])
        .create("ion_types")?
        .write(&arr1(&names))?;
    Ok(())
}

#[test]
fn reads_what_hdf5_wrote() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vaspout.h5");
    write_fixture(&path).unwrap();

    let store = Hdf5Store::open(&path).unwrap();
    assert_eq!(store.path(), path.as_path());
    assert!(store.contains("results/positions"));
    assert!(store.contains("results/positions/ion_types"));
    assert!(!store.contains("results/electron_dos/dos"));

    assert_eq!(store.read_scalar("version/major").unwrap(), Scalar::Int(6));
    assert_eq!(store.shape("results/positions/lattice_vectors").unwrap(), vec![2, 3]);
    assert_eq!(store.dtype("results/positions/number_ion_types").unwrap(), DType::Int);

    let counts = store.read("results/positions/number_ion_types").unwrap();
    assert_eq!(counts.into_i64().unwrap(), arr1(&[1i64, 1, 3]).into_dyn());
    let names = store.read("results/positions/ion_types").unwrap();
    assert_eq!(names.into_strings().unwrap()[[0]], "Sr");
}

#[test]
fn missing_and_group_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vaspout.h5");
    write_fixture(&path).unwrap();
    let store = Hdf5Store::open(&path).unwrap();

    assert!(matches!(store.read("charge/charge"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.read("results/positions"), Err(StoreError::NotADataset(_))));
}

#[test]
fn read_slice_selects_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vaspout.h5");
    write_fixture(&path).unwrap();
    let store = Hdf5Store::open(&path).unwrap();

    let row = store.read_slice("results/positions/lattice_vectors", 1..2).unwrap();
    assert_eq!(row.into_f64().unwrap(), arr2(&[[0.0, 2.0, 0.0]]).into_dyn());
    let names = store.read_slice("results/positions/ion_types", 1..3).unwrap();
    assert_eq!(names.into_strings().unwrap(), arr1(&["Ti".to_string(), "O".to_string()]).into_dyn());
    let empty = store.read_slice("results/positions/number_ion_types", 2..2).unwrap();
    assert_eq!(empty.shape(), vec![0]);

    assert!(matches!(
        store.read_slice("results/positions/lattice_vectors", 1..3),
        Err(StoreError::RowsOutOfBounds { len: 2, .. })
    ));
    assert!(matches!(
        store.read_slice("version/major", 0..1),
        Err(StoreError::NoLeadingAxis(_))
    ));
}
