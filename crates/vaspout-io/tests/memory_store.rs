use ndarray::{arr1, IxDyn};
use vaspout_io::{ArrayData, DType, MemoryStore, Scalar, Store, StoreError};

fn store() -> Box<dyn Store> {
    let mut b = MemoryStore::builder();
    b.create_dataset("version/major").with_i64_scalar(6);
    b.create_dataset("results/positions/ion_types")
        .with_strings(&["Sr", "Ti", "O"]);
    b.create_dataset("results/positions/number_ion_types")
        .with_i64_data(&[1, 1, 3]);
    b.create_dataset("results/electron_dos/dos")
        .with_f64_data(&[0.0; 12])
        .with_shape(&[1, 3, 4]);
    Box::new(b.finish().unwrap())
}

#[test]
fn trait_object_answers_metadata() {
    let store = store();
    assert!(store.contains("/results/electron_dos/"));
    assert_eq!(store.shape("results/electron_dos/dos").unwrap(), vec![1, 3, 4]);
    assert_eq!(store.dtype("results/positions/number_ion_types").unwrap(), DType::Int);
    assert_eq!(store.read_scalar("version/major").unwrap(), Scalar::Int(6));
}

#[test]
fn reads_typed_arrays() {
    let store = store();
    let types = store.read("results/positions/ion_types").unwrap();
    assert_eq!(types.dtype(), DType::String);
    assert_eq!(types.len(), 3);
    let counts = store.read("results/positions/number_ion_types").unwrap();
    assert_eq!(counts.into_f64().unwrap(), arr1(&[1.0, 1.0, 3.0]).into_dyn());
    let dos = store.read("results/electron_dos/dos").unwrap();
    assert_eq!(dos.shape(), vec![1, 3, 4]);
    assert!(matches!(dos, ArrayData::Float(ref a) if a.raw_dim() == IxDyn(&[1, 3, 4])));
}

#[test]
fn errors_name_the_path() {
    let store = store();
    let err = store.read("results/projectors/par").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref p) if p == "results/projectors/par"));
    assert!(err.to_string().contains("results/projectors/par"));
    let err = store.read_scalar("results/positions/ion_types").unwrap_err();
    assert!(matches!(err, StoreError::NotScalar { .. }));
}
