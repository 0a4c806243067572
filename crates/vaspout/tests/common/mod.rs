//! In-memory fixtures shaped like a small SrTiO3 calculation.

#![allow(dead_code)]

use vaspout::Container;
use vaspout_io::{MemoryStore, MemoryStoreBuilder};

pub const NUMBER_STEPS: usize = 4;
pub const NUMBER_ATOMS: usize = 5;
pub const NUMBER_KPOINTS: usize = 3;
pub const NUMBER_BANDS: usize = 2;
pub const NUMBER_ENERGIES: usize = 6;

/// Version and structure; everything else is added on demand.
pub fn builder(major: i64, minor: i64, patch: i64) -> MemoryStoreBuilder {
    let mut b = MemoryStore::builder();
    b.create_dataset("version/major").with_i64_scalar(major);
    b.create_dataset("version/minor").with_i64_scalar(minor);
    b.create_dataset("version/patch").with_i64_scalar(patch);
    b.create_dataset("results/positions/ion_types")
        .with_strings(&["Sr", "Ti", "O"]);
    b.create_dataset("results/positions/number_ion_types")
        .with_i64_data(&[1, 1, 3]);
    b.create_dataset("results/positions/scale").with_f64_scalar(3.9);
    b.create_dataset("results/positions/lattice_vectors")
        .with_f64_data(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
        .with_shape(&[3, 3]);
    b.create_dataset("results/positions/position_ions")
        .with_f64_data(&[
            0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 0.0, 0.5, 0.5, 0.5, 0.0, 0.5, 0.5, 0.5, 0.0,
        ])
        .with_shape(&[NUMBER_ATOMS, 3]);
    b
}

pub fn container(b: MemoryStoreBuilder) -> Container {
    Container::from_store(b.finish().unwrap()).unwrap()
}

fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

fn suffix(opt: bool) -> &'static str {
    if opt {
        "_kpoints_opt"
    } else {
        ""
    }
}

/// Moments `[step, component, atom, orbital]` with value `step` in every
/// charge entry.
pub fn add_magnetism(b: &mut MemoryStoreBuilder, components: usize) {
    let orbitals = 3;
    let len = NUMBER_STEPS * components * NUMBER_ATOMS * orbitals;
    let data: Vec<f64> = (0..len)
        .map(|i| (i / (components * NUMBER_ATOMS * orbitals)) as f64)
        .collect();
    b.create_dataset("intermediate/ion_dynamics/magnetism/moments")
        .with_f64_data(&data)
        .with_shape(&[NUMBER_STEPS, components, NUMBER_ATOMS, orbitals]);
}

pub fn add_kpoints(b: &mut MemoryStoreBuilder, opt: bool) {
    let input = if opt { "input/kpoints_opt" } else { "input/kpoints" };
    let results = format!("results/electron_eigenvalues{}", suffix(opt));
    b.create_dataset(&format!("{input}/mode")).with_string_scalar("line");
    b.create_dataset(&format!("{input}/number_kpoints"))
        .with_i64_scalar(NUMBER_KPOINTS as i64);
    b.create_dataset(&format!("{input}/labels_kpoints"))
        .with_strings(&["G", "X"]);
    b.create_dataset(&format!("{input}/positions_labels_kpoints"))
        .with_i64_data(&[1, 3]);
    b.create_dataset(&format!("{results}/kpoint_coords"))
        .with_f64_data(&ramp(NUMBER_KPOINTS * 3))
        .with_shape(&[NUMBER_KPOINTS, 3]);
    b.create_dataset(&format!("{results}/kpoints_symmetry_weight"))
        .with_f64_data(&[1.0; NUMBER_KPOINTS]);
}

pub fn add_band(b: &mut MemoryStoreBuilder, opt: bool) {
    add_kpoints(b, opt);
    let s = suffix(opt);
    let shape = [1, NUMBER_KPOINTS, NUMBER_BANDS];
    b.create_dataset(&format!("results/electron_eigenvalues{s}/eigenvalues"))
        .with_f64_data(&ramp(NUMBER_KPOINTS * NUMBER_BANDS))
        .with_shape(&shape);
    b.create_dataset(&format!("results/electron_eigenvalues{s}/fermiweights"))
        .with_f64_data(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0])
        .with_shape(&shape);
    b.create_dataset(&format!("results/electron_dos{s}/efermi"))
        .with_f64_scalar(if opt { 1.5 } else { 1.25 });
}

pub fn add_projectors(b: &mut MemoryStoreBuilder, opt: bool) {
    let s = suffix(opt);
    b.create_dataset(&format!("results/projectors{s}/lchar"))
        .with_strings(&["s", "p", "d"]);
    b.create_dataset(&format!("results/projectors{s}/par"))
        .with_f64_data(&ramp(NUMBER_ATOMS * 3 * NUMBER_KPOINTS * NUMBER_BANDS))
        .with_shape(&[1, NUMBER_ATOMS, 3, NUMBER_KPOINTS, NUMBER_BANDS]);
    b.create_dataset(&format!("results/electron_eigenvalues{s}/ispin"))
        .with_i64_scalar(1);
}

pub fn add_dos(b: &mut MemoryStoreBuilder, opt: bool) {
    let root = format!("results/electron_dos{}", suffix(opt));
    b.create_dataset(&format!("{root}/efermi")).with_f64_scalar(1.25);
    b.create_dataset(&format!("{root}/energies"))
        .with_f64_data(&ramp(NUMBER_ENERGIES));
    b.create_dataset(&format!("{root}/dos"))
        .with_f64_data(&ramp(NUMBER_ENERGIES))
        .with_shape(&[1, NUMBER_ENERGIES]);
    b.create_dataset(&format!("{root}/dospar"))
        .with_f64_data(&ramp(NUMBER_ATOMS * 3 * NUMBER_ENERGIES))
        .with_shape(&[1, NUMBER_ATOMS, 3, NUMBER_ENERGIES]);
}

pub fn add_ion_dynamics(b: &mut MemoryStoreBuilder) {
    b.create_dataset("intermediate/ion_dynamics/energies")
        .with_f64_data(&ramp(NUMBER_STEPS * 2))
        .with_shape(&[NUMBER_STEPS, 2]);
    b.create_dataset("intermediate/ion_dynamics/energies_tags")
        .with_strings(&["ion-electron   TOTEN", "kinetic energy EKIN"]);
    b.create_dataset("intermediate/ion_dynamics/position_ions")
        .with_f64_data(&ramp(NUMBER_STEPS * NUMBER_ATOMS * 3))
        .with_shape(&[NUMBER_STEPS, NUMBER_ATOMS, 3]);
    b.create_dataset("intermediate/ion_dynamics/lattice_vectors")
        .with_f64_data(&ramp(NUMBER_STEPS * 9))
        .with_shape(&[NUMBER_STEPS, 3, 3]);
    b.create_dataset("intermediate/ion_dynamics/forces")
        .with_f64_data(&ramp(NUMBER_STEPS * NUMBER_ATOMS * 3))
        .with_shape(&[NUMBER_STEPS, NUMBER_ATOMS, 3]);
    b.create_dataset("intermediate/ion_dynamics/stress")
        .with_f64_data(&ramp(NUMBER_STEPS * 9))
        .with_shape(&[NUMBER_STEPS, 3, 3]);
}

pub fn add_density(b: &mut MemoryStoreBuilder) {
    b.create_dataset("charge/charge")
        .with_f64_data(&ramp(2 * 4 * 4 * 4))
        .with_shape(&[2, 4, 4, 4]);
}

pub fn add_linear_response(b: &mut MemoryStoreBuilder) {
    let root = "results/linear_response";
    b.create_dataset(&format!("{root}/energies"))
        .with_f64_data(&ramp(NUMBER_ENERGIES));
    b.create_dataset(&format!("{root}/density_density_dielectric_function"))
        .with_f64_data(&ramp(2 * 9 * NUMBER_ENERGIES))
        .with_shape(&[2, 3, 3, NUMBER_ENERGIES]);
    b.create_dataset(&format!("{root}/method")).with_string_scalar("dft");
    b.create_dataset(&format!("{root}/electron_dielectric_tensor"))
        .with_f64_data(&ramp(9))
        .with_shape(&[3, 3]);
    b.create_dataset(&format!("{root}/ion_dielectric_tensor"))
        .with_f64_data(&ramp(9))
        .with_shape(&[3, 3]);
    b.create_dataset(&format!("{root}/force_constants"))
        .with_f64_data(&ramp(15 * 15))
        .with_shape(&[15, 15]);
}

pub fn add_excitons(b: &mut MemoryStoreBuilder, count: usize) {
    b.create_dataset("results/excitons/density")
        .with_f64_data(&ramp(count * 2 * 2 * 2))
        .with_shape(&[count, 2, 2, 2]);
}
