#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(structure) = phipsi_struct::parse_pdb(data) {
        for pair in &phipsi_struct::phi_psi_angles(&structure) {
            assert!(pair.phi > -180.0 && pair.phi <= 180.0);
            assert!(pair.psi > -180.0 && pair.psi <= 180.0);
        }
    }
});
