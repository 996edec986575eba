//! Width computation at an exact power-of-two state count.
//!
//! A slapless instance with 1025 floor cells (one of them the lone live
//! destination, 46 of them popup walls) has
//! N = C(1,1) * 1024 * 2^46 = 2^56 states exactly. The serialized width must
//! be 7 bytes — the smallest count that holds N - 1 — and the topmost rank
//! must round-trip.

use statespace::core::bytes::StateBytes;
use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
use statespace::domain::Domain;

const DIM: usize = 33;

fn boundary_script() -> String {
    // Row-major cell roles: index 0 is the destination with its block,
    // 1..=46 are popup walls, 47 is the player on dead floor, everything up
    // to 1024 is user-marked dead floor, the trailing 64 cells are walls.
    let mut cells = Vec::with_capacity(DIM * DIM);
    cells.push('*');
    for _ in 0..46 {
        cells.push('o');
    }
    cells.push('=');
    for _ in 48..1025 {
        cells.push('_');
    }
    for _ in 1025..DIM * DIM {
        cells.push('#');
    }
    assert_eq!(cells.len(), DIM * DIM);

    let mut script = format!("size {DIM} {DIM}\nmap\n");
    for row in cells.chunks(DIM) {
        script.extend(row.iter());
        script.push('\n');
    }
    script
}

#[test]
fn power_of_two_state_count_fits_in_seven_bytes() {
    let options = SokobanOptions {
        slap: false,
        ..SokobanOptions::default()
    };
    let inst = SokobanInstance::load(boundary_script().as_bytes(), options).unwrap();

    assert_eq!(inst.floor(), 1025);
    assert_eq!(inst.live_floor(), 1);
    assert_eq!(inst.popups(), 46);
    assert_eq!(inst.state_count(), 1u64 << 56);
    assert_eq!(inst.state_bytes(), 7);

    let max = inst.max_rank();
    assert_eq!(max.value(), (1u64 << 56) - 1);

    // The topmost rank decodes and re-encodes exactly.
    let mut cfg = inst.start_config();
    inst.decode(&mut cfg, max.as_slice()).unwrap();
    assert_eq!(inst.encode(&mut cfg).unwrap(), max);

    // Arbitrary ranks are canonical after a single decode/encode pass.
    for x in [0u64, 1, (1 << 46) - 1, 1 << 46, (1 << 55) + 12345] {
        inst.decode(&mut cfg, StateBytes::from_value(x, 7).as_slice())
            .unwrap();
        let y = inst.encode(&mut cfg).unwrap();
        inst.decode(&mut cfg, y.as_slice()).unwrap();
        assert_eq!(inst.encode(&mut cfg).unwrap(), y);
    }
}
