#![no_main]

use libfuzzer_sys::fuzz_target;

use psum_core::planner::{ChunkPlan, ChunkSize};

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }
    // n capped at 100000, chunk size at 5000, workers at 63 for speed
    let n = u64::from(u32::from_le_bytes([data[0], data[1], data[2], data[3]])) % 100_000;
    let z = u64::from(u32::from_le_bytes([data[4], data[5], data[6], data[7]])) % 5_000;
    let workers = usize::from(u16::from_le_bytes([data[8], data[9]]) % 64);

    let Ok(plan) = ChunkPlan::new(n, workers, ChunkSize::from(z)) else {
        assert_eq!(n, 0);
        return;
    };

    let mut next = 1u64;
    let mut chunks = 0u64;
    let mut waves = 0u64;
    for wave in plan.waves() {
        waves += 1;
        assert!(wave.dispatch.len() <= workers);
        for (i, a) in wave.dispatch.iter().enumerate() {
            assert_eq!(a.rank, i + 1);
        }
        for r in wave.ranges() {
            assert_eq!(r.from, next);
            assert!(r.from <= r.to);
            next = r.to + 1;
            chunks += 1;
        }
    }
    assert_eq!(next, n + 1);
    assert_eq!(chunks, plan.chunk_count());
    assert_eq!(waves, plan.wave_count());
});
