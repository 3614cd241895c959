//! Feeds arbitrary sample streams and queries through an extrapolator and
//! checks the invariants that must hold for any input.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reckon_extrapolate::Extrapolator;

#[derive(Arbitrary, Debug)]
enum Op {
    Sample {
        packet_time: i16,
        delay: u8,
        position: [i16; 2],
        velocity: Option<[i16; 2]>,
    },
    Read {
        time: i16,
    },
}

#[derive(Arbitrary, Debug)]
struct Input {
    start: i16,
    start_delay: u8,
    ops: Vec<Op>,
}

// Millisecond ticks keep times and positions finite and well-scaled.
fn secs(ticks: i32) -> f64 {
    ticks as f64 / 1000.0
}

fuzz_target!(|input: Input| {
    let mut ex = Extrapolator::<f64>::new(2);
    let start = secs(input.start as i32);
    ex.reset(start, start + secs(input.start_delay as i32), &[0.0, 0.0]);

    let mut out = [0.0; 2];
    let mut vel = [0.0; 2];

    for op in input.ops {
        match op {
            Op::Sample {
                packet_time,
                delay,
                position,
                velocity,
            } => {
                let pt = secs(packet_time as i32);
                let lt = pt + secs(delay as i32);
                let pos = [position[0] as f64, position[1] as f64];
                let last = ex.last_packet_time();
                let before = ex.clone();

                let accepted = match velocity {
                    Some(v) => {
                        let vel = [v[0] as f64, v[1] as f64];
                        ex.add_sample_with_velocity(pt, lt, &pos, &vel)
                    }
                    None => ex.add_sample(pt, lt, &pos),
                };

                assert_eq!(accepted, pt > last);
                if !accepted {
                    assert_eq!(ex, before);
                }
                assert!(ex.last_packet_time() >= last);
                assert!(ex.estimate_latency() >= 0.0);
                assert!(ex.estimate_update_time() >= 0.0);
            }
            Op::Read { time } => {
                let in_range = ex.read_position_and_velocity(secs(time as i32), &mut out, &mut vel);
                if !in_range {
                    assert_eq!(vel, [0.0, 0.0]);
                }
            }
        }
    }
});
