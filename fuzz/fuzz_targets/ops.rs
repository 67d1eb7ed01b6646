#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use refbuf::layout::region_len;
use refbuf::{AppendOutcome, ReadOptions, RefBuffer};

fuzz_target!(|data: Vec<u8>| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the slot count, the rest is an op script
    let slots = 1 + (data[0] as usize % 16);
    let script = &data[1..];

    // Payloads are carved from the input so references stay valid
    let mut region = vec![0u8; region_len(slots)];
    let mut buffer = RefBuffer::init(&mut region[..]).unwrap();
    let mut model: VecDeque<u8> = VecDeque::new();
    let mut guaranteed = false;

    let mut i = 0;
    while i + 2 < script.len() {
        let op = script[i];
        let a = script[i + 1] as usize;
        let b = script[i + 2] as usize;
        i += 3;

        if op & 1 == 0 {
            let len = a.min(script.len() - i);
            let payload = &script[i..i + len];
            let predicted = guaranteed || buffer.has_free_slot();
            let outcome = buffer.append(payload);
            assert!(!(predicted && outcome == AppendOutcome::Rejected));
            if outcome.is_stored() {
                model.extend(payload.iter().copied());
            }
            guaranteed = false;
        } else {
            let pop = op & 2 != 0;
            let mut out = vec![0u8; a];
            let outcome = buffer.read(&mut out, ReadOptions { offset: b, pop });
            if b > model.len() {
                assert_eq!(outcome.copied, 0);
            } else {
                let expected: Vec<u8> = model.iter().skip(b).take(a).copied().collect();
                assert_eq!(&out[..outcome.copied], &expected[..]);
                if pop {
                    model.drain(..b + outcome.copied);
                }
            }
            guaranteed = pop && outcome.traversed_entry;
        }

        assert_eq!(buffer.used_space(), model.len());
        assert_eq!(buffer.is_empty(), model.is_empty());
    }
});
