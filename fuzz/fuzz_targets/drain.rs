#![no_main]

use std::io::Read;

use libfuzzer_sys::fuzz_target;
use refbuf::{RefBuffer, RegionConfig};

fuzz_target!(|data: Vec<u8>| {
    // Split the input into records of varying sizes and drain them back
    let config = RegionConfig::new(8).unwrap();
    let mut region = config.allocate();
    let mut buffer = RefBuffer::init(&mut region[..]).unwrap();

    let mut expected = Vec::new();
    let mut rest = &data[..];
    while let Some((&len, tail)) = rest.split_first() {
        let len = (len as usize).min(tail.len());
        let (record, next) = tail.split_at(len);
        if buffer.append(record).is_stored() {
            expected.extend_from_slice(record);
        }
        rest = next;
    }

    let mut drain = buffer.drain();
    let mut out = Vec::new();
    drain.read_to_end(&mut out).unwrap();
    assert_eq!(out, expected);
    assert!(buffer.is_empty());
});
