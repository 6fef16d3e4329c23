#![no_main]

use libfuzzer_sys::fuzz_target;
use opledger_core::{OpTable, OperationRegistry};
use opledger_wire::{NotedOpCodec, WireConfig};

fuzz_target!(|data: &[u8]| {
    let registry = OpTable::standard();

    for strict_flags in [false, true] {
        let codec = NotedOpCodec::new(WireConfig {
            strict_flags,
            ..Default::default()
        });

        if let Ok(op) = codec.decode(data, &registry) {
            assert!(registry.check_op(op.op_code().get()).is_ok());
            // Anything accepted must survive a clean re-encode
            let again = codec.decode(&codec.encode(&op), &registry).unwrap();
            assert_eq!(again, op);
        }

        if let Ok(ops) = codec.decode_batch(data, &registry) {
            assert!(ops.len() <= codec.config().max_batch_len);
        }
    }
});
