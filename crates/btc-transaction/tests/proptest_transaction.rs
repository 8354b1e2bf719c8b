use proptest::prelude::*;

use btc_transaction::sighash::{self, SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_NONE, SIGHASH_SINGLE};
use btc_transaction::{Script, Transaction, TxInput, TxOutput, TxWitness};

/// Strategy to generate a random input.
///
/// The prev txid never starts all-zero so generated transactions do not
/// accidentally take the coinbase shape (which rewrites the version on
/// serialization and would break exact roundtrip comparison).
fn arb_input() -> impl Strategy<Value = TxInput> {
    (
        prop::array::uniform32(1u8..),             // prev txid, never zero
        any::<u32>(),                              // prev index
        prop::collection::vec(any::<u8>(), 0..64), // scriptSig bytes
        any::<u32>(),                              // sequence
    )
        .prop_map(|(hash, idx, script_bytes, seq)| {
            let mut input = TxInput::from_outpoint(hash, idx);
            input.script_sig = Script::from_bytes(script_bytes);
            input.sequence = seq;
            input
        })
}

/// Strategy to generate a random output.
fn arb_output() -> impl Strategy<Value = TxOutput> {
    (
        0i64..21_000_000_0000_0000,
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(value, script_bytes)| TxOutput::new(value, Script::from_bytes(script_bytes)))
}

/// Strategy to generate a valid random legacy transaction.
fn arb_legacy_transaction() -> impl Strategy<Value = Transaction> {
    (
        any::<u32>(), // version
        prop::collection::vec(arb_input(), 1..4),
        prop::collection::vec(arb_output(), 1..4),
        any::<u32>(), // locktime
    )
        .prop_map(|(version, inputs, outputs, locktime)| {
            let mut tx = Transaction::new();
            tx.version = version;
            tx.lock_time = locktime;
            for i in inputs {
                tx.add_input(i);
            }
            for o in outputs {
                tx.add_output(o);
            }
            tx
        })
}

/// Strategy to generate a random witness stack with at least one item,
/// so the segwit marker is actually emitted.
fn arb_witness() -> impl Strategy<Value = TxWitness> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 1..4)
        .prop_map(TxWitness::from_items)
}

/// Strategy to generate a valid random segwit transaction.
fn arb_segwit_transaction() -> impl Strategy<Value = Transaction> {
    arb_legacy_transaction().prop_flat_map(|tx| {
        let n = tx.input_count();
        (Just(tx), prop::collection::vec(arb_witness(), n..=n)).prop_map(|(mut tx, witnesses)| {
            for (i, w) in witnesses.into_iter().enumerate() {
                tx.set_witness(i, w).expect("index within input count");
            }
            tx
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn legacy_serialize_deserialize_roundtrip(tx in arb_legacy_transaction()) {
        let bytes = tx.to_bytes(true);
        let tx2 = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(bytes, tx2.to_bytes(true));
    }

    #[test]
    fn segwit_serialize_deserialize_roundtrip(tx in arb_segwit_transaction()) {
        let bytes = tx.to_bytes(true);
        let tx2 = Transaction::from_bytes(&bytes).unwrap();
        prop_assert!(tx2.has_segwit);
        prop_assert_eq!(tx2.witnesses.len(), tx2.input_count());
        prop_assert_eq!(bytes, tx2.to_bytes(true));
    }

    #[test]
    fn segwit_hex_roundtrip(tx in arb_segwit_transaction()) {
        let hex_str = tx.to_hex(true);
        let tx2 = Transaction::from_hex(&hex_str).unwrap();
        prop_assert_eq!(hex_str, tx2.to_hex(true));
    }

    #[test]
    fn txid_ignores_witness_data(tx in arb_segwit_transaction()) {
        let mut stripped = tx.clone();
        stripped.set_segwit(false);
        prop_assert_eq!(tx.txid(), stripped.txid());
    }

    #[test]
    fn digests_leave_transaction_unchanged(
        tx in arb_legacy_transaction(),
        flag in prop::sample::select(vec![
            SIGHASH_ALL,
            SIGHASH_NONE,
            SIGHASH_SINGLE,
            SIGHASH_ALL | SIGHASH_ANYONECANPAY,
        ]),
        script_code in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let before = tx.clone();
        let _ = sighash::legacy_digest(&tx, 0, &script_code, flag).unwrap();
        let _ = sighash::segwit_digest(&tx, 0, &script_code, 1000, flag).unwrap();
        prop_assert_eq!(tx, before);
    }
}
