//! Concurrent ledger stress.
//!
//! Many threads share one registry and hammer the same identities. A
//! correct ledger ends with no warnings and no entries.

use std::sync::Mutex;
use std::thread;

use safeptr::{SafePtr, Tracked};
use safeptr_test_utils::collecting_registry;

const THREAD_COUNT: usize = 1000;

#[test]
fn concurrent_takes_from_one_buffer() {
    let (reg, sink) = collecting_registry("ref-count-take");
    let a = Mutex::new(SafePtr::from_vec_in(vec![1.0f32, 2.0, 3.0, 4.0], &reg));

    thread::scope(|s| {
        for _ in 0..THREAD_COUNT {
            s.spawn(|| {
                let x = a.lock().unwrap().take();
                drop(x);
            });
        }
    });

    let mut a = a.into_inner().unwrap();
    assert_eq!(reg.ref_count(a.identity()), Some(1));
    a.free().unwrap();
    drop(a);

    assert!(sink.is_empty(), "unexpected warnings: {:?}", sink.warnings());
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn concurrent_copy_and_move_cycles() {
    let (reg, sink) = collecting_registry("ref-count-cycle");
    let mut b = SafePtr::<f32, Tracked>::from_vec_in(vec![1.0, 2.0, 3.0, 4.0], &reg);

    thread::scope(|s| {
        for _ in 0..THREAD_COUNT {
            s.spawn(|| {
                let mut x = SafePtr::from_vec_in(vec![5.0, 4.0, 3.0, 2.0, 1.0], &reg);
                let mut y = SafePtr::from_vec_in(vec![7.0, 8.0, 9.0], &reg);
                x.free().unwrap();
                x.clone_from(&b);
                x.free().unwrap();
                x.move_from(&mut y);
                x.free().unwrap();
                let mut z = b.clone();
                z.free().unwrap();
            });
        }
    });

    assert_eq!(reg.live_count(), 1);
    b.free().unwrap();
    drop(b);

    assert!(sink.is_empty(), "unexpected warnings: {:?}", sink.warnings());
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn concurrent_double_free_succeeds_exactly_once() {
    let (reg, sink) = collecting_registry("ref-count-free");
    let mut origin = SafePtr::<u64, Tracked>::new_in(16, &reg);
    let mut holders = Vec::with_capacity(64);
    for _ in 0..63 {
        holders.push(origin.take());
    }
    holders.push(origin);

    let successes = thread::scope(|s| {
        let handles: Vec<_> = holders
            .into_iter()
            .map(|mut p| s.spawn(move || p.free().is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count()
    });

    assert_eq!(successes, 1);
    assert!(sink.is_empty());
    assert_eq!(reg.live_count(), 0);
}
