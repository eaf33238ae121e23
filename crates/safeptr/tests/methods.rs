//! Accessors, checked indexing, and misuse diagnostics.

use proptest::prelude::*;
use safeptr::{SafePtr, SafePtrError, Tracked, Untracked, WarningKind};
use safeptr_test_utils::{assert_warns, collecting_registry, raising_registry};

#[test]
fn accessors_on_live_buffer() {
    let reg = raising_registry("methods");
    let mut p0 = SafePtr::<i32, Tracked>::new_in(0, &reg);
    let mut p1 = SafePtr::from_vec_in(vec![4, 3, 2, 1], &reg);

    assert_eq!(p1.len(), 4);
    assert_eq!([p1[0], p1[1], p1[2], p1[3]], [4, 3, 2, 1]);
    for (i, expected) in [4, 3, 2, 1].iter().enumerate() {
        assert_eq!(p1.at(i), Ok(expected));
    }
    assert_eq!(p1.at(4), Err(SafePtrError::OutOfRange { index: 4, len: 4 }));

    assert!(p0.is_empty());
    assert!(!p1.is_empty());
    assert_eq!(p1.as_ptr(), p1.as_ptr_range().start);
    assert_eq!(p1.as_ptr_range().end, p1.as_ptr().wrapping_add(p1.len()));
    assert_eq!(p1.front(), Some(&p1[0]));
    assert_eq!(p1.back(), Some(&p1[3]));

    for v in &mut p1 {
        *v = 1;
    }
    assert!(p1.iter().all(|&v| v == 1));
    p1.fill(2);
    assert_eq!(p1.as_slice(), &[2, 2, 2, 2]);

    p0.free().unwrap();
    p1.free().unwrap();
}

#[test]
fn every_accessor_warns_after_free() {
    let reg = raising_registry("use-after-free");
    let mut p = SafePtr::from_vec_in(vec![4, 3, 2, 1], &reg);
    let id = p.identity();
    p.free().unwrap();

    let w = assert_warns!(WarningKind::UseAfterFree, p.len());
    assert_eq!(w.identity, id);
    assert_eq!(w.registry, "use-after-free");

    assert_warns!(WarningKind::UseAfterFree, p.is_empty());
    assert_warns!(WarningKind::UseAfterFree, p[0]);
    assert_warns!(WarningKind::UseAfterFree, p.at(0).is_ok());
    assert_warns!(WarningKind::UseAfterFree, p.as_ptr());
    assert_warns!(WarningKind::UseAfterFree, p.as_ptr_range());
    assert_warns!(WarningKind::UseAfterFree, p.as_slice().len());
    assert_warns!(WarningKind::UseAfterFree, p.iter().count());
    assert_warns!(WarningKind::UseAfterFree, p.front().copied());
    assert_warns!(WarningKind::UseAfterFree, p.back().copied());
    assert_warns!(WarningKind::UseAfterFree, p.fill(0));
    assert_warns!(WarningKind::UseAfterFree, p[1] = 7);
    assert_warns!(WarningKind::UseAfterFree, p.as_mut_ptr());
    assert_warns!(WarningKind::UseAfterFree, p.iter_mut().count());
    assert_warns!(WarningKind::UseAfterFree, p.at_mut(0).is_ok());
    assert_warns!(WarningKind::UseAfterFree, p.as_mut_slice().len());
    assert_warns!(WarningKind::UseAfterFree, p.clone());
    assert_warns!(WarningKind::UseAfterFree, p.take());

    // Queries that never report.
    assert!(p.is_freed());
    assert_eq!(p.identity(), id);
}

#[test]
fn use_after_free_sees_released_storage() {
    let (reg, sink) = collecting_registry("released-storage");
    let mut p = SafePtr::from_vec_in(vec![4, 3, 2, 1], &reg);
    p.free().unwrap();

    assert!(p.as_slice().is_empty());
    assert_eq!(p.at(0), Err(SafePtrError::OutOfRange { index: 0, len: 0 }));
    assert_eq!(sink.count(WarningKind::UseAfterFree), 2);
}

#[test]
fn comparing_freed_buffers_reports_each_operand() {
    let (reg, sink) = collecting_registry("eq-freed");
    let mut a = SafePtr::from_vec_in(vec![1, 2], &reg);
    let mut b = SafePtr::from_vec_in(vec![1, 2], &reg);
    let ids = [a.identity(), b.identity()];
    a.free().unwrap();
    b.free().unwrap();

    assert!(a == b);
    let reported: Vec<_> = sink.drain().into_iter().map(|w| (w.kind, w.identity)).collect();
    assert_eq!(
        reported,
        vec![
            (WarningKind::UseAfterFree, ids[0]),
            (WarningKind::UseAfterFree, ids[1]),
        ]
    );
}

#[test]
fn freeing_shared_identity_poisons_both_holders() {
    let reg = raising_registry("shared-free");
    let mut a = SafePtr::from_vec_in(vec![1u8, 2], &reg);
    let mut b = a.take();
    b.free().unwrap();
    assert!(a.is_freed());
    assert_warns!(WarningKind::UseAfterFree, a.len());
}

#[test]
fn drop_without_free_is_a_leak() {
    let reg = raising_registry("leak");
    let p = SafePtr::<u32, Tracked>::new_in(3, &reg);
    let id = p.identity();

    let w = assert_warns!(WarningKind::Leak, drop(p));
    assert_eq!(w.identity, id);
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn leak_reported_once_by_last_holder() {
    let (reg, sink) = collecting_registry("leak-shared");
    let mut a = SafePtr::from_vec_in(vec![1u16, 2, 3], &reg);
    let b = a.take();
    drop(a);
    assert!(sink.is_empty());
    drop(b);
    assert_eq!(sink.kinds(), vec![WarningKind::Leak]);
}

#[test]
fn move_assign_over_live_buffer_leaks_it() {
    let (reg, sink) = collecting_registry("leak-assign");
    let mut src = SafePtr::from_vec_in(vec![7i64], &reg);
    let mut dst = SafePtr::from_vec_in(vec![1i64, 2], &reg);
    let old = dst.identity();

    dst.move_from(&mut src);

    let warnings = sink.drain();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::Leak);
    assert_eq!(warnings[0].identity, old);
    dst.free().unwrap();
}

#[test]
fn freed_buffer_drops_silently() {
    let (reg, sink) = collecting_registry("no-leak");
    {
        let mut p = SafePtr::<char, Tracked>::new_in(8, &reg);
        let mut q = p.clone();
        p.free().unwrap();
        q.free().unwrap();
    }
    assert!(sink.is_empty());
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn empty_buffer_double_free() {
    let reg = raising_registry("empty-double-free");
    let mut p = SafePtr::<i32, Tracked>::new_in(0, &reg);
    p.free().unwrap();
    let err = p.free().unwrap_err();
    assert_eq!(
        err,
        SafePtrError::DoubleFree {
            identity: Some(p.identity())
        }
    );
    assert!(err.to_string().contains("free the same memory pointer twice"));
}

#[test]
fn untracked_detects_double_free_only() {
    let mut p: SafePtr<i32, Untracked> = SafePtr::from([1, 2, 3]);
    p.free().unwrap();
    // No ledger: access after free is not diagnosed, the buffer is just empty.
    assert_eq!(p.len(), 0);
    assert_eq!(p.free(), Err(SafePtrError::DoubleFree { identity: None }));
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_out_of_range_panics() {
    let p: SafePtr<i32, Untracked> = SafePtr::with_len(2);
    let _ = p[2];
}

proptest! {
    #[test]
    fn len_matches_construction(len in 0usize..512) {
        let mut p: SafePtr<u8, Untracked> = SafePtr::with_len(len);
        prop_assert_eq!(p.len(), len);
        prop_assert_eq!(p.is_empty(), len == 0);
        p.free().unwrap();
    }

    #[test]
    fn at_agrees_with_index(items in prop::collection::vec(any::<i32>(), 0..64), index in 0usize..80) {
        let (reg, sink) = collecting_registry("prop-at");
        let mut p = SafePtr::from_vec_in(items.clone(), &reg);
        match p.at(index) {
            Ok(v) => {
                prop_assert!(index < items.len());
                prop_assert_eq!(*v, p[index]);
                prop_assert_eq!(*v, items[index]);
            }
            Err(err) => {
                prop_assert!(index >= items.len());
                prop_assert_eq!(err, SafePtrError::OutOfRange { index, len: items.len() });
            }
        }
        p.free().unwrap();
        drop(p);
        prop_assert!(sink.is_empty());
        prop_assert_eq!(reg.live_count(), 0);
    }
}
