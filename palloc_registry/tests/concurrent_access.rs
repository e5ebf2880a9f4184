//! Allocation-path readers racing administrative writers

use palloc::config::BinCapacity;
use palloc_registry::{BinSet, FileKind, PallocResult, Registry, SubsystemHooks};
use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, Ordering};

const WRITES: usize = 20_000;
const READERS: usize = 4;

#[test]
fn test_readers_never_observe_torn_sets() -> PallocResult<()> {
    let capacity = BinCapacity::MAX;
    let mut registry = Registry::with_capacity(capacity);
    let group = registry.create()?;

    // Every word differs between the two sets, so any mix of old and new
    // words is neither of them.
    let low = "0-31,64-95,128-159,192-223";
    let high = "32-63,96-127,160-191,224-255";
    let low_set = BinSet::parse(low, capacity).unwrap();
    let high_set = BinSet::parse(high, capacity).unwrap();
    registry.write(group, FileKind::Bins, low)?;

    let registry = &registry;
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                s.spawn(|| {
                    let mut last_version = 0;
                    let mut observed = 0usize;
                    while !done.load(Ordering::Acquire) {
                        let view = registry.bins_for(group).unwrap();
                        let bins = view.to_bin_set();
                        assert!(
                            bins == low_set || bins == high_set,
                            "torn snapshot: {bins}"
                        );
                        assert_eq!(view.version() % 2, 0);
                        assert!(view.version() >= last_version);
                        last_version = view.version();
                        observed += 1;
                    }
                    observed
                })
            })
            .collect();

        for i in 0..WRITES {
            let text = if i % 2 == 0 { high } else { low };
            registry.write(group, FileKind::Bins, text).unwrap();
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            assert!(reader.join().unwrap() > 0);
        }
    });

    Ok(())
}

#[test]
fn test_snapshot_before_and_after_write() -> PallocResult<()> {
    let capacity = BinCapacity::new(64).unwrap();
    let mut registry = Registry::with_capacity(capacity);
    let group = registry.create()?;
    registry.write(group, FileKind::Bins, "0-15")?;

    let registry = &registry;
    let before_write = Barrier::new(2);
    let after_write = Barrier::new(2);

    std::thread::scope(|s| {
        let reader = s.spawn(|| {
            let before = registry.bins_for(group).unwrap();
            before_write.wait();
            after_write.wait();
            let after = registry.bins_for(group).unwrap();
            (before.to_bin_set(), after.to_bin_set())
        });

        before_write.wait();
        registry.write(group, FileKind::Bins, "16-31,48").unwrap();
        after_write.wait();

        let (before, after) = reader.join().unwrap();
        assert_eq!(before.format(), "0-15");
        assert!(!before.contains(16) && !before.contains(48));
        assert_eq!(after.format(), "16-31,48");
    });

    Ok(())
}

#[test]
fn test_concurrent_writers_to_one_group_serialise() -> PallocResult<()> {
    let capacity = BinCapacity::MAX;
    let mut registry = Registry::with_capacity(capacity);
    let group = registry.create()?;
    let registry = &registry;

    let candidates = ["0-255", "1-254:1/2", "7", ""];
    std::thread::scope(|s| {
        for text in candidates {
            s.spawn(move || {
                for _ in 0..1_000 {
                    registry.write(group, FileKind::Bins, text).unwrap();
                }
            });
        }
    });

    let final_bins = registry.bins_for(group)?.to_bin_set();
    assert!(
        candidates
            .iter()
            .any(|text| BinSet::parse(text, capacity).unwrap() == final_bins)
    );
    assert_eq!(registry.bins_for(group)?.version(), 2 * 4 * 1_000);
    Ok(())
}

#[test]
fn test_groups_written_in_parallel_stay_independent() -> PallocResult<()> {
    let capacity = BinCapacity::new(128).unwrap();
    let mut registry = Registry::with_capacity(capacity);
    let groups: Vec<_> = (0..8).map(|_| registry.create()).collect::<Result<_, _>>()?;
    let registry = &registry;

    std::thread::scope(|s| {
        for (i, &group) in groups.iter().enumerate() {
            s.spawn(move || {
                let text = format!("{}-{}", i * 16, i * 16 + 15);
                for _ in 0..500 {
                    registry.write(group, FileKind::Bins, &text).unwrap();
                    let view = registry.bins_for(group).unwrap();
                    assert_eq!(view.len(), 16);
                    assert!(view.iter().all(|bin| bin / 16 == i));
                }
            });
        }
    });

    Ok(())
}
