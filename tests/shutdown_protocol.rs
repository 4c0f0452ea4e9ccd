//! Shutdown Protocol Test - blocking, wake-up dan disposal
//!
//! Menguji queue dari luar crate dengan thread sungguhan:
//! - producer blocking saat penuh, consumer blocking saat kosong
//! - shutdown melepas semua thread yang blocking
//! - setiap item dibuang tepat satu kali
//!
//! Usage:
//!   cargo test --test shutdown_protocol

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use conveyor::{BoundedBlockingQueue, FnDisposer};

/// Cukup lama untuk thread lain sampai ke titik blocking
const SETTLE: Duration = Duration::from_millis(100);

/// Item yang mencatat drop-nya
struct Tracked {
    id: u32,
    drops: Arc<AtomicUsize>,
}

impl Tracked {
    fn new(id: u32, drops: &Arc<AtomicUsize>) -> Self {
        Self {
            id,
            drops: Arc::clone(drops),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_capacity_two_scenario() {
    let q = Arc::new(BoundedBlockingQueue::new(2));

    // Dua push pertama tidak blocking
    q.push(1u32);
    q.push(2u32);
    assert_eq!(q.len(), 2);

    let third_done = Arc::new(AtomicBool::new(false));
    let producer = {
        let q = Arc::clone(&q);
        let done = Arc::clone(&third_done);
        thread::spawn(move || {
            q.push(3u32);
            done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(SETTLE);
    assert!(
        !third_done.load(Ordering::SeqCst),
        "third push must block on a full queue"
    );
    assert_eq!(q.len(), 2);

    assert_eq!(q.pop(), Some(1));
    producer.join().unwrap();
    assert!(third_done.load(Ordering::SeqCst));

    assert_eq!(q.pop(), Some(2));
    assert_eq!(q.pop(), Some(3));

    // Queue kosong, belum shutdown: pop blocking sampai shutdown
    let consumer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.pop())
    };
    thread::sleep(SETTLE);
    assert!(!consumer.is_finished());

    q.shutdown();
    assert_eq!(consumer.join().unwrap(), None);
}

#[test]
fn test_shutdown_drains_before_end_of_stream() {
    let q = BoundedBlockingQueue::new(4);
    q.push("a");
    q.push("b");
    q.push("c");

    q.shutdown();
    assert!(q.is_shutdown());

    assert_eq!(q.pop(), Some("a"));
    assert_eq!(q.pop(), Some("b"));
    assert_eq!(q.pop(), Some("c"));
    assert_eq!(q.pop(), None);
    assert_eq!(q.pop(), None);
    assert!(q.is_empty());
}

#[test]
fn test_push_after_shutdown_returns_promptly() {
    let drops = Arc::new(AtomicUsize::new(0));
    let q = BoundedBlockingQueue::new(1);

    q.push(Tracked::new(1, &drops));
    q.shutdown();

    // Queue penuh dan shutdown: push tidak boleh blocking
    let start = Instant::now();
    q.push(Tracked::new(2, &drops));
    assert!(start.elapsed() < SETTLE);

    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(q.len(), 1);

    let item = q.pop().unwrap();
    assert_eq!(item.id, 1);
    drop(item);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
}

#[test]
fn test_shutdown_releases_blocked_producer() {
    let disposed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&disposed);
    let q = Arc::new(BoundedBlockingQueue::with_disposer(
        1,
        FnDisposer(move |item: u32| sink.lock().unwrap().push(item)),
    ));
    q.push(1);

    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.push(2))
    };
    thread::sleep(SETTLE);
    assert!(!producer.is_finished());

    q.shutdown();
    producer.join().unwrap();

    // Item producer yang blocking dibuang, item lama tetap ada
    assert_eq!(*disposed.lock().unwrap(), vec![2]);
    assert_eq!(q.pop(), Some(1));
    assert_eq!(q.pop(), None);
    assert_eq!(q.stats().discarded, 1);
}

#[test]
fn test_shutdown_releases_all_blocked_consumers() {
    let q: Arc<BoundedBlockingQueue<u32>> = Arc::new(BoundedBlockingQueue::new(4));

    let consumers: Vec<_> = (0..8)
        .map(|_| {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop())
        })
        .collect();

    thread::sleep(SETTLE);
    q.shutdown();

    for handle in consumers {
        assert_eq!(handle.join().unwrap(), None);
    }
}

#[test]
fn test_shutdown_releases_many_blocked_producers() {
    let drops = Arc::new(AtomicUsize::new(0));
    let q = Arc::new(BoundedBlockingQueue::new(2));
    q.push(Tracked::new(0, &drops));
    q.push(Tracked::new(1, &drops));

    let producers: Vec<_> = (0..6)
        .map(|i| {
            let q = Arc::clone(&q);
            let drops = Arc::clone(&drops);
            thread::spawn(move || q.push(Tracked::new(10 + i, &drops)))
        })
        .collect();

    thread::sleep(SETTLE);
    q.shutdown();
    for handle in producers {
        handle.join().unwrap();
    }

    assert_eq!(drops.load(Ordering::SeqCst), 6);
    assert_eq!(q.len(), 2);

    let q = Arc::try_unwrap(q).ok().expect("queue still shared");
    let stats = q.destroy();
    assert_eq!(stats.drained, 2);
    assert_eq!(drops.load(Ordering::SeqCst), 8);
}

#[test]
fn test_destroy_disposes_exactly_k_items() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&disposed);
    let q = BoundedBlockingQueue::with_disposer(
        16,
        FnDisposer(move |_item: Box<u64>| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    for i in 0..7 {
        q.push(Box::new(i));
    }
    assert!(!q.is_shutdown());

    let stats = q.destroy();
    assert_eq!(disposed.load(Ordering::SeqCst), 7);
    assert_eq!(stats.pushed, 7);
    assert_eq!(stats.drained, 7);
    assert_eq!(stats.in_flight(), 0);
}

#[test]
fn test_many_producers_many_consumers() {
    const PRODUCERS: u64 = 4;
    const PER_PRODUCER: u64 = 5_000;

    let q: Arc<BoundedBlockingQueue<u64>> = Arc::new(BoundedBlockingQueue::new(8));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    q.push(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(v) = q.pop() {
                    seen.push(v);
                }
                seen
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    q.shutdown();

    let mut all = Vec::new();
    for handle in consumers {
        let seen = handle.join().unwrap();
        // Per consumer, urutan item dari producer yang sama harus naik
        for p in 0..PRODUCERS {
            let from_p: Vec<_> = seen
                .iter()
                .filter(|&&v| v / PER_PRODUCER == p)
                .collect();
            assert!(from_p.windows(2).all(|w| w[0] < w[1]));
        }
        all.extend(seen);
    }

    all.sort_unstable();
    let expected: Vec<u64> = (0..PRODUCERS * PER_PRODUCER).collect();
    assert_eq!(all, expected);

    let stats = q.stats();
    assert_eq!(stats.pushed, PRODUCERS * PER_PRODUCER);
    assert_eq!(stats.popped, PRODUCERS * PER_PRODUCER);
    assert_eq!(stats.discarded, 0);
}

#[test]
fn test_single_producer_single_consumer_fifo() {
    let q = Arc::new(BoundedBlockingQueue::new(3));

    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || {
            for i in 0..1_000u32 {
                q.push(i);
            }
            q.shutdown();
        })
    };

    let mut received = Vec::new();
    while let Some(v) = q.pop() {
        received.push(v);
    }
    producer.join().unwrap();

    assert_eq!(received, (0..1_000).collect::<Vec<_>>());
}
