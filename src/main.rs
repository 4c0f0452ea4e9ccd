//! Conveyor - Bounded Blocking Queue benchmark
//!
//! Mengukur:
//! - Latency push/pop single-thread (tanpa contention)
//! - Throughput multi-producer multi-consumer dengan blocking

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use conveyor::{BoundedBlockingQueue, RingBuffer};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("🚚 Conveyor Bounded Queue - Benchmark");
    println!("=====================================\n");

    benchmark_ring_buffer();
    benchmark_uncontended_queue();
    benchmark_contended_queue(4, 4, 1024);
    benchmark_contended_queue(4, 4, 1);

    println!("\n✅ All benchmarks complete!");
    println!("\nTo run a configurable pipeline: cargo run --release --bin conveyor_pipeline -- --help");
}

fn benchmark_ring_buffer() {
    println!("📊 Ring Buffer Storage (no lock)");
    println!("--------------------------------");

    const ITERATIONS: usize = 1_000_000;
    let mut rb: RingBuffer<u64> = RingBuffer::with_capacity(1024);

    let start = Instant::now();
    for i in 0..ITERATIONS {
        if rb.push(i as u64).is_err() {
            rb.pop();
            let _ = rb.push(i as u64);
        }
    }
    let push_duration = start.elapsed();

    let start = Instant::now();
    while rb.pop().is_some() {}
    let drain_duration = start.elapsed();

    let push_ns = push_duration.as_nanos() as f64 / ITERATIONS as f64;
    println!("  Operations:   {}", ITERATIONS);
    println!("  Push latency: {:.2} ns/op", push_ns);
    println!(
        "  Drain:        {:.2} μs for {} items\n",
        drain_duration.as_nanos() as f64 / 1000.0,
        rb.capacity()
    );
}

fn benchmark_uncontended_queue() {
    println!("📊 Blocking Queue (single thread, uncontended lock)");
    println!("---------------------------------------------------");

    const ITERATIONS: usize = 1_000_000;
    let q: BoundedBlockingQueue<u64> = BoundedBlockingQueue::new(1024);

    let start = Instant::now();
    for i in 0..ITERATIONS {
        q.push(i as u64);
        q.pop();
    }
    let cycle_duration = start.elapsed();

    let cycle_ns = cycle_duration.as_nanos() as f64 / ITERATIONS as f64;
    println!("  Operations:      {}", ITERATIONS);
    println!(
        "  Push+pop cycle:  {:.2} ns/op ({:.3} μs/op)",
        cycle_ns,
        cycle_ns / 1000.0
    );
    println!(
        "  Throughput:      {:.2} M cycles/sec\n",
        ITERATIONS as f64 / cycle_duration.as_secs_f64() / 1_000_000.0
    );

    q.destroy();
}

fn benchmark_contended_queue(producers: usize, consumers: usize, capacity: usize) {
    println!(
        "📊 Blocking Queue ({}P/{}C, capacity {})",
        producers, consumers, capacity
    );
    println!("-----------------------------------------");

    const ITEMS_PER_PRODUCER: usize = 250_000;
    let q: Arc<BoundedBlockingQueue<u64>> = Arc::new(BoundedBlockingQueue::new(capacity));

    let start = Instant::now();

    let producer_handles: Vec<_> = (0..producers)
        .map(|p| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..ITEMS_PER_PRODUCER {
                    q.push((p * ITEMS_PER_PRODUCER + i) as u64);
                }
            })
        })
        .collect();

    let consumer_handles: Vec<_> = (0..consumers)
        .map(|_| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut received = 0u64;
                while q.pop().is_some() {
                    received += 1;
                }
                received
            })
        })
        .collect();

    for handle in producer_handles {
        handle.join().ok();
    }
    q.shutdown();

    let received: u64 = consumer_handles
        .into_iter()
        .map(|h| h.join().unwrap_or(0))
        .sum();
    let duration = start.elapsed();

    let total = (producers * ITEMS_PER_PRODUCER) as u64;
    println!("  Items:       {} (received {})", total, received);
    println!("  Duration:    {:.2}ms", duration.as_secs_f64() * 1000.0);
    println!(
        "  Throughput:  {:.2} M items/sec\n",
        received as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}
