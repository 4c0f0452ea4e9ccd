//! Conveyor Pipeline - producer/consumer driver
//!
//! Menjalankan N producer dan M consumer di atas satu bounded queue,
//! lalu shutdown + destroy dan memverifikasi accounting:
//! setiap item yang di-push diterima consumer, dibuang saat shutdown,
//! atau di-drain saat destroy. Tepat satu kali.
//!
//! Usage:
//!   cargo run --release --bin conveyor_pipeline [OPTIONS]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use conveyor::{BoundedBlockingQueue, FnDisposer, QueueStats};

/// Pipeline configuration
struct PipelineConfig {
    capacity: usize,
    producers: usize,
    consumers: usize,
    items_per_producer: u64,
    shutdown_after: Option<Duration>,
    verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            producers: 4,
            consumers: 4,
            items_per_producer: 100_000,
            shutdown_after: None,
            verbose: false,
        }
    }
}

/// Work item yang dipindahkan lewat queue
struct Job {
    producer: usize,
    sequence: u64,
    payload: Box<[u8; 64]>,
}

/// Pipeline statistics
struct PipelineStats {
    produced: AtomicU64,
    consumed: AtomicU64,
    disposed: AtomicU64,
    out_of_order: AtomicU64,
    checksum: AtomicU64,
}

impl PipelineStats {
    fn new() -> Self {
        Self {
            produced: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
            disposed: AtomicU64::new(0),
            out_of_order: AtomicU64::new(0),
            checksum: AtomicU64::new(0),
        }
    }

    fn print_report(&self, duration: Duration, queue: &QueueStats) {
        let produced = self.produced.load(Ordering::Relaxed);
        let consumed = self.consumed.load(Ordering::Relaxed);
        let disposed = self.disposed.load(Ordering::Relaxed);
        let out_of_order = self.out_of_order.load(Ordering::Relaxed);

        println!("\n📊 PIPELINE RESULTS");
        println!("===================");
        println!("  Duration:      {:.2}ms", duration.as_secs_f64() * 1000.0);
        println!("  Produced:      {}", produced);
        println!("  Consumed:      {}", consumed);
        println!("  Disposed:      {}", disposed);
        println!("  Checksum:      {}", self.checksum.load(Ordering::Relaxed));
        println!(
            "  Rate:          {:.2} M items/sec",
            consumed as f64 / duration.as_secs_f64() / 1_000_000.0
        );
        println!("\nQueue counters:");
        println!("  Pushed:        {}", queue.pushed);
        println!("  Popped:        {}", queue.popped);
        println!("  Discarded:     {}", queue.discarded);
        println!("  Drained:       {}", queue.drained);
        if out_of_order > 0 {
            println!("  Out of order:  {} ⚠️", out_of_order);
        }
    }
}

impl PipelineConfig {
    /// Tanpa consumer, producer akan blocking selamanya pada queue penuh
    fn validate(&self) -> Result<(), String> {
        if self.consumers == 0 {
            return Err("at least one consumer is required".to_string());
        }
        if self.producers == 0 {
            return Err("at least one producer is required".to_string());
        }
        Ok(())
    }
}

fn run_pipeline(config: &PipelineConfig) -> Result<(), String> {
    config.validate()?;

    println!("🚚 Conveyor Pipeline");
    println!("====================");
    println!("  Capacity:   {}", config.capacity);
    println!("  Producers:  {}", config.producers);
    println!("  Consumers:  {}", config.consumers);
    println!("  Items:      {} per producer", config.items_per_producer);
    if let Some(after) = config.shutdown_after {
        println!("  Shutdown:   after {}ms", after.as_millis());
    }

    let stats = Arc::new(PipelineStats::new());

    let disposer_stats = Arc::clone(&stats);
    let queue = BoundedBlockingQueue::try_with_disposer(
        config.capacity,
        FnDisposer(move |_job: Job| {
            disposer_stats.disposed.fetch_add(1, Ordering::Relaxed);
        }),
    )
    .map_err(|e| e.to_string())?;
    let queue = Arc::new(queue);

    let start = Instant::now();

    let producers: Vec<_> = (0..config.producers)
        .map(|producer| {
            let queue = Arc::clone(&queue);
            let stats = Arc::clone(&stats);
            let items = config.items_per_producer;
            thread::spawn(move || {
                for sequence in 0..items {
                    let mut payload = Box::new([0u8; 64]);
                    payload[0] = sequence as u8;
                    queue.push(Job {
                        producer,
                        sequence,
                        payload,
                    });
                    stats.produced.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..config.consumers)
        .map(|id| {
            let queue = Arc::clone(&queue);
            let stats = Arc::clone(&stats);
            let producer_count = config.producers;
            let verbose = config.verbose;
            thread::spawn(move || {
                // Dari sudut pandang satu consumer, sequence tiap producer
                // harus naik terus (FIFO global)
                let mut last_seen: Vec<Option<u64>> = vec![None; producer_count];
                let mut received = 0u64;
                while let Some(job) = queue.pop() {
                    if let Some(last) = last_seen[job.producer] {
                        if job.sequence <= last {
                            stats.out_of_order.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    last_seen[job.producer] = Some(job.sequence);
                    stats
                        .checksum
                        .fetch_add(job.payload[0] as u64, Ordering::Relaxed);
                    stats.consumed.fetch_add(1, Ordering::Relaxed);
                    received += 1;
                }
                if verbose {
                    println!("   [consumer {}] end-of-stream after {} items", id, received);
                }
            })
        })
        .collect();

    let shutdown_handle = config.shutdown_after.map(|after| {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            thread::sleep(after);
            queue.shutdown();
        })
    });

    for handle in producers {
        handle
            .join()
            .map_err(|_| "producer thread panicked".to_string())?;
    }
    queue.shutdown();

    for handle in consumers {
        handle
            .join()
            .map_err(|_| "consumer thread panicked".to_string())?;
    }
    if let Some(handle) = shutdown_handle {
        handle.join().ok();
    }

    let duration = start.elapsed();

    let queue = Arc::try_unwrap(queue).map_err(|_| "queue still shared".to_string())?;
    let queue_stats = queue.destroy();

    stats.print_report(duration, &queue_stats);
    verify_accounting(&stats, &queue_stats)
}

/// Setiap item yang ditawarkan ke queue harus berakhir tepat di satu tempat
fn verify_accounting(stats: &PipelineStats, queue: &QueueStats) -> Result<(), String> {
    let produced = stats.produced.load(Ordering::Relaxed);
    let consumed = stats.consumed.load(Ordering::Relaxed);
    let disposed = stats.disposed.load(Ordering::Relaxed);

    if queue.offered() != produced {
        return Err(format!("offered {} != produced {}", queue.offered(), produced));
    }
    if consumed + disposed != produced {
        return Err(format!(
            "consumed {} + disposed {} != produced {}",
            consumed, disposed, produced
        ));
    }
    if queue.in_flight() != 0 {
        return Err(format!("{} items leaked in queue", queue.in_flight()));
    }
    if stats.out_of_order.load(Ordering::Relaxed) > 0 {
        return Err("FIFO order violated".to_string());
    }

    println!("\n✅ ACCOUNTING OK - every item disposed exactly once");
    Ok(())
}

fn parse_args() -> PipelineConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = PipelineConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--capacity" | "-c" => {
                if i + 1 < args.len() {
                    config.capacity = args[i + 1].parse().unwrap_or(64);
                    i += 1;
                }
            }
            "--producers" | "-p" => {
                if i + 1 < args.len() {
                    config.producers = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--consumers" | "-k" => {
                if i + 1 < args.len() {
                    config.consumers = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--items" | "-n" => {
                if i + 1 < args.len() {
                    config.items_per_producer = args[i + 1].parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "--shutdown-after-ms" => {
                if i + 1 < args.len() {
                    config.shutdown_after = args[i + 1].parse().ok().map(Duration::from_millis);
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                println!("Conveyor Pipeline - bounded queue producer/consumer driver\n");
                println!("Usage: conveyor_pipeline [OPTIONS]\n");
                println!("Options:");
                println!("  -c, --capacity <N>          Queue capacity (default: 64)");
                println!("  -p, --producers <N>         Producer threads (default: 4)");
                println!("  -k, --consumers <N>         Consumer threads (default: 4)");
                println!("  -n, --items <N>             Items per producer (default: 100000)");
                println!("      --shutdown-after-ms <MS> Shut down early after MS milliseconds");
                println!("  -v, --verbose               Verbose output");
                println!("  -h, --help                  Show this help");
                std::process::exit(0);
            }
            other => {
                eprintln!("⚠️ Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    config
}

fn main() {
    let config = parse_args();

    let level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = run_pipeline(&config) {
        eprintln!("❌ Pipeline error: {}", e);
        std::process::exit(1);
    }
}
