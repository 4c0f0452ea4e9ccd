//! Error types untuk konstruksi queue

use std::collections::TryReserveError;

use thiserror::Error;

/// Kegagalan saat membuat queue.
///
/// Push dan pop tidak pernah gagal: push setelah shutdown membuang item,
/// pop pada queue yang sudah shutdown dan kosong mengembalikan `None`.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue capacity must be greater than zero")]
    ZeroCapacity,

    #[error("failed to allocate storage for {capacity} slots")]
    Allocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}
