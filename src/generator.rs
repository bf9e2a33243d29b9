use std::{
    sync::{Mutex, MutexGuard},
    time::SystemTime,
};

use rand::{rngs::StdRng, RngCore as _, SeedableRng as _};

use crate::{checksum, BYTE_LEN, PAYLOAD_LEN, TIMESTAMP_BYTES, TIMESTAMP_MAX};

/// Trait for entropy sources.
///
/// For a type to be used as the process-wide entropy source, implement the `EntropySource` trait,
/// create an [`EntropySourceHandle`] out of it and set the handle using the [`set_entropy_source`] function.
/// An entropy source can also be passed directly to [`Codec::generate_from`](crate::Codec::generate_from).
///
/// # Example
///
/// ```no_run
/// struct MySource;
///
/// impl MySource {
///     fn new() -> Self {
///         todo!()
///     }
/// }
///
/// impl reid::EntropySource for MySource {
///     fn timestamp(&mut self) -> u64 {
///         todo!()
///     }
///     fn fill_random(&mut self, buffer: &mut [u8]) {
///         todo!()
///     }
/// }
///
/// let my_source = MySource::new();
/// let handle = reid::EntropySourceHandle::new(my_source);
///
/// reid::set_entropy_source(handle);
/// ```
pub trait EntropySource: Send {
    /// Returns the current timestamp in microseconds since the Unix epoch.
    ///
    /// Only the lower 56 bits are stored in a REID.
    fn timestamp(&mut self) -> u64;

    /// Fills the buffer with cryptographically secure random bytes.
    fn fill_random(&mut self, buffer: &mut [u8]);
}

enum Source {
    Standard(Option<StdRng>),
    Custom(Box<dyn EntropySource>),
}

/// An owning handle for entropy sources.
///
/// A `EntropySourceHandle` wraps different types of entropy sources:
///
/// - [`STANDARD_ENTROPY_SOURCE`]
/// - Types implementing the [`EntropySource`] trait.
///
/// A `EntropySourceHandle` is accepted by [`set_entropy_source`] function.
pub struct EntropySourceHandle {
    source: Source,
}

impl EntropySourceHandle {
    /// Creates an `EntropySourceHandle` from a type implementing the `EntropySource` trait.
    #[must_use]
    pub fn new<T: EntropySource + 'static>(source: T) -> Self {
        Self {
            source: Source::Custom(Box::new(source)),
        }
    }
}

impl EntropySource for EntropySourceHandle {
    fn timestamp(&mut self) -> u64 {
        match &mut self.source {
            Source::Standard(_) => system_timestamp(),
            Source::Custom(source) => source.timestamp(),
        }
    }

    fn fill_random(&mut self, buffer: &mut [u8]) {
        match &mut self.source {
            Source::Standard(rng) => rng.get_or_insert_with(StdRng::from_entropy).fill_bytes(buffer),
            Source::Custom(source) => source.fill_random(buffer),
        }
    }
}

/// Standard entropy source.
///
/// This is the default entropy source used to generate REIDs if no
/// other entropy source is set.
///
/// This entropy source uses the system clock with microsecond resolution and a
/// cryptographically secure random number generator from the `rand` crate,
/// seeded by the operating system.
///
/// # Example
///
/// ```
/// reid::set_entropy_source(reid::STANDARD_ENTROPY_SOURCE);
///
/// assert_eq!(reid::generate(None).map(|id| id.to_string().len()), Ok(24));
/// ```
pub const STANDARD_ENTROPY_SOURCE: EntropySourceHandle = EntropySourceHandle {
    source: Source::Standard(None),
};

fn system_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |since_epoch| {
            u64::try_from(since_epoch.as_micros()).unwrap_or(u64::MAX)
        })
}

static SOURCE: Mutex<EntropySourceHandle> = Mutex::new(STANDARD_ENTROPY_SOURCE);

fn lock_source() -> MutexGuard<'static, EntropySourceHandle> {
    SOURCE.lock().unwrap_or_else(|poisoned| {
        SOURCE.clear_poison();
        poisoned.into_inner()
    })
}

/// Packs a fresh binary REID out of the given entropy source.
///
/// Bytes `[0, 7)` hold the timestamp, bytes `[7, 13)` the randomness,
/// and bytes `[13, 15)` the checksum over both.
pub fn generate_from<S: EntropySource + ?Sized>(source: &mut S) -> [u8; BYTE_LEN] {
    let timestamp = source.timestamp() & TIMESTAMP_MAX;

    let mut bytes = [0; BYTE_LEN];
    bytes[..TIMESTAMP_BYTES].copy_from_slice(&timestamp.to_be_bytes()[8 - TIMESTAMP_BYTES..]);
    source.fill_random(&mut bytes[TIMESTAMP_BYTES..PAYLOAD_LEN]);
    checksum::seal(&mut bytes);

    bytes
}

/// Packs a fresh binary REID out of the process-wide entropy source.
pub fn generate() -> [u8; BYTE_LEN] {
    generate_from(&mut *lock_source())
}

/// Sets the entropy source for generating REIDs.
///
/// Sets a new entropy source and returns the previous set entropy source.
///
/// Normally you don't need to call this function unless you're using a custom entropy source,
/// e.g. a deterministic one for tests.
pub fn set_entropy_source(source: EntropySourceHandle) -> EntropySourceHandle {
    std::mem::replace(&mut *lock_source(), source)
}
