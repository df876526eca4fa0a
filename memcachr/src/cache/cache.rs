use super::error::Result;
use bytes::Bytes;

/// Cache key type
pub type KeyType = Bytes;

/// Cache value associated with a key
pub type ValueType = Bytes;

/// Expiration requested by a client, relative to the moment of a write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeToLive {
    /// record never expires
    Infinite,
    /// record expires given number of seconds after it was written
    Seconds(u32),
    /// record is expired as soon as it is written
    Expired,
}

impl TimeToLive {
    /// Interprets memcached exptime field:
    /// 0 means no expiration, negative value means expire immediately
    pub fn from_seconds(seconds: i64) -> TimeToLive {
        match seconds {
            0 => TimeToLive::Infinite,
            s if s < 0 => TimeToLive::Expired,
            s => TimeToLive::Seconds(s.min(u32::MAX as i64) as u32),
        }
    }
}

/// Meta data stored with cache value
#[derive(Clone, Debug)]
pub struct CacheMetaData {
    pub(crate) flags: u32,
    /// absolute timer timestamp in milliseconds, None if record never expires
    pub(crate) expires_at: Option<u64>,
}

impl CacheMetaData {
    pub fn new(flags: u32) -> CacheMetaData {
        CacheMetaData {
            flags,
            expires_at: None,
        }
    }

    pub fn get_flags(&self) -> u32 {
        self.flags
    }

    pub fn get_expiration(&self) -> Option<u64> {
        self.expires_at
    }

    pub const fn len(&self) -> usize {
        std::mem::size_of::<CacheMetaData>()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Value and meta data stored in cache
#[derive(Clone, Debug)]
pub struct Record {
    pub(crate) header: CacheMetaData,
    pub(crate) value: ValueType,
}

impl Record {
    pub fn new(value: ValueType, flags: u32) -> Record {
        let header = CacheMetaData::new(flags);
        Record { header, value }
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Result of set operation on cache
/// expires_at is the resolved expiration timestamp of the stored record
#[derive(Debug)]
pub struct SetStatus {
    pub expires_at: Option<u64>,
}

// An abstraction over a generic store key <=> value store
pub trait Cache {
    /// Returns a value associated with a key.
    /// Expired record is removed from the store and NotFound is returned.
    fn get(&self, key: &KeyType) -> Result<Record>;

    /// Sets value that will be associated with a key.
    /// Existing record is always replaced, both value and expiration.
    /// Expiration timestamp is resolved from ttl at the time of the call.
    fn set(&self, key: KeyType, record: Record, ttl: TimeToLive) -> SetStatus;

    /// Removes a value associated with a key and returns it to a caller
    ///
    /// - if key is not found or record expired NotFound is returned
    fn delete(&self, key: KeyType) -> Result<Record>;

    /// Removes all expired records, returns number of removed records
    fn remove_expired(&self) -> usize;

    /// Number of records physically held by a store,
    /// including expired ones which were not removed yet
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
