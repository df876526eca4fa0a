#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CacheError {
    /// key is absent or its record expired
    NotFound,
}

pub type Result<T> = std::result::Result<T, CacheError>;
