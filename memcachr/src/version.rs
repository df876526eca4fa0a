pub const MEMCACHR_VERSION: &str = env!("CARGO_PKG_VERSION");
