pub mod multi_thread_server;
pub mod params_builder;
pub mod random_port;
pub mod raw_client;

#[allow(unused_imports)]
pub use multi_thread_server::{spawn_server, MemcachrdMultiThreadTestServer};
pub use params_builder::MemcachrdServerParamsBuilder;
#[allow(unused_imports)]
pub use raw_client::RawClient;
