use crate::cache::expiration_reaper::ExpirationReaper;
use crate::memory_store::StoreEngine;
use byte_unit::{Byte, Unit};
use clap::{Parser, ValueEnum};
use std::{
    fmt::Debug,
    net::{IpAddr, Ipv4Addr},
    ops::RangeInclusive,
};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum RuntimeType {
    /// every thread has its own single threaded runtime
    CurrentThread,
    /// work stealing threadpool runtime
    MultiThread,
}

impl RuntimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeType::CurrentThread => "Work handled withing current thread runtime",
            RuntimeType::MultiThread => "Work stealing threadpool runtime",
        }
    }
}

const DEFAULT_PORT: u16 = 11212;
const CONNECTION_LIMIT: u32 = 1024;
const LISTEN_BACKLOG: u32 = 1024;
const MAX_ITEM_SIZE: &str = "1m";
const IDLE_TIMEOUT_SECS: u32 = 60;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
/// memcached text protocol compatible cache server
pub struct MemcachrdConfig {
    #[arg(short, long, value_name = "PORT", value_parser = port_in_range, default_value_t = DEFAULT_PORT)]
    /// TCP port to listen on
    pub port: u16,

    #[arg(short, long, value_name = "CONNECTION-LIMIT", default_value_t = CONNECTION_LIMIT)]
    /// max simultaneous connections
    pub connection_limit: u32,

    #[arg(short = 'b', long, value_name = "LISTEN-BACKLOG", default_value_t = LISTEN_BACKLOG)]
    /// set the backlog queue limit
    pub listen_backlog: u32,

    #[arg(short, long, action = clap::ArgAction::Count)]
    /// sets the level of verbosity
    pub verbose: u8,

    #[arg(short = 'I', long, value_name = "MAX-ITEM-SIZE", value_parser = parse_item_size, default_value = MAX_ITEM_SIZE)]
    /// adjusts max item size (min: 1k, max: 1000m)
    pub max_item_size: u64,

    #[arg(short, long, value_name = "THREADS", default_value_t = num_cpus::get_physical())]
    /// number of threads to use
    pub threads: usize,

    #[arg(short, long, value_name = "LISTEN", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    /// interface to listen on
    pub listen: IpAddr,

    #[arg(short, long, value_name = "RUNTIME-TYPE", default_value_t = RuntimeType::CurrentThread, value_enum)]
    /// runtime type to use
    pub runtime_type: RuntimeType,

    #[arg(short, long, value_name = "STORE-ENGINE", default_value_t = StoreEngine::DashMap, value_enum)]
    /// store engine to be used
    pub store_engine: StoreEngine,

    #[arg(long, value_name = "MILLISECONDS", value_parser = clap::value_parser!(u64).range(1..), default_value_t = ExpirationReaper::DEFAULT_INTERVAL_IN_MILIS)]
    /// how often expired items are removed in background
    pub reaper_interval_ms: u64,

    #[arg(long, value_name = "SECONDS", default_value_t = IDLE_TIMEOUT_SECS)]
    /// idle client connection is closed after this many seconds
    pub idle_timeout: u32,
}

const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` isn't a port number"))?;
    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

fn parse_item_size(s: &str) -> Result<u64, String> {
    let min_item_size = Byte::from_u64_with_unit(1, Unit::KB).map_or(1000, |byte| byte.as_u64());
    let max_item_size =
        Byte::from_u64_with_unit(1000, Unit::MiB).map_or(u64::MAX, |byte| byte.as_u64());
    let item_size = match Byte::parse_str(s, true) {
        Ok(bytes) => bytes.as_u64(),
        Err(byte_error) => return Err(format!("{}", byte_error)),
    };
    if item_size < min_item_size || item_size > max_item_size {
        return Err(format!(
            "max item size has to be between {} and {} bytes",
            min_item_size, max_item_size
        ));
    }
    Ok(item_size)
}

impl MemcachrdConfig {
    fn from_args(args: Vec<String>) -> Result<MemcachrdConfig, String> {
        MemcachrdConfig::try_parse_from(args.iter()).map_err(|err| err.to_string())
    }
}

pub fn parse(args: Vec<String>) -> Result<MemcachrdConfig, String> {
    MemcachrdConfig::from_args(args)
}
