use memcachr::{memcache::cli::parser::RuntimeType, memory_store::StoreEngine};

pub struct MemcachrdServerParamsBuilder {
    engine: StoreEngine,
    runtime: RuntimeType,
    port: u16,
    max_item_size: Option<String>,
    reaper_interval_ms: Option<u64>,
    threads: usize,
    connection_limit: Option<u32>,
    idle_timeout: Option<u32>,
}

#[allow(dead_code)]
impl MemcachrdServerParamsBuilder {
    pub fn new() -> MemcachrdServerParamsBuilder {
        MemcachrdServerParamsBuilder {
            engine: StoreEngine::DashMap,
            runtime: RuntimeType::CurrentThread,
            port: 11212,
            max_item_size: None,
            reaper_interval_ms: None,
            threads: 2,
            connection_limit: None,
            idle_timeout: None,
        }
    }

    pub fn with_engine(&mut self, engine: StoreEngine) -> &mut Self {
        self.engine = engine;
        self
    }

    pub fn with_runtime(&mut self, runtime: RuntimeType) -> &mut Self {
        self.runtime = runtime;
        self
    }

    pub fn with_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn with_max_item_size(&mut self, max_item_size: &str) -> &mut Self {
        self.max_item_size = Some(String::from(max_item_size));
        self
    }

    pub fn with_reaper_interval_ms(&mut self, interval: u64) -> &mut Self {
        self.reaper_interval_ms = Some(interval);
        self
    }

    pub fn with_threads(&mut self, threads: usize) -> &mut Self {
        self.threads = threads;
        self
    }

    pub fn with_connection_limit(&mut self, connection_limit: u32) -> &mut Self {
        self.connection_limit = Some(connection_limit);
        self
    }

    pub fn with_idle_timeout(&mut self, idle_timeout: u32) -> &mut Self {
        self.idle_timeout = Some(idle_timeout);
        self
    }

    pub fn build(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        result.push(String::from("./target/debug/memcachrd"));
        match self.engine {
            StoreEngine::DashMap => {
                result.push(String::from("--store-engine"));
                result.push(String::from("dash-map"));
            }
            StoreEngine::Moka => {
                result.push(String::from("--store-engine"));
                result.push(String::from("moka"));
            }
        }

        match self.runtime {
            RuntimeType::CurrentThread => {
                result.push(String::from("--runtime-type"));
                result.push(String::from("current-thread"));
            }
            RuntimeType::MultiThread => {
                result.push(String::from("--runtime-type"));
                result.push(String::from("multi-thread"));
            }
        }

        if let Some(max_item_size) = &self.max_item_size {
            result.push(String::from("--max-item-size"));
            result.push(max_item_size.clone());
        }

        if let Some(interval) = self.reaper_interval_ms {
            result.push(String::from("--reaper-interval-ms"));
            result.push(interval.to_string());
        }

        if let Some(connection_limit) = self.connection_limit {
            result.push(String::from("--connection-limit"));
            result.push(connection_limit.to_string());
        }

        if let Some(idle_timeout) = self.idle_timeout {
            result.push(String::from("--idle-timeout"));
            result.push(idle_timeout.to_string());
        }

        result.push(String::from("--threads"));
        result.push(self.threads.to_string());

        result.push(String::from("--port"));
        result.push(self.port.to_string());
        result
    }
}
