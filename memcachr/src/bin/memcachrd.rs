use std::env;

extern crate memcachr;

fn main() {
    let args: Vec<String> = env::args().collect();
    memcachr::server::main::run(args);
}
