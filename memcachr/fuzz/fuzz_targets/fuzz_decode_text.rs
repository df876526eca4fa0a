#![no_main]
use bytes::{BufMut, BytesMut};
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;
extern crate memcachr;

fuzz_target!(|data: &[u8]| {
    let mut decoder = memcachr::protocol::text::decoder::MemcacheTextDecoder::new(1024);
    let mut src = BytesMut::with_capacity(data.len());
    src.put(data);
    while let Ok(Some(_request)) = decoder.decode(&mut src) {}
});
