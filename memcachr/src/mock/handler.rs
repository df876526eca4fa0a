use crate::memcache_server::handler::TextHandler;
use crate::mock::mock_server::{create_dash_map_server, create_moka_server, MockServer};
use crate::protocol::text::decoder::TextRequest;
use crate::protocol::text::encoder::TextResponse;
use crate::protocol::text::network;

use bytes::Bytes;
use std::sync::Arc;

use super::mock_server::MockSystemTimer;

pub struct TextHandlerWithTimer {
    pub handler: TextHandler,
    pub timer: Arc<MockSystemTimer>,
}

impl TextHandlerWithTimer {
    pub fn new(handler: TextHandler, timer: Arc<MockSystemTimer>) -> TextHandlerWithTimer {
        TextHandlerWithTimer { handler, timer }
    }

    pub fn handle_request(&self, req: TextRequest) -> Option<TextResponse> {
        self.handler.handle_request(req)
    }
}

impl From<MockServer> for TextHandlerWithTimer {
    fn from(server: MockServer) -> Self {
        TextHandlerWithTimer::new(TextHandler::new(server.storage), server.timer)
    }
}

pub fn create_dash_map_handler() -> TextHandlerWithTimer {
    create_dash_map_server().into()
}

pub fn create_moka_handler() -> TextHandlerWithTimer {
    create_moka_server().into()
}

pub fn create_get_request(keys: &[&str]) -> TextRequest {
    TextRequest::Get(network::GetRequest {
        keys: keys.iter().map(|key| Bytes::from(key.to_string())).collect(),
    })
}

pub fn create_set_request(key: &str, flags: u32, ttl: i64, value: &str) -> TextRequest {
    TextRequest::Set(network::SetRequest {
        key: Bytes::from(key.to_string()),
        flags,
        time_to_live: ttl,
        value: Bytes::from(value.to_string()),
        noreply: false,
    })
}

pub fn create_delete_request(key: &str, noreply: bool) -> TextRequest {
    TextRequest::Delete(network::DeleteRequest {
        key: Bytes::from(key.to_string()),
        noreply,
    })
}

pub fn get_value(handler: &TextHandlerWithTimer, key: &str) -> Option<network::ValueResponse> {
    match handler.handle_request(create_get_request(&[key])) {
        Some(TextResponse::Found(mut values)) => {
            assert_eq!(values.len(), 1);
            values.pop()
        }
        Some(TextResponse::NotFound) => None,
        _ => unreachable!(),
    }
}

pub fn insert_value_with_expire(handler: &TextHandlerWithTimer, key: &str, value: &str, ttl: i64) {
    let result = handler.handle_request(create_set_request(key, 0, ttl, value));
    assert_eq!(result, Some(TextResponse::Stored));
}

pub fn insert_value(handler: &TextHandlerWithTimer, key: &str, value: &str) {
    insert_value_with_expire(handler, key, value, 0)
}
