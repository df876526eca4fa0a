use crate::cache::cache::TimeToLive;
use crate::memcache::store;
use crate::protocol::text::decoder::TextRequest;
use crate::protocol::text::encoder::TextResponse;
use crate::protocol::text::network::{
    DeleteRequest, GetRequest, ProtocolError, SetRequest, ValueResponse,
};
use crate::version::MEMCACHR_VERSION;
use std::sync::Arc;

fn into_noreply(response: TextResponse, noreply: bool) -> Option<TextResponse> {
    if noreply {
        return None;
    }
    Some(response)
}

fn malformed_to_response(error: ProtocolError) -> TextResponse {
    match error {
        ProtocolError::UnknownCommand => TextResponse::Error,
        ProtocolError::ValueTooLarge => TextResponse::ServerError(error.reason()),
        _ => TextResponse::ClientError(error.reason()),
    }
}

pub struct TextHandler {
    storage: Arc<store::MemcStore>,
}

impl TextHandler {
    pub fn new(store: Arc<store::MemcStore>) -> TextHandler {
        TextHandler { storage: store }
    }

    /// Executes a single request against the store.
    /// Returns None when a client does not expect a reply.
    pub fn handle_request(&self, req: TextRequest) -> Option<TextResponse> {
        match req {
            TextRequest::Get(get_request) => Some(self.get(get_request)),
            TextRequest::Set(set_request) => {
                let noreply = set_request.noreply;
                into_noreply(self.set(set_request), noreply)
            }
            TextRequest::Delete(delete_request) => {
                let noreply = delete_request.noreply;
                into_noreply(self.delete(delete_request), noreply)
            }
            TextRequest::Version => Some(TextResponse::Version(String::from(MEMCACHR_VERSION))),
            TextRequest::Quit => None,
            TextRequest::Malformed(error) => Some(malformed_to_response(error)),
        }
    }

    fn get(&self, get_request: GetRequest) -> TextResponse {
        let values: Vec<ValueResponse> = self
            .storage
            .get_many(&get_request.keys)
            .into_iter()
            .map(|(key, record)| ValueResponse {
                key,
                flags: record.header.get_flags(),
                value: record.value,
            })
            .collect();
        if values.is_empty() {
            return TextResponse::NotFound;
        }
        TextResponse::Found(values)
    }

    fn set(&self, set_request: SetRequest) -> TextResponse {
        let record = store::Record::new(set_request.value, set_request.flags);
        let ttl = TimeToLive::from_seconds(set_request.time_to_live);
        self.storage.set(set_request.key, record, ttl);
        TextResponse::Stored
    }

    fn delete(&self, delete_request: DeleteRequest) -> TextResponse {
        match self.storage.delete(delete_request.key) {
            Ok(_record) => TextResponse::Deleted,
            Err(_err) => TextResponse::DeleteNotFound,
        }
    }
}
