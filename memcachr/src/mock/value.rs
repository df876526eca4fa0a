use crate::cache::cache::ValueType;

pub fn from_string(val: &str) -> ValueType {
    from_slice(val.as_bytes())
}

pub fn from_slice(val: &[u8]) -> ValueType {
    ValueType::copy_from_slice(val)
}
