//! Wire codecs behind the claims representations
//!
//! Claims types call into these helpers from `marshal`/`unmarshal`; the parser
//! itself never touches a codec directly.

/// JSON (JWT) claims encoding via serde_json
pub mod json {
    use crate::error::{Error, Result};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use serde_json::{Map, Value};

    pub fn marshal<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(Error::Json)
    }

    /// Decode a JSON claims object
    ///
    /// Input that is not a JSON object is [`Error::Json`]. A field inside the
    /// object with the wrong shape is [`Error::InvalidType`].
    pub fn unmarshal<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        let object: Map<String, Value> = serde_json::from_slice(data).map_err(Error::Json)?;
        serde_json::from_value(Value::Object(object)).map_err(|e| Error::InvalidType(e.to_string()))
    }
}

/// Protobuf (PWT) claims encoding via prost
pub mod protobuf {
    use crate::error::Result;
    use prost::Message;

    pub fn marshal<M: Message>(message: &M) -> Result<Vec<u8>> {
        Ok(message.encode_to_vec())
    }

    /// Replace the contents of `message` with the decoded bytes
    pub fn unmarshal_into<M: Message>(message: &mut M, data: &[u8]) -> Result<()> {
        message.clear();
        message.merge(data)?;
        Ok(())
    }

    pub fn unmarshal<M: Message + Default>(data: &[u8]) -> Result<M> {
        Ok(M::decode(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    #[test]
    fn test_json_shape_mismatch_is_invalid_type() {
        let result = json::unmarshal::<HashMap<String, u32>>(br#"{"a":"x"}"#);
        assert!(matches!(result, Err(Error::InvalidType(_))));
    }

    #[test]
    fn test_json_syntax_error_is_json() {
        let result = json::unmarshal::<HashMap<String, u32>>(b"{");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_json_non_object_is_json() {
        for input in [&b"[1,2]"[..], b"\"hello\"", b"null", b"42"] {
            let result = json::unmarshal::<HashMap<String, u32>>(input);
            assert!(matches!(result, Err(Error::Json(_))));
        }
    }

    #[test]
    fn test_protobuf_garbage() {
        let result = protobuf::unmarshal::<crate::claims::PwtClaims>(&[0xff, 0xff, 0xff]);
        assert!(matches!(result, Err(Error::ProtobufDecode(_))));
    }
}
