//! Binary message codec.
//!
//! Messages crossing the compile worker boundary are `bincode`-encoded and
//! carried as standard base64 text.

use crate::error::{CoreError, CoreResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn bincode_config() -> bincode::config::Configuration {
    bincode::config::standard()
}

/// Encode a message to bytes
pub fn encode<T: Serialize>(message: &T, message_type: &'static str) -> CoreResult<Vec<u8>> {
    bincode::serde::encode_to_vec(message, bincode_config()).map_err(|e| CoreError::Encode {
        message_type,
        details: e.to_string(),
    })
}

/// Decode a message from bytes, rejecting trailing data
pub fn decode<T: DeserializeOwned>(bytes: &[u8], message_type: &'static str) -> CoreResult<T> {
    let (message, read) =
        bincode::serde::decode_from_slice(bytes, bincode_config()).map_err(|e| {
            CoreError::Decode {
                message_type,
                details: e.to_string(),
            }
        })?;
    if read != bytes.len() {
        return Err(CoreError::Decode {
            message_type,
            details: format!("{} trailing bytes", bytes.len() - read),
        });
    }
    Ok(message)
}

/// Encode a message as base64 text
pub fn encode_base64<T: Serialize>(message: &T, message_type: &'static str) -> CoreResult<String> {
    Ok(STANDARD.encode(encode(message, message_type)?))
}

/// Decode a message from base64 text. Surrounding whitespace is ignored.
pub fn decode_base64<T: DeserializeOwned>(
    encoded: &str,
    message_type: &'static str,
) -> CoreResult<T> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CoreError::Decode {
            message_type,
            details: format!("invalid base64: {}", e),
        })?;
    decode(&bytes, message_type)
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
