//! # Kitchen Wire Protocol
//!
//! Every message in either direction is one frame:
//!
//! ```text
//! +----------------------+---------------------------------+
//! | 10 ASCII digits      | UTF-8 JSON payload              |
//! | zero-padded length   | exactly `length` bytes          |
//! +----------------------+---------------------------------+
//! ```
//!
//! The client sends one frame holding the [`Order`](crate::model::Order), the kitchen answers
//! with one frame holding a [`KitchenReply`], and the connection is closed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Width of the decimal length header.
pub const HEADER_LEN: usize = 10;

/// Largest payload a 10-digit header can describe.
pub const MAX_PAYLOAD_LEN: u64 = 9_999_999_999;

/// The `status` value that marks an accepted order.
pub const STATUS_SUCCESS: &str = "success";

/// Errors raised while encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("payload of {0} bytes does not fit a 10-digit header")]
    TooLarge(u64),

    #[error("malformed length header {0:?}")]
    BadHeader(String),

    #[error("payload truncated: expected {expected} bytes, received {received}")]
    Truncated { expected: u64, received: u64 },

    #[error("frame I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The kitchen's answer to one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl KitchenReply {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
        }
    }

    pub fn rejected(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Renders `len` as the zero-padded decimal header.
pub fn encode_header(len: u64) -> Result<[u8; HEADER_LEN], FrameError> {
    if len > MAX_PAYLOAD_LEN {
        return Err(FrameError::TooLarge(len));
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(format!("{len:010}").as_bytes());
    Ok(header)
}

/// Parses a header made of exactly ten ASCII digits.
pub fn parse_header(header: &[u8; HEADER_LEN]) -> Result<u64, FrameError> {
    if !header.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::BadHeader(
            String::from_utf8_lossy(header).into_owned(),
        ));
    }
    // Ten ASCII digits always parse into a u64.
    std::str::from_utf8(header)
        .ok()
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| FrameError::BadHeader(String::from_utf8_lossy(header).into_owned()))
}

/// Serializes `value` and writes it as one frame. Returns the payload length.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<u64, FrameError>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec_pretty(value)?;
    let len = payload.len() as u64;
    let header = encode_header(len)?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(&payload);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(len)
}

/// Reads one frame and decodes its JSON payload.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<T, FrameError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let expected = parse_header(&header)?;

    let mut payload = Vec::new();
    reader.take(expected).read_to_end(&mut payload).await?;
    let received = payload.len() as u64;
    if received != expected {
        return Err(FrameError::Truncated { expected, received });
    }

    Ok(serde_json::from_slice(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_zero_padded() {
        assert_eq!(&encode_header(812).unwrap(), b"0000000812");
        assert_eq!(&encode_header(0).unwrap(), b"0000000000");
        assert_eq!(&encode_header(MAX_PAYLOAD_LEN).unwrap(), b"9999999999");
    }

    #[test]
    fn test_header_rejects_oversized_payload() {
        assert!(matches!(
            encode_header(MAX_PAYLOAD_LEN + 1),
            Err(FrameError::TooLarge(_))
        ));
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header(b"0000000812").unwrap(), 812);
        assert!(matches!(
            parse_header(b"00000008a2"),
            Err(FrameError::BadHeader(_))
        ));
        assert!(matches!(
            parse_header(b"       812"),
            Err(FrameError::BadHeader(_))
        ));
        assert!(matches!(
            parse_header(b"-000000812"),
            Err(FrameError::BadHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_header_counts_utf8_bytes() {
        let reply = KitchenReply::success("주문이 접수되었습니다");
        let mut buf = Vec::new();
        let len = write_frame(&mut buf, &reply).await.unwrap();

        let header = std::str::from_utf8(&buf[..HEADER_LEN]).unwrap();
        assert_eq!(header.parse::<u64>().unwrap(), len);
        assert_eq!(buf.len() as u64, HEADER_LEN as u64 + len);
    }

    #[tokio::test]
    async fn test_read_frame_parses_reply() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &KitchenReply::rejected("error", "out of steak"))
            .await
            .unwrap();

        let reply: KitchenReply = read_frame(&mut buf.as_slice()).await.unwrap();
        assert_eq!(reply.status, "error");
        assert_eq!(reply.message, "out of steak");
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn test_read_frame_reports_short_payload() {
        let mut input: &[u8] = b"0000000050{\"status\":\"success\"}";
        let err = read_frame::<_, KitchenReply>(&mut input).await.unwrap_err();

        assert!(matches!(
            err,
            FrameError::Truncated {
                expected: 50,
                received: 20
            }
        ));
    }

    #[tokio::test]
    async fn test_reply_without_message_defaults_to_empty() {
        let mut input: &[u8] = b"0000000020{\"status\":\"success\"}";
        let reply: KitchenReply = read_frame(&mut input).await.unwrap();

        assert!(reply.is_success());
        assert!(reply.message.is_empty());
    }
}
