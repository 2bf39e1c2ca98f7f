//! Length-prefixed framing over a byte stream.
//!
//! Wire format:
//! ```text
//! [payload_len:4][payload:N]
//! ```
//! The length prefix is an unsigned 32-bit big-endian integer counting the
//! exact number of payload bytes that follow.  Both sides of the connection
//! must agree on this header; it is the interoperability contract a server
//! implementation has to match.
//!
//! The framing layer knows nothing about payload semantics — it moves opaque
//! byte blobs.  One frame carries exactly one encoded envelope (or, for the
//! server greeting, raw UTF-8 text).

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single frame's payload, to bound allocation when the
/// length prefix is garbage (e.g. the peer is not speaking this protocol).
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Errors that can occur while reading or writing frames.
#[derive(Debug, Error)]
pub enum FramingError {
    /// The peer closed the connection in the middle of a frame.
    ///
    /// A close *between* frames is graceful and reported as `Ok(None)` by
    /// [`read_frame`]; a close mid-frame is a protocol violation.
    #[error("connection closed mid-frame: expected {expected} payload bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    /// The length prefix declares a payload larger than [`MAX_FRAME_LEN`].
    #[error("frame of {declared} bytes exceeds the {MAX_FRAME_LEN} byte limit")]
    FrameTooLarge { declared: usize },

    /// An I/O error occurred on the underlying stream.
    #[error("I/O error on stream: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes one frame: the 4-byte big-endian length prefix followed by `payload`.
///
/// # Errors
///
/// Returns [`FramingError::FrameTooLarge`] if the payload exceeds
/// [`MAX_FRAME_LEN`], or [`FramingError::Io`] if the underlying write fails
/// (including a closed connection).
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), FramingError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(FramingError::FrameTooLarge {
            declared: payload.len(),
        });
    }

    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one complete frame and returns its payload.
///
/// Returns `Ok(None)` if the peer closed the connection *before* sending any
/// byte of the next frame — the graceful end-of-stream the caller should
/// treat as a connection loss, not a protocol error.
///
/// # Errors
///
/// Returns [`FramingError::Truncated`] if the connection closes after the
/// frame has begun, [`FramingError::FrameTooLarge`] for an absurd length
/// prefix, or [`FramingError::Io`] for any other read failure.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, FramingError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];

    // The first header byte decides graceful close vs truncation: EOF here
    // means the peer hung up cleanly between frames.
    let mut filled = 0;
    while filled < len_buf.len() {
        let n = reader.read(&mut len_buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(FramingError::Truncated {
                expected: len_buf.len(),
                got: filled,
            });
        }
        filled += n;
    }

    let payload_len = u32::from_be_bytes(len_buf) as usize;
    if payload_len > MAX_FRAME_LEN {
        return Err(FramingError::FrameTooLarge {
            declared: payload_len,
        });
    }

    let mut payload = vec![0u8; payload_len];
    let mut read = 0;
    while read < payload_len {
        let n = reader.read(&mut payload[read..]).await?;
        if n == 0 {
            return Err(FramingError::Truncated {
                expected: payload_len,
                got: read,
            });
        }
        read += n;
    }

    Ok(Some(payload))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_frame_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        write_frame(&mut client, b"hello").await.unwrap();

        let payload = read_frame(&mut server).await.unwrap();
        assert_eq!(payload.as_deref(), Some(b"hello".as_slice()));
    }

    #[tokio::test]
    async fn test_empty_payload_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(64);

        write_frame(&mut client, b"").await.unwrap();

        let payload = read_frame(&mut server).await.unwrap();
        assert_eq!(payload.as_deref(), Some(b"".as_slice()));
    }

    #[tokio::test]
    async fn test_n_frames_read_back_in_order() {
        let (mut client, mut server) = tokio::io::duplex(4096);
        let payloads: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; i as usize + 1]).collect();

        for p in &payloads {
            write_frame(&mut client, p).await.unwrap();
        }

        for expected in &payloads {
            let got = read_frame(&mut server).await.unwrap().unwrap();
            assert_eq!(&got, expected, "frames must come back byte-for-byte in order");
        }
    }

    #[tokio::test]
    async fn test_clean_close_between_frames_returns_none() {
        let (mut client, mut server) = tokio::io::duplex(64);

        write_frame(&mut client, b"last").await.unwrap();
        drop(client);

        assert!(read_frame(&mut server).await.unwrap().is_some());
        assert!(read_frame(&mut server).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_mid_header_is_truncated() {
        let (mut client, mut server) = tokio::io::duplex(64);

        // Two of the four header bytes, then hang up.
        tokio::io::AsyncWriteExt::write_all(&mut client, &[0x00, 0x00])
            .await
            .unwrap();
        drop(client);

        let err = read_frame(&mut server).await.unwrap_err();
        assert!(matches!(err, FramingError::Truncated { expected: 4, got: 2 }));
    }

    #[tokio::test]
    async fn test_close_mid_payload_is_truncated() {
        let (mut client, mut server) = tokio::io::duplex(64);

        // Header declares 10 bytes but only 3 arrive.
        tokio::io::AsyncWriteExt::write_all(&mut client, &10u32.to_be_bytes())
            .await
            .unwrap();
        tokio::io::AsyncWriteExt::write_all(&mut client, b"abc")
            .await
            .unwrap();
        drop(client);

        let err = read_frame(&mut server).await.unwrap_err();
        assert!(matches!(err, FramingError::Truncated { expected: 10, got: 3 }));
    }

    #[tokio::test]
    async fn test_oversized_length_prefix_is_rejected() {
        let (mut client, mut server) = tokio::io::duplex(64);

        let declared = (MAX_FRAME_LEN as u32) + 1;
        tokio::io::AsyncWriteExt::write_all(&mut client, &declared.to_be_bytes())
            .await
            .unwrap();

        let err = read_frame(&mut server).await.unwrap_err();
        assert!(matches!(err, FramingError::FrameTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_oversized_payload_is_rejected_on_write() {
        let (mut client, _server) = tokio::io::duplex(64);

        let huge = vec![0u8; MAX_FRAME_LEN + 1];
        let err = write_frame(&mut client, &huge).await.unwrap_err();
        assert!(matches!(err, FramingError::FrameTooLarge { .. }));
    }

    #[test]
    fn test_length_prefix_is_big_endian_u32() {
        // Bit-exact check of the header a counterpart server must parse.
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let (mut client, mut server) = tokio::io::duplex(64);
            write_frame(&mut client, b"abcd").await.unwrap();

            let mut raw = [0u8; 8];
            tokio::io::AsyncReadExt::read_exact(&mut server, &mut raw)
                .await
                .unwrap();
            assert_eq!(&raw[..4], &[0x00, 0x00, 0x00, 0x04]);
            assert_eq!(&raw[4..], b"abcd");
        });
    }
}
