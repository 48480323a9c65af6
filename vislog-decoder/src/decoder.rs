//! Main decoder API
//!
//! Entry point tying the pipeline together: block segmentation,
//! classification, then the kind-specific parser. Decoding is a pure
//! function of the upload text and is safe to run concurrently across
//! uploads.

use crate::blocks;
use crate::classify::{self, ArtifactKind};
use crate::types::{DecodedArtifact, ProtocolRecord, ReportRecord, Result};

/// Decode an uploaded artifact into its structured representation
///
/// # Errors
/// Only the classification-level hard error: an upload with no blocks at
/// all. Every other malformation degrades to zero-valued fields inside the
/// returned record.
///
/// # Example
/// ```
/// use vislog_decoder::{decode_artifact, DecodedArtifact};
///
/// let decoded = decode_artifact("{}\n\nlog\n\nmillis,power\n0,100\n").unwrap();
/// assert!(matches!(decoded, DecodedArtifact::Protocol(_)));
/// ```
pub fn decode_artifact(raw: &str) -> Result<DecodedArtifact> {
    let blocks = blocks::split_blocks(raw);
    let kind = classify::classify(&blocks)?;
    log::info!("classified upload as {kind:?} ({} blocks)", blocks.len());

    Ok(match kind {
        ArtifactKind::Protocol => DecodedArtifact::Protocol(ProtocolRecord::parse(&blocks)),
        ArtifactKind::Report => DecodedArtifact::Report(ReportRecord::parse(&blocks)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecodeError;

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(matches!(decode_artifact(""), Err(DecodeError::EmptyArtifact)));
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let raw = "{\"a\":1}\n\n2024-01-01 12:00:00,500\n\nmillis,power\n1000,0\n2000,50\n\n{}\n\ntail";
        let first = decode_artifact(raw).unwrap();
        let second = decode_artifact(raw).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
