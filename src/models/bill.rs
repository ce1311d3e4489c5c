use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// An uploaded bill, held entirely as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillAsset {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(alias = "data")]
    pub data_uri: String,
}

impl BillAsset {
    pub fn new(id: i64, name: String, mime: &str, bytes: &[u8]) -> Self {
        Self {
            id,
            name,
            data_uri: encode_data_uri(mime, bytes),
        }
    }

    /// Mime type between `data:` and the first `;` or `,`.
    pub fn mime_type(&self) -> &str {
        let rest = self.data_uri.strip_prefix("data:").unwrap_or("");
        let end = rest.find([';', ',']).unwrap_or(rest.len());
        &rest[..end]
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type() == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.mime_type().starts_with("image/")
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let (header, payload) = self
            .data_uri
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("'{}' is not a data URI", self.name))?;
        if !header.ends_with(";base64") {
            anyhow::bail!("'{}' is not base64 encoded", self.name);
        }
        STANDARD
            .decode(payload)
            .with_context(|| format!("Failed to decode '{}'", self.name))
    }

    /// Size of the decoded content, computed from the payload length.
    pub fn byte_len(&self) -> usize {
        let payload = self
            .data_uri
            .split_once(',')
            .map(|(_, p)| p)
            .unwrap_or("");
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        (payload.len() / 4 * 3).saturating_sub(padding)
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
