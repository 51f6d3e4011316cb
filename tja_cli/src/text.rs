use std::{fs, path::Path};

use anyhow::Context;
use log::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes chart bytes: UTF-8 (BOM stripped) when valid, Shift_JIS otherwise.
pub fn decode_chart(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
            if had_errors {
                warn!("input is neither UTF-8 nor clean Shift_JIS; undecodable bytes replaced");
            } else {
                debug!("decoded input as Shift_JIS");
            }
            text.into_owned()
        }
    }
}

pub fn read_chart(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read: {}", path.display()))?;
    Ok(decode_chart(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_with_bom() {
        assert_eq!(decode_chart(b"\xEF\xBB\xBFTITLE:a"), "TITLE:a");
    }

    #[test]
    fn shift_jis_fallback() {
        // "鬼" in Shift_JIS.
        let bytes = [b'T', b':', 0x8B, 0x53];
        assert_eq!(decode_chart(&bytes), "T:鬼");
    }
}
