//! Binary-archive-as-text strategy: the plain-JSON representation encoded
//! with MessagePack, base64-wrapped for safe transport inside a text file,
//! and framed by literal sentinel lines. The header is advisory text for
//! humans and consuming tools; nothing machine-checks it.

use super::structured;
use crate::context::PackContext;
use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

pub const SENTINEL_START: &str = "MSGPACK_BASE64_START";
pub const SENTINEL_END: &str = "MSGPACK_BASE64_END";

pub fn render(context: &PackContext) -> Result<String> {
    let document = structured::build_document(context);
    let packed = rmp_serde::to_vec_named(&document)?;
    let encoded = BASE64.encode(&packed);

    // Ratio against the pretty JSON rendering of the same payload, for the
    // advisory header only.
    let json_len = serde_json::to_string_pretty(&document)?.len().max(1);
    let ratio = (packed.len() as f64 / json_len as f64) * 100.0;

    let mut out = String::new();
    out.push_str("# CodePack MessagePack Archive\n");
    out.push_str(&format!(
        "# Payload: {} bytes MessagePack ({:.1}% of the equivalent pretty JSON)\n",
        packed.len(),
        ratio
    ));
    out.push_str("# Decode (Python):  import base64, msgpack; data = msgpack.unpackb(base64.b64decode(body), raw=False)\n");
    out.push_str("# Decode (Node.js): const { decode } = require('@msgpack/msgpack'); decode(Buffer.from(body, 'base64'))\n");
    out.push_str("# The body between the sentinels is a single base64 line.\n");
    out.push_str(SENTINEL_START);
    out.push('\n');
    out.push_str(&encoded);
    out.push('\n');
    out.push_str(SENTINEL_END);
    out.push('\n');
    out.push_str(&format!(
        "# Generated by codepack v{}\n",
        env!("CARGO_PKG_VERSION")
    ));
    Ok(out)
}
