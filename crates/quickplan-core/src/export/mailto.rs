//! `mailto:` draft of a plan.

use std::process::{Command, Stdio};

use tracing::info;

use crate::plan::{StrategicPlan, to_plain_text};

use super::ExportError;

/// Subject line of the email draft.
pub const EMAIL_SUBJECT: &str = "Your AI-Generated Quick Strategic Plan";

/// Percent-encode `input` with `encodeURIComponent` rules: ASCII
/// alphanumerics and `-_.!~*'()` pass through, every other UTF-8 byte is
/// encoded as `%XX`.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// Build a `mailto:` URI with no recipient, the fixed subject and the
/// plain-text rendering as body.
pub fn mailto_uri(plan: &StrategicPlan) -> String {
    format!(
        "mailto:?subject={}&body={}",
        encode_uri_component(EMAIL_SUBJECT),
        encode_uri_component(&to_plain_text(plan))
    )
}

fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Hand a `mailto:` URI to the platform's default handler.
pub fn open_in_mail_client(uri: &str) -> Result<(), ExportError> {
    let (program, args) = opener();
    Command::new(program)
        .args(args)
        .arg(uri)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ExportError::Open {
            target: "mail client".to_owned(),
            message: format!("{program}: {e}"),
        })?;
    info!(uri_len = uri.len(), "mail draft handed to {program}");
    Ok(())
}
