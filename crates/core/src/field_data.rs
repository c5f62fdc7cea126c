//! Hex escaping for label field data.
//!
//! Every field the generator writes is opened with `^FH\`, which tells the
//! printer that `\XX` inside the following `^FD` data is a hex byte. Text
//! that contains the escape indicator itself, or the ZPL command prefixes
//! `^` and `~`, is rewritten into that hex form so it prints literally
//! instead of ending the field or starting a command.

/// Escape indicator declared by `^FH\`.
pub const FIELD_HEX_INDICATOR: u8 = b'\\';

/// Bytes that must never appear raw inside field data.
const RESERVED: [u8; 2] = [b'^', b'~'];

/// Escape `text` for a field opened with `^FH` using `indicator`.
///
/// Assumes printable ASCII input (the output of
/// [`sanitize`](crate::sanitize::sanitize)); other bytes pass through.
pub fn escape_field_data(text: &str, indicator: u8) -> String {
    let mut out = String::with_capacity(text.len());
    for b in text.bytes() {
        if b == indicator || RESERVED.contains(&b) {
            out.push(indicator as char);
            out.push_str(&format!("{b:02X}"));
        } else {
            out.push(b as char);
        }
    }
    out
}
