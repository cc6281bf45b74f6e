//! Minimal query-string decoding for the registry's HTTP surface
//!
//! Covers exactly the behavior the handlers need: splitting on `&`/`=`,
//! percent-decoding, and `+`-for-space. Invalid escape sequences keep
//! their literal bytes rather than failing the whole request, matching
//! what permissive web stacks do with station-generated URLs.

/// Parse a raw query string into decoded key/value pairs.
///
/// Empty segments are skipped; a segment without `=` becomes a key with an
/// empty value.
pub fn parse_pairs(query: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for segment in query.split('&') {
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
        pairs.push((decode(key), decode(value)));
    }
    pairs
}

/// Find the first decoded value for `key`
pub fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Percent-decode one component, treating `+` as space
fn decode(component: &str) -> String {
    let bytes = component.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).unwrap_or_else(|_| component.to_string())
}

fn hex_val(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
