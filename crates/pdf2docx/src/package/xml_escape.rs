//! XML escaping for character data and attribute values.
//!
//! Order matters: `&` must be escaped first, otherwise the entities
//! introduced by the other replacements would themselves be escaped.
//! Producing unescaped special characters is the dominant cause of a
//! downstream consumer rejecting the package, so every text value and
//! relationship target that ends up in character data or an attribute goes
//! through this function.

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
