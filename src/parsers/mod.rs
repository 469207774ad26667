pub mod jacoco_html;

use quick_xml::events::BytesStart;

/// Read an attribute value by name, unescaped. Malformed attributes are skipped.
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
