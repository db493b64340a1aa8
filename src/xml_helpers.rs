//! Attribute lookups for the package readers.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesStart;

fn find_attr<'a>(
    e: &'a BytesStart<'_>,
    mut matches: impl FnMut(&Attribute<'_>) -> bool,
) -> Option<Attribute<'a>> {
    e.attributes().flatten().find(|attr| matches(attr))
}

fn utf8_value(attr: &Attribute<'_>) -> Option<String> {
    std::str::from_utf8(&attr.value).ok().map(str::to_owned)
}

/// Attribute value by exact (prefixed) name, e.g. `b"r"` or `b"t"`.
/// `None` when missing or not UTF-8.
pub(crate) fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    find_attr(e, |attr| attr.key.as_ref() == key).and_then(|attr| utf8_value(&attr))
}

/// Attribute value by local name, whatever its namespace prefix.
/// `<sheet r:id="rId3">` is looked up with `b"id"`.
pub(crate) fn attr_string_local(e: &BytesStart, local: &[u8]) -> Option<String> {
    find_attr(e, |attr| attr.key.local_name().as_ref() == local).and_then(|attr| utf8_value(&attr))
}

/// Row numbers and similar unsigned attributes.
pub(crate) fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key)?.trim().parse().ok()
}
