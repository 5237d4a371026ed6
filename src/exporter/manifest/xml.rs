//! Streaming XML rewrite helpers.
//!
//! Documents are copied event by event so untouched markup (comments,
//! whitespace, attribute order, namespace prefixes) survives an edit. Every
//! rewritten document starts with the standard UTF-8 declaration.

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Namespace URI of `android:` attributes.
pub(crate) const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Copies `xml`, passing each event and its element depth (root = 0) to `edit`,
/// which writes whatever should replace it.
///
/// Any declaration in the source is replaced by `<?xml version="1.0" encoding="utf-8"?>`.
pub(crate) fn rewrite<F>(xml: &str, mut edit: F) -> quick_xml::Result<String>
where
    F: FnMut(&mut Writer<Vec<u8>>, Event<'_>, usize) -> quick_xml::Result<()>,
{
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 64));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    if !xml.trim_start().starts_with("<?xml") {
        writer.get_mut().push(b'\n');
    }

    let mut depth = 0usize;
    loop {
        let event = reader.read_event()?;
        let (event_depth, next_depth) = match &event {
            Event::Eof => break,
            Event::Decl(_) => continue,
            Event::Start(_) => (depth, depth + 1),
            Event::End(_) => (depth.saturating_sub(1), depth.saturating_sub(1)),
            _ => (depth, depth),
        };
        edit(&mut writer, event, event_depth)?;
        depth = next_depth;
    }

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Raw value of attribute `key` (qualified name as written).
pub(crate) fn attribute(start: &BytesStart<'_>, key: &str) -> quick_xml::Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

/// Copy of `start` with `key` set to `value`, keeping the attribute's position
/// when it already exists and appending it otherwise. Returns the previous raw value.
pub(crate) fn with_attribute(
    start: &BytesStart<'_>,
    key: &str,
    value: &str,
) -> quick_xml::Result<(BytesStart<'static>, Option<String>)> {
    let mut updated = start.clone().into_owned();
    updated.clear_attributes();

    let mut previous = None;
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key.as_bytes() {
            if previous.is_none() {
                previous = Some(String::from_utf8_lossy(&attr.value).into_owned());
                updated.push_attribute((key, value));
            }
            continue;
        }
        updated.push_attribute(attr);
    }

    if previous.is_none() {
        updated.push_attribute((key, value));
    }

    Ok((updated, previous))
}

/// Prefix bound to [`ANDROID_NS`] on `root`, if any.
pub(crate) fn android_prefix(root: &BytesStart<'_>) -> quick_xml::Result<Option<String>> {
    for attr in root.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            if attr.value.as_ref() == ANDROID_NS.as_bytes() {
                return Ok(Some(String::from_utf8_lossy(prefix).into_owned()));
            }
        }
    }
    Ok(None)
}

/// Root element prepared for `android:` attributes: returns the root (with
/// `xmlns:android` added when no prefix is bound) and the prefix to use.
pub(crate) fn bind_android_namespace(
    root: &BytesStart<'_>,
) -> quick_xml::Result<(BytesStart<'static>, String)> {
    match android_prefix(root)? {
        Some(prefix) => Ok((root.clone().into_owned(), prefix)),
        None => {
            let mut root = root.clone().into_owned();
            root.push_attribute(("xmlns:android", ANDROID_NS));
            Ok((root, "android".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_replaces_declaration_and_keeps_body() {
        let src = "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n<a x=\"1\"><!-- c --><b/></a>\n";
        let out = rewrite(src, |w, e, _| w.write_event(e).map_err(Into::into)).unwrap();

        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<a x=\"1\"><!-- c --><b/></a>\n"
        );
    }

    #[test]
    fn rewrite_adds_declaration_when_missing() {
        let out = rewrite("<a/>", |w, e, _| w.write_event(e).map_err(Into::into)).unwrap();
        assert_eq!(out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<a/>");
    }

    #[test]
    fn with_attribute_keeps_position() {
        let start = BytesStart::from_content("a one=\"1\" two=\"2\" three=\"3\"", 1);
        let (updated, previous) = with_attribute(&start, "two", "22").unwrap();

        assert_eq!(previous.as_deref(), Some("2"));
        let keys: Vec<_> = updated
            .attributes()
            .map(|a| String::from_utf8(a.unwrap().key.as_ref().to_vec()).unwrap())
            .collect();
        assert_eq!(keys, ["one", "two", "three"]);
        assert_eq!(attribute(&updated, "two").unwrap().as_deref(), Some("22"));
    }

    #[test]
    fn finds_custom_android_prefix() {
        let start = BytesStart::from_content(
            "manifest xmlns:a=\"http://schemas.android.com/apk/res/android\"",
            8,
        );
        assert_eq!(android_prefix(&start).unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn binds_android_namespace_when_absent() {
        let start = BytesStart::new("manifest");
        let (root, prefix) = bind_android_namespace(&start).unwrap();

        assert_eq!(prefix, "android");
        assert_eq!(
            attribute(&root, "xmlns:android").unwrap().as_deref(),
            Some(ANDROID_NS)
        );
    }
}
