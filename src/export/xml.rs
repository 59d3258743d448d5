//! Structured XML export.

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ConvertError, Result};
use crate::export::format_timestamp;
use crate::strip::strip;

/// `<document>` with the title, the stripped content as CDATA, and a
/// timestamp under `<metadata>`.
pub fn render(markdown: &str, title: &str, at: DateTime<Utc>) -> Result<String> {
    let content = strip(markdown);
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new("\n")))
        .map_err(xml_error)?;

    start(&mut writer, "document")?;
    text_element(&mut writer, "title", title)?;

    start(&mut writer, "content")?;
    for section in cdata_sections(&content) {
        writer
            .write_event(Event::CData(BytesCData::new(section)))
            .map_err(xml_error)?;
    }
    end(&mut writer, "content")?;

    start(&mut writer, "metadata")?;
    text_element(&mut writer, "timestamp", &format_timestamp(at))?;
    end(&mut writer, "metadata")?;
    end(&mut writer, "document")?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
    xml.push('\n');
    Ok(xml)
}

/// CDATA cannot contain `]]>`, so each occurrence is split across two
/// sections: `]]` ends one and `>` starts the next.
fn cdata_sections(content: &str) -> Vec<String> {
    let parts: Vec<&str> = content.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut section = String::new();
            if i > 0 {
                section.push('>');
            }
            section.push_str(part);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    end(writer, name)
}

fn xml_error(e: impl std::fmt::Display) -> ConvertError {
    ConvertError::Render {
        format: "xml",
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn full_document() {
        assert_eq!(
            render("# Hi\n\n*there*", "A & B", at()).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <document><title>A &amp; B</title>\
             <content><![CDATA[Hi\n\nthere]]></content>\
             <metadata><timestamp>2024-01-02T03:04:05Z</timestamp></metadata>\
             </document>\n"
        );
    }

    #[test]
    fn cdata_terminator_is_split() {
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("plain"), vec!["plain"]);

        let xml = render("x ]]> y", "T", at()).unwrap();
        assert!(xml.contains("<![CDATA[x ]]]]><![CDATA[> y]]>"));
    }
}
