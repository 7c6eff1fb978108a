//! Word (`.docx`) document sink
//!
//! Writes a minimal WordprocessingML package: `word/document.xml`, a style
//! sheet with the built-in `Title` and `Heading1`..`Heading9` styles, and one
//! `word/media/` entry per picture. Headings follow the traversal depth
//! (depth 0 uses `Title`), pictures are scaled to the configured width
//! keeping their aspect ratio.

use crate::document::DocumentSink;
use crate::html::{escape, mime_type};
use pr_core::Result;
use std::fmt::Write as _;
use std::io::{self, Cursor, Write as _};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// English Metric Units per pixel at 96 dpi
const EMU_PER_PX: u64 = 9525;

/// Usable page width (8.5in letter minus 1in margins), in twentieths of a point
const TEXT_WIDTH_TWIPS: usize = 9360;

/// Deepest built-in heading style
const MAX_HEADING: usize = 9;

const NS: &str = "xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\" \
xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\"";

const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

struct Media {
    name: String,
    bytes: Vec<u8>,
}

pub struct DocxDocument {
    body: String,
    media: Vec<Media>,
    title: Option<String>,
}

impl DocxDocument {
    pub fn new(title: Option<&str>) -> Self {
        let mut doc = Self {
            body: String::new(),
            media: Vec::new(),
            title: title.map(str::to_string),
        };
        if let Some(title) = title {
            doc.styled_paragraph("Title", title);
        }
        doc
    }

    /// Package the document and return the `.docx` bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut entries = vec![
            ("[Content_Types].xml".to_string(), self.content_types().into_bytes()),
            ("_rels/.rels".to_string(), package_rels().into_bytes()),
            ("docProps/core.xml".to_string(), self.core_properties().into_bytes()),
            ("word/_rels/document.xml.rels".to_string(), self.document_rels().into_bytes()),
            ("word/styles.xml".to_string(), styles().into_bytes()),
            ("word/document.xml".to_string(), self.document_xml().into_bytes()),
        ];
        for media in self.media {
            entries.push((format!("word/media/{}", media.name), media.bytes));
        }

        for (name, bytes) in entries {
            zip.start_file(name, options).map_err(io::Error::from)?;
            zip.write_all(&bytes)?;
        }
        let cursor = zip.finish().map_err(io::Error::from)?;
        Ok(cursor.into_inner())
    }

    fn styled_paragraph(&mut self, style: &str, text: &str) {
        let _ = write!(
            self.body,
            "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>{}</w:p>",
            style,
            run(text, false)
        );
    }

    fn document_xml(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <w:document {NS}><w:body>{}<w:sectPr>\
             <w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
             <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
             w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>\
             </w:sectPr></w:body></w:document>",
            self.body
        )
    }

    fn content_types(&self) -> String {
        let mut types = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        );
        let mut seen: Vec<&str> = Vec::new();
        for media in &self.media {
            let ext = extension(&media.name);
            if !seen.contains(&ext) {
                seen.push(ext);
                let _ = write!(
                    types,
                    "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                    ext,
                    mime_type(&media.name)
                );
            }
        }
        types.push_str(
            "<Override PartName=\"/word/document.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
             <Override PartName=\"/word/styles.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
             <Override PartName=\"/docProps/core.xml\" \
             ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
             </Types>",
        );
        types
    }

    fn core_properties(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <cp:coreProperties \
             xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
             <dc:title>{}</dc:title><dc:creator>prettyresults</dc:creator>\
             </cp:coreProperties>",
            escape(self.title.as_deref().unwrap_or("Results"))
        )
    }

    fn document_rels(&self) -> String {
        let mut rels = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"{REL_TYPE}/styles\" Target=\"styles.xml\"/>"
        );
        for (index, media) in self.media.iter().enumerate() {
            let _ = write!(
                rels,
                "<Relationship Id=\"{}\" Type=\"{REL_TYPE}/image\" Target=\"media/{}\"/>",
                image_rel_id(index),
                media.name
            );
        }
        rels.push_str("</Relationships>");
        rels
    }
}

impl DocumentSink for DocxDocument {
    fn heading(&mut self, text: &str, level: usize) {
        let style = match level.min(MAX_HEADING) {
            0 => "Title".to_string(),
            n => format!("Heading{}", n),
        };
        self.styled_paragraph(&style, text);
    }

    fn paragraph(&mut self, text: &str) {
        let _ = write!(self.body, "<w:p>{}</w:p>", run(text, false));
    }

    fn picture(&mut self, image: &[u8], filename: &str, width_px: u32) {
        let index = self.media.len();
        let id = index + 1;
        let cx = u64::from(width_px) * EMU_PER_PX;
        let cy = match imagesize::blob_size(image) {
            Ok(size) if size.width > 0 => cx * size.height as u64 / size.width as u64,
            _ => cx,
        };

        let _ = write!(
            self.body,
            "<w:p><w:r><w:drawing>\
             <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
             <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
             <wp:docPr id=\"{id}\" name=\"Picture {id}\" descr=\"{name}\"/>\
             <wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>\
             <a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
             <pic:pic><pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>\
             <pic:blipFill><a:blip r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
             <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
             <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>\
             </a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>",
            name = escape(filename),
            rel = image_rel_id(index),
        );

        self.media.push(Media {
            name: format!("image{}.{}", id, extension(filename)),
            bytes: image.to_vec(),
        });
    }

    fn table(&mut self, headings: &[String], rows: &[Vec<String>]) {
        if headings.is_empty() {
            return;
        }
        let col_width = TEXT_WIDTH_TWIPS / headings.len();
        self.body.push_str(
            "<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/>\
             <w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr><w:tblGrid>",
        );
        for _ in headings {
            let _ = write!(self.body, "<w:gridCol w:w=\"{}\"/>", col_width);
        }
        self.body.push_str("</w:tblGrid>");
        table_row(&mut self.body, headings, true);
        for row in rows {
            table_row(&mut self.body, row, false);
        }
        // Keeps consecutive tables from merging
        self.body.push_str("</w:tbl><w:p/>");
    }
}

fn table_row(body: &mut String, cells: &[String], bold: bool) {
    body.push_str("<w:tr>");
    for cell in cells {
        let _ = write!(body, "<w:tc><w:p>{}</w:p></w:tc>", run(cell, bold));
    }
    body.push_str("</w:tr>");
}

fn run(text: &str, bold: bool) -> String {
    let props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!("<w:r>{}<w:t xml:space=\"preserve\">{}</w:t></w:r>", props, escape(text))
}

fn image_rel_id(index: usize) -> String {
    format!("rId{}", index + 2)
}

fn extension(filename: &str) -> &str {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg")
}

fn package_rels() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_TYPE}/officeDocument\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" \
         Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" \
         Target=\"docProps/core.xml\"/>\
         </Relationships>"
    )
}

fn styles() -> String {
    let mut styles = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/>\
         <w:pPr><w:spacing w:after=\"160\"/></w:pPr><w:rPr><w:sz w:val=\"22\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/>\
         <w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/>\
         <w:rPr><w:sz w:val=\"56\"/></w:rPr></w:style>",
    );
    for level in 1..=MAX_HEADING {
        // 16pt down to 11pt
        let size = 32usize.saturating_sub((level - 1) * 2).max(22);
        let _ = write!(
            styles,
            "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\">\
             <w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/>\
             <w:next w:val=\"Normal\"/><w:qFormat/>\
             <w:pPr><w:keepNext/><w:spacing w:before=\"240\"/><w:outlineLvl w:val=\"{}\"/></w:pPr>\
             <w:rPr><w:b/><w:sz w:val=\"{size}\"/></w:rPr></w:style>",
            level - 1
        );
    }
    styles.push_str(
        "<w:style w:type=\"table\" w:styleId=\"TableGrid\"><w:name w:val=\"Table Grid\"/>\
         <w:tblPr><w:tblBorders>\
         <w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         </w:tblBorders></w:tblPr></w:style></w:styles>",
    );
    styles
}
