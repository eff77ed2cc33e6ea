//! Minimal PDF writer: one full-page JPEG per page.

use std::io::Write;
use zenslide_core::Result;

/// A captured page image.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// JPEG bytes, embedded as-is with `/DCTDecode`.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Serializes objects while tracking their byte offsets for the xref table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Result<Self> {
        let mut writer = Self {
            buf: Vec::new(),
            offsets: Vec::new(),
        };
        writer.buf.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        Ok(writer)
    }

    /// Start object `id`. Objects must be written in id order.
    fn begin(&mut self, id: usize) -> Result<()> {
        debug_assert_eq!(self.offsets.len() + 1, id);
        self.offsets.push(self.buf.len());
        writeln!(self.buf, "{} 0 obj", id)?;
        Ok(())
    }

    fn object(&mut self, id: usize, body: &str) -> Result<()> {
        self.begin(id)?;
        writeln!(self.buf, "{}\nendobj", body)?;
        Ok(())
    }

    fn stream(&mut self, id: usize, dict: &str, data: &[u8]) -> Result<()> {
        self.begin(id)?;
        write!(self.buf, "<< {} /Length {} >>\nstream\n", dict, data.len())?;
        self.buf.write_all(data)?;
        self.buf.write_all(b"\nendstream\nendobj\n")?;
        Ok(())
    }

    fn finish(mut self, root: usize) -> Result<Vec<u8>> {
        let xref = self.buf.len();
        let size = self.offsets.len() + 1;
        write!(self.buf, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for offset in &self.offsets {
            writeln!(self.buf, "{:010} 00000 n ", offset)?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, root, xref
        )?;
        Ok(self.buf)
    }
}

const CATALOG: usize = 1;
const PAGES: usize = 2;

/// Object ids of page `index`: (page, content, image).
fn page_ids(index: usize) -> (usize, usize, usize) {
    let base = 3 + index * 3;
    (base, base + 1, base + 2)
}

/// Write a document with one `page_size` page per image, in order.
pub fn write_document(pages: &[PageImage], page_size: (u32, u32)) -> Result<Vec<u8>> {
    let (width, height) = page_size;
    let mut pdf = PdfWriter::new()?;

    pdf.object(CATALOG, &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES))?;

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", page_ids(i).0))
        .collect();
    pdf.object(
        PAGES,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    )?;

    for (i, page) in pages.iter().enumerate() {
        let (page_id, content_id, image_id) = page_ids(i);
        pdf.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /XObject << /Im0 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES, width, height, image_id, content_id
            ),
        )?;

        let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ\n", width, height);
        pdf.stream(content_id, "", content.as_bytes())?;

        pdf.stream(
            image_id,
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode",
                page.width, page.height
            ),
            &page.jpeg,
        )?;
    }

    log::debug!("Wrote PDF with {} pages", pages.len());
    pdf.finish(CATALOG)
}

/// Number of page objects in a document written by [`write_document`].
pub fn count_pages(pdf: &[u8]) -> usize {
    const NEEDLE: &[u8] = b"/Type /Page ";
    pdf.windows(NEEDLE.len()).filter(|w| *w == NEEDLE).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_page(marker: &str) -> PageImage {
        PageImage {
            jpeg: marker.as_bytes().to_vec(),
            width: 2560,
            height: 1440,
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_one_page_per_image() {
        let pages = vec![fake_page("AAA"), fake_page("BBB"), fake_page("CCC")];
        let pdf = write_document(&pages, (1280, 720)).unwrap();

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert_eq!(count_pages(&pdf), 3);
        assert!(find(&pdf, b"/Count 3").is_some());
        assert!(find(&pdf, b"/MediaBox [0 0 1280 720]").is_some());
        assert!(find(&pdf, b"1280 0 0 720 0 0 cm").is_some());
    }

    #[test]
    fn test_pages_keep_order() {
        let pages = vec![fake_page("FIRST"), fake_page("SECOND"), fake_page("THIRD")];
        let pdf = write_document(&pages, (1280, 720)).unwrap();

        let a = find(&pdf, b"FIRST").unwrap();
        let b = find(&pdf, b"SECOND").unwrap();
        let c = find(&pdf, b"THIRD").unwrap();
        assert!(a < b && b < c);
        assert!(find(&pdf, b"/Kids [3 0 R 6 0 R 9 0 R]").is_some());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = write_document(&[fake_page("X")], (1280, 720)).unwrap();
        let xref = find(&pdf, b"xref\n").unwrap();
        let table = std::str::from_utf8(&pdf[xref..]).unwrap();
        let entries: Vec<usize> = table
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 5);
        for (i, offset) in entries.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }
}
