//! Fixtures shared by the integration tests.

#![allow(dead_code)]

/// Assembles a PDF from object bodies numbered 1..=n, with object 1 as the
/// catalog. Builds body then xref with correct byte offsets so pdf-extract
/// can parse it.
pub fn pdf_from_objects(objects: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj {} endobj\n", i + 1, body).as_bytes());
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}

fn text_stream(phrase: &str) -> String {
    let stream = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", phrase);
    format!("<< /Length {} >> stream\n{}\nendstream", stream.len(), stream)
}

fn page(contents_ref: u32, font_ref: u32) -> String {
    format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 {} 0 R >> >> >>",
        contents_ref, font_ref
    )
}

const HELVETICA: &str = "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>";

/// Minimal valid PDF whose single page reads `phrase`.
pub fn minimal_pdf_with_text(phrase: &str) -> Vec<u8> {
    pdf_from_objects(&[
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        page(4, 5),
        text_stream(phrase),
        HELVETICA.to_string(),
    ])
}

/// Two-page PDF: page 1 reads `phrase`, page 2 points its content stream at
/// object 9, which does not exist.
pub fn pdf_with_unreadable_second_page(phrase: &str) -> Vec<u8> {
    pdf_from_objects(&[
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>".to_string(),
        page(5, 6),
        page(9, 6),
        text_stream(phrase),
        HELVETICA.to_string(),
    ])
}

/// Picks a port nothing is listening on.
pub fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
