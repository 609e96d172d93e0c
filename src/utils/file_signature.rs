// 上传文档的内容签名校验，只覆盖招生文档允许的扩展名

const PDF: &[u8] = b"%PDF-";
// Office 97-2003 复合文档 (OLE2)
const OLE2: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
// OOXML 与 zip 共用本地文件头；空压缩包只有中央目录结尾
const ZIP_LOCAL: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const ZIP_EMPTY: &[u8] = &[0x50, 0x4B, 0x05, 0x06];
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

/// 文件内容是否与扩展名（含点号，如 ".docx"）相符。
///
/// 二进制格式比对文件头；`.txt`/`.csv` 要求合法 UTF-8 且不含 NUL。
/// 不认识的扩展名一律拒绝。
pub fn content_matches_extension(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_ascii_lowercase().as_str() {
        ".pdf" => data.starts_with(PDF),
        ".doc" | ".xls" | ".ppt" => data.starts_with(OLE2),
        ".docx" | ".xlsx" | ".pptx" => data.starts_with(ZIP_LOCAL),
        ".zip" => data.starts_with(ZIP_LOCAL) || data.starts_with(ZIP_EMPTY),
        ".png" => data.starts_with(PNG),
        ".jpg" | ".jpeg" => data.starts_with(JPEG),
        ".txt" | ".csv" => is_plain_text(data),
        _ => false,
    }
}

fn is_plain_text(data: &[u8]) -> bool {
    !data.contains(&0) && std::str::from_utf8(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_documents() {
        let ooxml = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00];
        assert!(content_matches_extension(&ooxml, ".docx"));
        assert!(content_matches_extension(&ooxml, ".XLSX"));
        assert!(content_matches_extension(&ooxml, ".pptx"));
        assert!(!content_matches_extension(&ooxml, ".doc"));

        let ole = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        assert!(content_matches_extension(&ole, ".doc"));
        assert!(content_matches_extension(&ole, ".xls"));
        assert!(content_matches_extension(&ole, ".ppt"));
        assert!(!content_matches_extension(&ole, ".docx"));
    }

    #[test]
    fn test_pdf_and_images() {
        assert!(content_matches_extension(b"%PDF-1.7\n", ".pdf"));
        assert!(!content_matches_extension(b"PDF-1.7", ".pdf"));
        assert!(content_matches_extension(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
        assert!(!content_matches_extension(&[0xFF, 0xD8, 0xFF, 0xE0], ".png"));
    }

    #[test]
    fn test_csv_and_txt_require_text() {
        let csv = "Họ tên,Ngành,Điểm\nNguyễn Văn A,CNTT,27.5\n".as_bytes();
        assert!(content_matches_extension(csv, ".csv"));
        assert!(content_matches_extension(csv, ".txt"));

        assert!(!content_matches_extension(&[0x4D, 0x5A, 0x90, 0x00], ".csv"));
        assert!(!content_matches_extension(&[0xC3, 0x28, 0x41], ".txt"));
        assert!(!content_matches_extension(b"a,b\0c", ".csv"));
    }

    #[test]
    fn test_zip_archives() {
        assert!(content_matches_extension(&[0x50, 0x4B, 0x03, 0x04], ".zip"));
        assert!(content_matches_extension(&[0x50, 0x4B, 0x05, 0x06], ".zip"));
        assert!(!content_matches_extension(&[0x50, 0x4B, 0x05, 0x06], ".docx"));
    }

    #[test]
    fn test_rejects_empty_and_unlisted() {
        assert!(!content_matches_extension(&[], ".pdf"));
        assert!(!content_matches_extension(&[], ".txt"));
        assert!(!content_matches_extension(b"GIF89a", ".gif"));
        assert!(!content_matches_extension(b"{}", ".json"));
        assert!(!content_matches_extension(&[0x4D, 0x5A], ".exe"));
    }
}
