//! 文档服务 - 业务能力层
//!
//! HTML → PDF，以及把图片追加为 PDF 的新页面

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::error::{AppError, AppResult, DocumentError};

/// 追加的图片页宽度（A4 宽，单位 pt）
const IMAGE_PAGE_WIDTH: f32 = 595.0;

/// 文档服务
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// 把一段 HTML 渲染成 PDF 文件
    async fn html_to_pdf(&self, html: &str, output: &Path) -> AppResult<()>;

    /// 把图片依次追加到已有 PDF 的末尾，每张图片一页
    async fn append_images(&self, pdf: &Path, images: &[PathBuf]) -> AppResult<()>;
}

/// 基于浏览器打印功能的文档服务
///
/// 使用一个独立页面渲染，不会影响下单页面的状态
pub struct ChromeDocumentService {
    page: Page,
}

impl ChromeDocumentService {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

/// 把回执片段包装成完整的 HTML 文档
fn wrap_receipt_html(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  body {{ font-family: sans-serif; margin: 40px; }}
  .badge {{ font-weight: bold; }}
</style>
</head>
<body>
{}
</body>
</html>"#,
        fragment
    )
}

#[async_trait]
impl DocumentService for ChromeDocumentService {
    async fn html_to_pdf(&self, html: &str, output: &Path) -> AppResult<()> {
        let render_failed = |source| DocumentError::RenderFailed {
            path: output.display().to_string(),
            source,
        };

        self.page
            .set_content(wrap_receipt_html(html))
            .await
            .map_err(render_failed)?;
        self.page
            .save_pdf(PrintToPdfParams::default(), output)
            .await
            .map_err(render_failed)?;

        debug!("PDF 已生成: {}", output.display());
        Ok(())
    }

    async fn append_images(&self, pdf: &Path, images: &[PathBuf]) -> AppResult<()> {
        append_image_pages(pdf, images)
    }
}

/// 读取图片并转成 JPEG 编码的图片对象
///
/// 截图可能带透明通道，统一转成 RGB 后以 DCTDecode 嵌入
fn load_image_xobject(image_path: &Path) -> AppResult<(Stream, u32, u32)> {
    let image_failed = |source| DocumentError::ImageFailed {
        path: image_path.display().to_string(),
        source,
    };

    let bytes = std::fs::read(image_path).map_err(|e| AppError::file(image_path, e))?;
    let rgb = image::load_from_memory(&bytes).map_err(image_failed)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DocumentError::InvalidImage(image_path.display().to_string()).into());
    }

    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .map_err(image_failed)?;

    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(width)),
            "Height" => Object::Integer(i64::from(height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "DCTDecode",
        },
        jpeg,
    );
    Ok((stream, width, height))
}

/// 用 lopdf 把图片追加为新页面，原文件被覆盖
pub fn append_image_pages(pdf_path: &Path, images: &[PathBuf]) -> AppResult<()> {
    let pdf_failed = |source| DocumentError::PdfFailed {
        path: pdf_path.display().to_string(),
        source,
    };

    let mut doc = Document::load(pdf_path).map_err(pdf_failed)?;

    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(pdf_failed)?;
    let pages_id = doc
        .get_dictionary(root_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(pdf_failed)?;

    for image_path in images {
        let (image, width, height) = load_image_xobject(image_path)?;

        let page_width = IMAGE_PAGE_WIDTH;
        let page_height = height as f32 * IMAGE_PAGE_WIDTH / width as f32;

        let image_id = doc.add_object(image);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page_width.into(),
                        Object::Integer(0),
                        Object::Integer(0),
                        page_height.into(),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(pdf_failed)?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                page_width.into(),
                page_height.into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });

        let pages = doc
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(pdf_failed)?;
        pages
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(pdf_failed)?
            .push(page_id.into());
        let count = pages
            .get(b"Count")
            .and_then(Object::as_i64)
            .map_err(pdf_failed)?;
        pages.set("Count", count + 1);

        debug!("已追加图片页: {}", image_path.display());
    }

    doc.save(pdf_path).map_err(|e| AppError::file(pdf_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_single_page_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_append_image_adds_one_page_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("receipt.pdf");
        let png = dir.path().join("robot.png");
        write_single_page_pdf(&pdf);
        write_png(&png, 40, 20);

        append_image_pages(&pdf, &[png]).unwrap();

        let doc = Document::load(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_append_to_missing_pdf_fails() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("robot.png");
        write_png(&png, 4, 4);

        let err = append_image_pages(&dir.path().join("missing.pdf"), &[png]).unwrap_err();
        assert!(matches!(err, AppError::Document(DocumentError::PdfFailed { .. })));
    }

    #[test]
    fn test_missing_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("receipt.pdf");
        write_single_page_pdf(&pdf);

        let err = append_image_pages(&pdf, &[dir.path().join("missing.png")]).unwrap_err();
        assert!(matches!(err, AppError::File { .. }));
    }

    #[test]
    fn test_wrap_receipt_html() {
        let html = wrap_receipt_html("<h3>Receipt</h3>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h3>Receipt</h3>"));
    }
}
