use crate::error::{Error, Result};
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;
use uuid::Uuid;

/// Extracts plain text from uploaded documents. PDF goes through
/// `pdftotext`; office formats are converted with headless LibreOffice;
/// plain text is decoded directly.
#[derive(Clone, Default)]
pub struct ExtractService;

impl ExtractService {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract(&self, filename: &str, content: &[u8]) -> Result<String> {
        let extension = filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let text = match extension.as_str() {
            "txt" => decode_text(content),
            "pdf" => self.pdf_to_text(content).await?,
            "docx" | "doc" | "odt" | "rtf" => self.office_to_text(filename, content).await?,
            _ => {
                return Err(Error::BadRequest(
                    "Unsupported file type. Please upload PDF, DOCX, or TXT".to_string(),
                ))
            }
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::Extraction(
                "No text could be extracted from the file".to_string(),
            ));
        }
        Ok(text)
    }

    async fn pdf_to_text(&self, content: &[u8]) -> Result<String> {
        let temp_dir = PathBuf::from(format!("/tmp/doc_extract_{}", Uuid::new_v4()));
        fs::create_dir_all(&temp_dir).await?;

        let pdf_path = temp_dir.join("input.pdf");
        let txt_path = temp_dir.join("output.txt");
        fs::write(&pdf_path, content).await?;

        let output = Command::new("pdftotext")
            .arg(&pdf_path)
            .arg(&txt_path)
            .output()
            .await;

        let result = match output {
            Ok(out) if out.status.success() => fs::read_to_string(&txt_path)
                .await
                .map_err(Error::Io),
            Ok(out) => {
                tracing::error!(
                    "pdftotext failed: {}",
                    String::from_utf8_lossy(&out.stderr)
                );
                Err(Error::Extraction("PDF text extraction failed".to_string()))
            }
            Err(e) => {
                tracing::error!("Failed to run pdftotext: {}", e);
                Err(Error::Extraction("pdftotext not available".to_string()))
            }
        };

        let _ = fs::remove_dir_all(&temp_dir).await;
        result
    }

    async fn office_to_text(&self, filename: &str, content: &[u8]) -> Result<String> {
        let temp_dir = PathBuf::from(format!("/tmp/doc_convert_{}", Uuid::new_v4()));
        fs::create_dir_all(&temp_dir).await?;

        // LibreOffice names its output after the input file, so keep the
        // original name inside the scratch dir.
        let safe_name = filename.rsplit('/').next().unwrap_or("document");
        let input_path = temp_dir.join(safe_name);
        fs::write(&input_path, content).await?;

        let output = Command::new("libreoffice")
            .arg("--headless")
            .arg("--norestore")
            .arg("--convert-to")
            .arg("txt:Text")
            .arg("--outdir")
            .arg(&temp_dir)
            .arg(&input_path)
            .output()
            .await;

        let result = match output {
            Ok(out) if out.status.success() => {
                let mut converted = None;
                let mut entries = fs::read_dir(&temp_dir).await?;
                while let Some(entry) = entries.next_entry().await? {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("txt") {
                        converted = Some(path);
                        break;
                    }
                }
                match converted {
                    Some(path) => fs::read_to_string(&path).await.map_err(Error::Io),
                    None => Err(Error::Extraction(
                        "LibreOffice produced no text output".to_string(),
                    )),
                }
            }
            Ok(out) => {
                tracing::error!(
                    "LibreOffice conversion failed: {}",
                    String::from_utf8_lossy(&out.stderr)
                );
                Err(Error::Extraction(
                    "Document text extraction failed".to_string(),
                ))
            }
            Err(e) => {
                tracing::error!("Failed to run libreoffice: {}", e);
                Err(Error::Extraction("libreoffice not available".to_string()))
            }
        };

        let _ = fs::remove_dir_all(&temp_dir).await;
        result
    }
}

/// UTF-8 with a Latin-1 fallback, so legacy exports still yield text.
fn decode_text(content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(s) => s.to_string(),
        Err(_) => content.iter().map(|&b| b as char).collect(),
    }
}
