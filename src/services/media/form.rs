//! multipart 表单读取
//!
//! 文本字段与文件字段分别收集；未选择文件时浏览器发送的空文件字段视为缺失。

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug)]
pub enum FormError {
    TooLarge(String),
    Malformed(String),
}

impl FormError {
    pub fn into_response(self) -> HttpResponse {
        match self {
            FormError::TooLarge(field) => HttpResponse::PayloadTooLarge().json(
                ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    format!("File '{field}' exceeds the size limit"),
                ),
            ),
            FormError::Malformed(msg) => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(ErrorCode::BadRequest, format!("Invalid form data: {msg}")),
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// 读取整个表单，单个字段超过 `max_size` 字节即中止
    pub async fn read(mut payload: Multipart, max_size: usize) -> Result<Self, FormError> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|e| FormError::Malformed(e.to_string()))?
        {
            let content_disposition = field.content_disposition();
            let name = content_disposition
                .and_then(|cd| cd.get_name())
                .unwrap_or_default()
                .to_string();
            let file_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string());

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| FormError::Malformed(e.to_string()))?;
                if data.len() + chunk.len() > max_size {
                    return Err(FormError::TooLarge(name));
                }
                data.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) => {
                    if !data.is_empty() {
                        form.files.insert(name, UploadedFile { file_name, data });
                    }
                }
                None => {
                    let value = String::from_utf8(data)
                        .map_err(|_| FormError::Malformed(format!("field '{name}' is not UTF-8")))?;
                    form.texts.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// 去除首尾空白后的非空文本字段
    pub fn text(&self, name: &str) -> Option<String> {
        self.texts
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        texts: Vec<(&str, &str)>,
        files: Vec<(&str, UploadedFile)>,
    ) -> Self {
        Self {
            texts: texts
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files.into_iter().map(|(k, f)| (k.to_string(), f)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed_and_blank_is_missing() {
        let form = MultipartForm::from_parts(vec![("title", "  Fractions "), ("text", "   ")], vec![]);
        assert_eq!(form.text("title").as_deref(), Some("Fractions"));
        assert_eq!(form.text("text"), None);
        assert_eq!(form.text("absent"), None);
    }

    #[test]
    fn test_take_file_once() {
        let mut form = MultipartForm::from_parts(
            vec![],
            vec![(
                "photo_statement",
                UploadedFile {
                    file_name: "p.png".to_string(),
                    data: vec![1, 2, 3],
                },
            )],
        );
        assert!(form.take_file("photo_statement").is_some());
        assert!(form.take_file("photo_statement").is_none());
    }
}
