// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::utils::errors::StagingError;

/// 上传暂存区
///
/// 每个请求的图片以 `<uuid>.<ext>` 写入同一目录，目录只在启动时创建一次
#[derive(Debug, Clone)]
pub struct StagingArea {
    base_path: PathBuf,
}

impl StagingArea {
    /// 创建暂存目录（已存在时不报错）
    pub async fn init(base_path: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        debug!(path = %base_path.display(), "Staging directory ready");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 将上传内容写入暂存文件
    ///
    /// # 返回值
    /// * `Ok(StagedFile)` - 暂存文件句柄，调用方负责释放
    pub async fn stage(
        &self,
        data: &[u8],
        file_name: Option<&str>,
    ) -> Result<StagedFile, StagingError> {
        let path = self.base_path.join(Self::staged_name(file_name));

        let mut file = fs::File::create(&path).await?;
        // Hand the path to the guard before writing so a failed write is still cleaned up.
        let staged = StagedFile::new(path);
        file.write_all(data).await?;
        file.flush().await?;

        debug!(path = %staged.path().display(), size = data.len(), "Upload staged");
        Ok(staged)
    }

    fn staged_name(file_name: Option<&str>) -> String {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase());

        match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }
}

/// 暂存文件句柄
///
/// `release` 删除文件且只执行一次；未释放就被丢弃时（panic 或请求被取消）
/// 由 `Drop` 同步删除
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    released: bool,
}

impl StagedFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取暂存文件内容
    pub async fn read(&self) -> Result<Vec<u8>, StagingError> {
        Ok(fs::read(&self.path).await?)
    }

    /// 删除暂存文件
    ///
    /// 文件已不存在时视为成功；其他 I/O 错误返回给调用方记录，不影响主响应
    pub async fn release(mut self) -> Result<(), StagingError> {
        self.released = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StagingError::Io(e)),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Staged file removed on drop"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove staged file"),
        }
    }
}
