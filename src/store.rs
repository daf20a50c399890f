// 配置文档存储
//
// 唯一的磁盘文件持有者：原始文本读写、结构化加载与保存。
// 所有写入都经过临时文件 + rename，写入之间由同一把锁串行化。

use crate::config::{self, Config, ConfigResult};
use crate::error::{AppError, ConfigError};
use crate::metrics::METRICS;
use crate::r#const::{file_modes, write_mode_labels};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use tracing::debug;

/// 配置文档存储
pub struct ConfigStore {
    /// 配置文件路径
    path: PathBuf,
    /// 写入锁，覆盖 加载-修改-保存 的完整过程
    write_lock: Mutex<()>,
}

impl ConfigStore {
    /// 创建新的配置存储
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 配置文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 配置文件所在目录，相对路径的列表文件以此为基准
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// 获取写入锁
    ///
    /// 列表文件的写入也持有这把锁，避免与文档写入交错。
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 读取并解析配置
    pub fn load(&self) -> ConfigResult<Config> {
        let content = self.load_raw()?;
        config::decode(&content)
    }

    /// 读取原始配置文本
    pub fn load_raw(&self) -> ConfigResult<String> {
        debug!("Reading configuration file: {:?}", self.path);
        fs::read_to_string(&self.path).map_err(ConfigError::LoadError)
    }

    /// 序列化并整体覆盖配置文件
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        let guard = self.lock();
        self.save_locked(&guard, config)
    }

    /// 在已持有写入锁时保存配置
    pub fn save_locked(&self, _guard: &MutexGuard<'_, ()>, config: &Config) -> ConfigResult<()> {
        config.validate()?;
        let content = config::encode(config)?;
        write_atomic(&self.path, &content)?;
        METRICS
            .config_writes_total()
            .with_label_values(&[write_mode_labels::STRUCTURED])
            .inc();
        debug!("Configuration written ({} bytes)", content.len());
        Ok(())
    }

    /// 校验后写入原始配置文本
    ///
    /// 文本无法解析为合法配置时不写入任何内容，原文件保持不变。
    /// 成功时返回解析后的配置。
    pub fn save_raw(&self, content: &str) -> ConfigResult<Config> {
        let config = config::decode(content)?;
        let _guard = self.lock();
        write_atomic(&self.path, content)?;
        METRICS
            .config_writes_total()
            .with_label_values(&[write_mode_labels::RAW])
            .inc();
        debug!("Raw configuration written ({} bytes)", content.len());
        Ok(config)
    }

    /// 在写入锁内执行 加载-修改-保存
    ///
    /// `mutate` 返回错误时不写入；成功时恰好写入一次。
    pub fn update<T, F>(&self, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Config) -> Result<T, AppError>,
    {
        let guard = self.lock();
        let mut config = self.load()?;
        let result = mutate(&mut config)?;
        self.save_locked(&guard, &config)?;
        Ok(result)
    }
}

/// 原子写入文件：同目录临时文件、落盘、rename
///
/// 任一步失败时临时文件随 `NamedTempFile` 一起删除，目标文件保持原样。
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(file_modes::DOCUMENT_MODE))?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
