//! EMOTUNE 설정 파일 저장소.
//!
//! 시작 시 `config.json`을 읽어 [`AppConfig`]를 만들고, 제어 API가 재확인 트리거를
//! 바꾸면 같은 파일에 다시 기록한다. 기록은 임시 파일에 쓴 뒤 교체하므로
//! 중간에 중단돼도 이전 설정 파일이 남는다. 검증에 실패한 설정은 메모리에도
//! 파일에도 반영되지 않는다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.json";
const STAGING_SUFFIX: &str = "tmp";

/// 설정 파일과 메모리 사본을 함께 관리
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<AppConfig>>,
    path: PathBuf,
}

impl ConfigManager {
    /// 사용자 설정 디렉토리의 `config.json` 사용
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정 경로 사용. 파일이 없으면 기본 설정으로 새로 만든다.
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent(&path)?;

        let config = if path.exists() {
            read_config(&path)?
        } else {
            let defaults = AppConfig::default_config();
            write_config(&path, &defaults)?;
            info!("기본 EMOTUNE 설정 작성: {}", path.display());
            defaults
        };
        config.validate()?;

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            path,
        })
    }

    /// 현재 설정 사본
    pub fn get(&self) -> AppConfig {
        self.current.read().clone()
    }

    /// 사본을 고쳐 검증 후 저장. 실패하면 아무것도 바뀌지 않는다.
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = self.get();
        edit(&mut next);
        next.validate()?;

        write_config(&self.path, &next)?;
        *self.current.write() = next.clone();
        debug!(
            threshold = next.recheck.consumption_threshold,
            interval_secs = next.recheck.recheck_interval_secs,
            "설정 파일 갱신: {}",
            self.path.display()
        );
        Ok(next)
    }

    /// 설정 파일 경로
    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// 파일을 다시 읽어 메모리 사본 교체. 외부에서 파일을 고친 경우용.
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = read_config(&self.path)?;
        config.validate()?;
        *self.current.write() = config;
        info!("설정 파일 다시 읽음: {}", self.path.display());
        Ok(())
    }

    /// 사용자 설정 디렉토리 (`directories` 규칙, 예: Linux `~/.config/emotune/`)
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("com", "emotune", "emotune")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("사용자 설정 디렉토리를 결정할 수 없음".to_string()))
    }
}

fn ensure_parent(path: &Path) -> Result<(), CoreError> {
    let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir)
        .map_err(|e| CoreError::Config(format!("{} 생성 불가: {e}", dir.display())))?;
    info!("설정 디렉토리 생성: {}", dir.display());
    Ok(())
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("{} 읽기 불가: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CoreError::Config(format!("{} JSON 오류: {e}", path.display())))
}

/// 임시 파일에 쓴 뒤 교체
fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(config)?;
    let staging = path.with_extension(STAGING_SUFFIX);

    fs::write(&staging, json)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|e| CoreError::Config(format!("{} 기록 불가: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());

        let config = manager.get();
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.recheck.consumption_threshold, 3);
    }

    #[test]
    fn update_and_persist_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        manager
            .update_with(|c| {
                c.recheck.consumption_threshold = 5;
                c.recheck.recheck_interval_secs = 120;
            })
            .unwrap();

        let manager2 = ConfigManager::with_path(config_path).unwrap();
        let config = manager2.get();
        assert_eq!(config.recheck.consumption_threshold, 5);
        assert_eq!(config.recheck.recheck_interval_secs, 120);
    }

    #[test]
    fn invalid_update_is_rejected_and_not_applied() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json")).unwrap();

        let result = manager.update_with(|c| c.recheck.poll_interval_secs = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().recheck.poll_interval_secs, 10);
    }

    #[test]
    fn reload_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::with_path(config_path.clone()).unwrap();

        let mut config = manager.get();
        config.web.port = 7777;
        fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        manager.reload().unwrap();
        assert_eq!(manager.get().web.port, 7777);
    }

    #[test]
    fn save_leaves_no_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::with_path(config_path.clone()).unwrap();

        manager
            .update_with(|c| c.recheck.consumption_threshold = 4)
            .unwrap();

        assert!(config_path.exists());
        assert!(!config_path.with_extension("tmp").exists());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = ConfigManager::with_path(config_path).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
