//! 정적 콘텐츠 카탈로그.
//!
//! `ContentCatalog` 포트 구현. 설정의 레이블 → URI 목록에서 무작위 1개를 고른다.

use emotune_core::config::CatalogConfig;
use emotune_core::error::CoreError;
use emotune_core::models::content::ContentRef;
use emotune_core::ports::catalog::ContentCatalog;
use emotune_core::random::RandomSource;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 설정 기반 카탈로그
pub struct StaticCatalog {
    entries: BTreeMap<String, Vec<String>>,
    default_label: String,
    rng: Arc<dyn RandomSource>,
}

impl StaticCatalog {
    /// 새 카탈로그 생성. 기본 레이블에 항목이 없으면 에러.
    pub fn new(config: &CatalogConfig, rng: Arc<dyn RandomSource>) -> Result<Self, CoreError> {
        config.validate()?;

        // 빈 목록은 미등록과 동일하게 취급
        let entries = config
            .entries
            .iter()
            .filter(|(_, uris)| !uris.is_empty())
            .map(|(label, uris)| (label.to_lowercase(), uris.clone()))
            .collect();

        Ok(Self {
            entries,
            default_label: config.default_label.to_lowercase(),
            rng,
        })
    }

    /// 조회에 실제로 사용할 레이블
    fn resolve<'a>(&'a self, label: &str) -> (&'a str, &'a [String]) {
        let key = label.trim().to_lowercase();
        if let Some((found, uris)) = self.entries.get_key_value(&key) {
            return (found.as_str(), uris.as_slice());
        }

        debug!("{}", CoreError::CatalogMiss(key));
        let uris = self
            .entries
            .get(&self.default_label)
            .map(Vec::as_slice)
            .unwrap_or_default();
        (self.default_label.as_str(), uris)
    }
}

impl ContentCatalog for StaticCatalog {
    fn select_for(&self, label: &str) -> ContentRef {
        let (resolved, uris) = self.resolve(label);
        match uris.get(self.rng.pick_index(uris.len())) {
            Some(uri) => ContentRef::new(resolved, uri.clone()),
            None => {
                warn!("카탈로그가 비어 있음: {resolved}");
                ContentRef::new(resolved, String::new())
            }
        }
    }

    fn labels(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
