//! 교체 가능한 난수 전략.
//!
//! 카탈로그 선택, 휴리스틱 분류, 최후 수단 레이블 선택이 모두 이 trait을 거친다.
//! 테스트에서는 [`SequenceRandom`]으로 결과를 고정한다.

use parking_lot::Mutex;

/// 난수 소스
pub trait RandomSource: Send + Sync {
    /// `[0, 1)` 구간 균등 난수
    fn next_f64(&self) -> f64;

    /// `[0, len)` 구간 인덱스. `len == 0`이면 0.
    fn pick_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }

    /// `[low, high)` 구간 균등 난수
    fn uniform(&self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// `rand` 스레드 로컬 생성기 기반 기본 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// 고정 시퀀스를 순환 반환하는 결정적 생성기
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    /// 새 시퀀스 생성기. 값은 `[0, 1)`로 클램프된다.
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() {
            vec![0.0]
        } else {
            values
                .into_iter()
                .map(|v| v.clamp(0.0, 0.999_999))
                .collect()
        };
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&self) -> f64 {
        let mut cursor = self.cursor.lock();
        let value = self.values[*cursor % self.values.len()];
        *cursor = cursor.wrapping_add(1);
        value
    }
}
