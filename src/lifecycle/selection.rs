use crate::error::{AutopreneurError, CoreResult};
use crate::types::Signal;

/// 选择方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// 取分数最高者，平分时取最早出现的
    Auto,
    /// 在 `new` 信号列表中按1起始的序号选择
    Manual(usize),
}

/// 过滤出可生成的信号，保持原有顺序
pub fn pending_signals(signals: &[Signal]) -> Vec<&Signal> {
    signals.iter().filter(|signal| signal.is_new()).collect()
}

/// 从信号中选出下一个要生成产品的
///
/// 没有 `new` 信号时返回 `Ok(None)`，这不是错误。
pub fn select_for_generation(signals: &[Signal], mode: SelectionMode) -> CoreResult<Option<Signal>> {
    let pending = pending_signals(signals);
    if pending.is_empty() {
        return Ok(None);
    }

    let chosen = match mode {
        SelectionMode::Auto => {
            let mut best = pending[0];
            for &candidate in &pending[1..] {
                if candidate.score > best.score {
                    best = candidate;
                }
            }
            best
        }
        SelectionMode::Manual(index) => {
            if index == 0 || index > pending.len() {
                return Err(AutopreneurError::SelectionOutOfRange {
                    index,
                    available: pending.len(),
                });
            }
            pending[index - 1]
        }
    };

    Ok(Some(chosen.clone()))
}
