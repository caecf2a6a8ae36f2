//! 信号到产品的生命周期：调研、选择、组装与一致性检查

use crate::context::Workshop;
use crate::error::CoreResult;
use crate::types::{Signal, SignalStatus};

mod assembly;
pub mod check;
pub mod selection;
mod signal;

pub use check::{Finding, check_records};
pub use selection::{SelectionMode, pending_signals, select_for_generation};

/// 各状态的数量统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub signals: usize,
    pub new: usize,
    pub generating: usize,
    pub generated: usize,
    pub failed: usize,
    pub products: usize,
}

impl Summary {
    pub fn from_signals(signals: &[Signal], products: usize) -> Self {
        let mut summary = Summary {
            signals: signals.len(),
            products,
            ..Default::default()
        };
        for signal in signals {
            match signal.status {
                SignalStatus::New => summary.new += 1,
                SignalStatus::Generating => summary.generating += 1,
                SignalStatus::Generated => summary.generated += 1,
                SignalStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}

impl Workshop {
    pub fn summary(&self) -> CoreResult<Summary> {
        let signals = self.load_signals()?;
        let products = self.list_products()?;
        Ok(Summary::from_signals(&signals, products.len()))
    }

    /// 从当前存储中按方式选择下一个信号
    pub fn pick_signal(&self, mode: SelectionMode) -> CoreResult<Option<Signal>> {
        let signals = self.load_signals()?;
        select_for_generation(&signals, mode)
    }
}

#[cfg(test)]
mod tests;
