use anyhow::Context;
use chrono::Utc;
use std::collections::HashSet;
use std::fs;

use crate::context::Workshop;
use crate::error::{AutopreneurError, CoreResult};
use crate::types::{Signal, SignalStatus};

impl Workshop {
    pub(crate) fn load_signals(&self) -> CoreResult<Vec<Signal>> {
        self.signals.load().map_err(AutopreneurError::Storage)
    }

    fn save_signals(&self, signals: &[Signal]) -> CoreResult<()> {
        self.signals.save(signals).map_err(AutopreneurError::Storage)
    }

    /// 所有信号，按创建顺序
    pub fn list_signals(&self) -> CoreResult<Vec<Signal>> {
        self.load_signals()
    }

    pub fn find_signal(&self, signal_id: &str) -> CoreResult<Signal> {
        self.load_signals()?
            .into_iter()
            .find(|signal| signal.id == signal_id)
            .ok_or_else(|| AutopreneurError::SignalNotFound(signal_id.to_string()))
    }

    /// 调研主题并保存为新的信号
    pub async fn create_signal(&self, topic: &str) -> CoreResult<Signal> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AutopreneurError::EmptyTopic);
        }

        let report = self
            .research
            .research(topic)
            .await
            .map_err(AutopreneurError::Oracle)?;

        let score = match self
            .research
            .score(&report)
            .await
            .map_err(AutopreneurError::Oracle)?
        {
            Some(score) => score,
            None => {
                let fallback = self.config.score_fallback.min(100);
                tracing::warn!(topic, fallback, "score reply was not a 0-100 integer, using fallback");
                fallback
            }
        };

        let mut signals = self.load_signals()?;
        let taken: HashSet<&str> = signals.iter().map(|signal| signal.id.as_str()).collect();
        let id = std::iter::repeat_with(Signal::new_id)
            .find(|id| !taken.contains(id.as_str()))
            .unwrap_or_else(Signal::new_id);

        let report_file = self.config.report_path(&id);
        if let Some(parent) = report_file.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))
                .map_err(AutopreneurError::Storage)?;
        }
        fs::write(&report_file, &report)
            .context(format!("Failed to write report {}", report_file.display()))
            .map_err(AutopreneurError::Storage)?;

        let signal = Signal {
            id,
            topic: topic.to_string(),
            score,
            status: SignalStatus::New,
            report_file,
            created_at: Some(Utc::now()),
        };
        signals.push(signal.clone());
        self.save_signals(&signals)?;

        tracing::info!(id = %signal.id, score = signal.score, "signal stored");
        Ok(signal)
    }

    /// 读取-迁移-写回单个信号的状态，非法迁移时不写入
    fn transition_signal(&self, signal_id: &str, next: SignalStatus) -> CoreResult<Signal> {
        let mut signals = self.load_signals()?;
        let signal = signals
            .iter_mut()
            .find(|signal| signal.id == signal_id)
            .ok_or_else(|| AutopreneurError::SignalNotFound(signal_id.to_string()))?;

        signal.transition(next)?;
        let updated = signal.clone();
        self.save_signals(&signals)?;

        tracing::debug!(id = signal_id, status = %next, "signal status changed");
        Ok(updated)
    }

    /// `new -> generating`
    pub fn begin_generation(&self, signal_id: &str) -> CoreResult<Signal> {
        self.transition_signal(signal_id, SignalStatus::Generating)
    }

    /// `generating -> generated`
    pub fn promote_signal(&self, signal_id: &str) -> CoreResult<Signal> {
        self.transition_signal(signal_id, SignalStatus::Generated)
    }

    /// `generating -> failed`
    pub fn fail_generation(&self, signal_id: &str) -> CoreResult<Signal> {
        self.transition_signal(signal_id, SignalStatus::Failed)
    }

    /// `failed -> new`，人工恢复失败的信号
    pub fn reset_signal(&self, signal_id: &str) -> CoreResult<Signal> {
        self.transition_signal(signal_id, SignalStatus::New)
    }

    /// 读取信号的调研报告
    pub fn read_report(&self, signal_id: &str) -> CoreResult<String> {
        let signal = self.find_signal(signal_id)?;
        fs::read_to_string(&signal.report_file)
            .context(format!("Failed to read report {}", signal.report_file.display()))
            .map_err(AutopreneurError::Storage)
    }
}
