use thiserror::Error;

use crate::types::signal::SignalStatus;

/// 核心流程的错误分类
#[derive(Debug, Error)]
pub enum AutopreneurError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("unknown product type: {0}")]
    UnknownProductType(String),

    #[error("selection {index} is out of range, {available} new signal(s) available")]
    SelectionOutOfRange { index: usize, available: usize },

    #[error("signal not found: {0}")]
    SignalNotFound(String),

    #[error("signal {id} cannot move from `{from}` to `{to}`")]
    InvalidTransition {
        id: String,
        from: SignalStatus,
        to: SignalStatus,
    },

    #[error("signal {signal_id} already has product {product_id}")]
    AlreadyHasProduct {
        signal_id: String,
        product_id: String,
    },

    #[error("payload for {product_type} is missing required field(s): {}", fields.join(", "))]
    MissingFields {
        product_type: String,
        fields: Vec<String>,
    },

    #[error("oracle call failed: {0:#}")]
    Oracle(#[source] anyhow::Error),

    #[error("storage failure: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl AutopreneurError {
    /// 是否属于输入校验类错误（未修改任何状态）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AutopreneurError::EmptyTopic
                | AutopreneurError::UnknownProductType(_)
                | AutopreneurError::SelectionOutOfRange { .. }
                | AutopreneurError::SignalNotFound(_)
        )
    }
}

pub type CoreResult<T> = std::result::Result<T, AutopreneurError>;
