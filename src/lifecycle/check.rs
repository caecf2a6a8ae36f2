use std::collections::{HashMap, HashSet};

use crate::context::Workshop;
use crate::error::CoreResult;
use crate::types::{Product, Signal, SignalStatus};

/// 数据一致性问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// 产品引用了不存在的信号
    DanglingProduct { product_id: String, signal_id: String },
    /// 同一信号被多个产品引用
    SharedSignal { signal_id: String, product_ids: Vec<String> },
    /// 信号为 `generated` 却没有产品
    GeneratedWithoutProduct { signal_id: String },
    /// 有产品但信号不是 `generated`
    ProductForUnpromotedSignal { signal_id: String, status: SignalStatus },
    /// 组装中途中断
    StuckGenerating { signal_id: String },
    /// 调研报告文件丢失
    MissingReport { signal_id: String },
    /// 重复的ID
    DuplicateId { id: String },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::DanglingProduct { product_id, signal_id } => {
                write!(f, "product {} references missing signal {}", product_id, signal_id)
            }
            Finding::SharedSignal { signal_id, product_ids } => write!(
                f,
                "signal {} is referenced by several products: {}",
                signal_id,
                product_ids.join(", ")
            ),
            Finding::GeneratedWithoutProduct { signal_id } => {
                write!(f, "signal {} is generated but has no product", signal_id)
            }
            Finding::ProductForUnpromotedSignal { signal_id, status } => {
                write!(f, "signal {} has a product but is still `{}`", signal_id, status)
            }
            Finding::StuckGenerating { signal_id } => {
                write!(f, "signal {} was left in `generating` by an interrupted run", signal_id)
            }
            Finding::MissingReport { signal_id } => {
                write!(f, "report file of signal {} is missing", signal_id)
            }
            Finding::DuplicateId { id } => write!(f, "id {} appears more than once", id),
        }
    }
}

/// 检查信号与产品之间的约束
pub fn check_records(signals: &[Signal], products: &[Product]) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut seen = HashSet::new();
    for id in signals.iter().map(|s| &s.id).chain(products.iter().map(|p| &p.id)) {
        if !seen.insert(id.as_str()) {
            findings.push(Finding::DuplicateId { id: id.clone() });
        }
    }

    let by_id: HashMap<&str, &Signal> = signals.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut products_by_signal: HashMap<&str, Vec<&Product>> = HashMap::new();
    for product in products {
        if !by_id.contains_key(product.signal_id.as_str()) {
            findings.push(Finding::DanglingProduct {
                product_id: product.id.clone(),
                signal_id: product.signal_id.clone(),
            });
        }
        products_by_signal
            .entry(product.signal_id.as_str())
            .or_default()
            .push(product);
    }

    for signal in signals {
        let attached = products_by_signal.get(signal.id.as_str());
        match (signal.status, attached) {
            (SignalStatus::Generated, None) => findings.push(Finding::GeneratedWithoutProduct {
                signal_id: signal.id.clone(),
            }),
            (SignalStatus::Generated, Some(_)) => {}
            (status, Some(_)) => findings.push(Finding::ProductForUnpromotedSignal {
                signal_id: signal.id.clone(),
                status,
            }),
            (SignalStatus::Generating, None) => findings.push(Finding::StuckGenerating {
                signal_id: signal.id.clone(),
            }),
            _ => {}
        }

        if let Some(attached) = attached
            && attached.len() > 1
        {
            findings.push(Finding::SharedSignal {
                signal_id: signal.id.clone(),
                product_ids: attached.iter().map(|p| p.id.clone()).collect(),
            });
        }

        if !signal.report_file.is_file() {
            findings.push(Finding::MissingReport {
                signal_id: signal.id.clone(),
            });
        }
    }

    findings
}

impl Workshop {
    /// 加载两份数据并做一致性检查
    pub fn check(&self) -> CoreResult<Vec<Finding>> {
        let signals = self.load_signals()?;
        let products = self.list_products()?;
        Ok(check_records(&signals, &products))
    }
}
