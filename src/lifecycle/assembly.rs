use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use std::fs;

use crate::catalog::{ProductType, validate_payload};
use crate::context::Workshop;
use crate::error::{AutopreneurError, CoreResult};
use crate::types::{Payload, Product, Signal};

fn text_field(payload: &Payload, field: &str) -> String {
    match payload.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

impl Workshop {
    fn load_products(&self) -> CoreResult<Vec<Product>> {
        self.products.load().map_err(AutopreneurError::Storage)
    }

    /// 所有产品，按创建顺序
    pub fn list_products(&self) -> CoreResult<Vec<Product>> {
        self.load_products()
    }

    /// 把一个 `new` 信号组装成产品
    ///
    /// 成功后信号变为 `generated`；一旦进入 `generating` 后失败，信号变为 `failed`，
    /// 且不会写入任何产品记录。
    pub async fn assemble_product(
        &self,
        signal_id: &str,
        product_type: ProductType,
    ) -> CoreResult<Product> {
        let signal = self.find_signal(signal_id)?;

        if let Some(existing) = self
            .load_products()?
            .into_iter()
            .find(|product| product.signal_id == signal.id)
        {
            return Err(AutopreneurError::AlreadyHasProduct {
                signal_id: signal.id,
                product_id: existing.id,
            });
        }

        let signal = self.begin_generation(&signal.id)?;

        match self.build_product(&signal, product_type).await {
            Ok(product) => {
                let mut products = self.load_products()?;
                products.push(product.clone());
                if let Err(e) = self.products.save(&products) {
                    self.discard_artifacts(&product.id);
                    self.release_failed(&signal.id);
                    return Err(AutopreneurError::Storage(e));
                }

                if let Err(e) = self.promote_signal(&signal.id) {
                    // 产品已落盘，信号停留在 `generating`，`check` 会报告
                    tracing::error!(
                        product = %product.id,
                        signal = %signal.id,
                        error = %e,
                        "product stored but signal could not be promoted"
                    );
                    return Err(AutopreneurError::Storage(anyhow::Error::new(e).context(format!(
                        "product {} was stored but signal {} is still `generating`",
                        product.id, signal.id
                    ))));
                }

                tracing::info!(product = %product.id, signal = %signal.id, "product stored");
                Ok(product)
            }
            Err(e) => {
                self.release_failed(&signal.id);
                Err(e)
            }
        }
    }

    /// 产品记录未能入库时，删除已渲染的产物目录
    fn discard_artifacts(&self, product_id: &str) {
        let out_dir = self.config.product_dir(product_id);
        if let Err(e) = fs::remove_dir_all(&out_dir) {
            tracing::warn!(dir = %out_dir.display(), error = %e, "could not remove orphaned artifacts");
        }
    }

    fn release_failed(&self, signal_id: &str) {
        if let Err(e) = self.fail_generation(signal_id) {
            tracing::error!(signal = signal_id, error = %e, "could not mark signal as failed");
        }
    }

    /// 生成内容、校验、落盘产物，返回尚未入库的产品记录
    async fn build_product(&self, signal: &Signal, product_type: ProductType) -> CoreResult<Product> {
        let payload = self
            .generator
            .generate(&signal.topic, product_type)
            .await
            .map_err(AutopreneurError::Oracle)?;

        let missing = validate_payload(product_type, &payload);
        if !missing.is_empty() {
            return Err(AutopreneurError::MissingFields {
                product_type: product_type.to_string(),
                fields: missing,
            });
        }

        let product_id = Product::new_id();
        let out_dir = self.config.product_dir(&product_id);
        fs::create_dir_all(&self.config.products_dir)
            .and_then(|_| fs::create_dir(&out_dir))
            .context(format!("Failed to create product folder {}", out_dir.display()))
            .map_err(AutopreneurError::Storage)?;

        let files = self.renderer.render(product_type, &payload, &out_dir);

        Ok(Product {
            id: product_id,
            signal_id: signal.id.clone(),
            name: text_field(&payload, "name"),
            description: text_field(&payload, "description"),
            files,
            product_type: Some(product_type),
            created_at: Some(Utc::now()),
        })
    }
}
