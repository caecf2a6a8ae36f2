use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use super::*;
use crate::catalog::ProductType;
use crate::config::Config;
use crate::error::AutopreneurError;
use crate::oracle::{ContentGenerator, ResearchOracle};
use crate::render::Renderer;
use crate::store::{MemoryStore, RecordStore};
use crate::types::{ArtifactKind, ArtifactSet, Payload, Product};

struct StubResearch {
    score: Option<u8>,
    fail: bool,
}

#[async_trait]
impl ResearchOracle for StubResearch {
    async fn research(&self, topic: &str) -> Result<String> {
        if self.fail {
            return Err(anyhow!("research backend unavailable"));
        }
        Ok(format!("# Report\n\nDemand for {} is rising.", topic))
    }

    async fn score(&self, _report: &str) -> Result<Option<u8>> {
        Ok(self.score)
    }
}

struct StubGenerator {
    payload: Option<Payload>,
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate(&self, _topic: &str, _product_type: ProductType) -> Result<Payload> {
        self.payload.clone().ok_or_else(|| anyhow!("model timed out"))
    }
}

struct JsonOnlyRenderer;

impl Renderer for JsonOnlyRenderer {
    fn render(&self, product_type: ProductType, payload: &Payload, out_dir: &Path) -> ArtifactSet {
        let path = out_dir.join(format!("{}_data.json", product_type));
        fs::write(&path, serde_json::to_string(payload).unwrap()).unwrap();
        ArtifactSet::from([(ArtifactKind::Json, path)])
    }
}

struct ReadOnlyStore;

impl RecordStore<Product> for ReadOnlyStore {
    fn load(&self) -> Result<Vec<Product>> {
        Ok(Vec::new())
    }

    fn save(&self, _records: &[Product]) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

struct LimitedSaves {
    inner: MemoryStore<Signal>,
    remaining: Mutex<usize>,
}

impl RecordStore<Signal> for LimitedSaves {
    fn load(&self) -> Result<Vec<Signal>> {
        self.inner.load()
    }

    fn save(&self, records: &[Signal]) -> Result<()> {
        let mut remaining = self.remaining.lock().unwrap();
        if *remaining == 0 {
            return Err(anyhow!("read-only file system"));
        }
        *remaining -= 1;
        self.inner.save(records)
    }
}

fn caption_payload() -> Payload {
    json!({
        "name": "Ramadan Caption Bank",
        "description": "30 captions for a muslim fashion store",
        "captions": [
            {"day": 1, "text": "Marhaban ya Ramadan", "hashtags": "#ramadan"},
            {"day": 2, "text": "Outfit buka bersama", "hashtags": "#ootd"}
        ]
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        db_dir: dir.path().join("db"),
        products_dir: dir.path().join("products"),
        templates_dir: dir.path().join("templates"),
        ..Config::default()
    }
}

fn workshop(dir: &TempDir, score: Option<u8>, payload: Option<Payload>) -> Workshop {
    Workshop {
        config: config_in(dir),
        signals: Box::new(MemoryStore::new()),
        products: Box::new(MemoryStore::new()),
        research: Box::new(StubResearch { score, fail: false }),
        generator: Box::new(StubGenerator { payload }),
        renderer: Box::new(JsonOnlyRenderer),
    }
}

#[tokio::test]
async fn test_create_signal_stores_report_and_new_status() {
    let dir = TempDir::new().unwrap();
    let workshop = workshop(&dir, Some(72), None);

    let signal = workshop.create_signal("  template invoice UMKM  ").await.unwrap();

    assert_eq!(signal.topic, "template invoice UMKM");
    assert_eq!(signal.score, 72);
    assert_eq!(signal.status, SignalStatus::New);
    assert_eq!(signal.id.len(), 8);
    assert_eq!(signal.report_file, dir.path().join("db").join(format!("report_{}.md", signal.id)));
    assert!(fs::read_to_string(&signal.report_file).unwrap().contains("template invoice UMKM"));
    assert_eq!(workshop.list_signals().unwrap(), vec![signal]);
}

#[tokio::test]
async fn test_empty_topic_is_rejected_without_writes() {
    let dir = TempDir::new().unwrap();
    let workshop = workshop(&dir, Some(72), None);

    for topic in ["", "   ", "\n\t"] {
        let err = workshop.create_signal(topic).await.unwrap_err();
        assert!(matches!(err, AutopreneurError::EmptyTopic));
        assert!(err.is_input_error());
    }
    assert!(workshop.list_signals().unwrap().is_empty());
    assert!(!dir.path().join("db").exists());
}

#[tokio::test]
async fn test_unparsable_score_uses_fallback() {
    let dir = TempDir::new().unwrap();
    let mut workshop = workshop(&dir, None, None);

    let signal = workshop.create_signal("kaos sablon").await.unwrap();
    assert_eq!(signal.score, 50);

    workshop.config.score_fallback = 0;
    let signal = workshop.create_signal("kaos polos").await.unwrap();
    assert_eq!(signal.score, 0);
}

#[tokio::test]
async fn test_research_failure_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let mut workshop = workshop(&dir, Some(80), None);
    workshop.research = Box::new(StubResearch { score: Some(80), fail: true });

    let err = workshop.create_signal("hampers lebaran").await.unwrap_err();

    assert!(matches!(err, AutopreneurError::Oracle(_)));
    assert!(workshop.list_signals().unwrap().is_empty());
}

#[tokio::test]
async fn test_assemble_promotes_signal() {
    let dir = TempDir::new().unwrap();
    let workshop = workshop(&dir, Some(85), Some(caption_payload()));
    let signal = workshop.create_signal("kalender konten ramadan").await.unwrap();

    let product = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap();

    assert!(product.id.starts_with("prod_"));
    assert_eq!(product.signal_id, signal.id);
    assert_eq!(product.name, "Ramadan Caption Bank");
    assert_eq!(product.product_type, Some(ProductType::CaptionBank));
    assert!(product.files[&ArtifactKind::Json].is_file());
    assert_eq!(workshop.find_signal(&signal.id).unwrap().status, SignalStatus::Generated);
    assert_eq!(workshop.list_products().unwrap(), vec![product.clone()]);

    let again = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap_err();
    assert!(matches!(
        again,
        AutopreneurError::AlreadyHasProduct { ref product_id, .. } if *product_id == product.id
    ));
    assert_eq!(workshop.list_products().unwrap().len(), 1);
}

#[tokio::test]
async fn test_generator_failure_marks_signal_failed() {
    let dir = TempDir::new().unwrap();
    let workshop = workshop(&dir, Some(85), None);
    let signal = workshop.create_signal("kalender konten ramadan").await.unwrap();

    let err = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap_err();

    assert!(matches!(err, AutopreneurError::Oracle(_)));
    assert!(workshop.list_products().unwrap().is_empty());
    assert_eq!(workshop.find_signal(&signal.id).unwrap().status, SignalStatus::Failed);
    assert!(workshop.pick_signal(SelectionMode::Auto).unwrap().is_none());

    let reset = workshop.reset_signal(&signal.id).unwrap();
    assert_eq!(reset.status, SignalStatus::New);
    assert_eq!(
        workshop.pick_signal(SelectionMode::Auto).unwrap().map(|s| s.id),
        Some(signal.id)
    );
}

#[tokio::test]
async fn test_missing_fields_stores_no_product() {
    let dir = TempDir::new().unwrap();
    let mut payload = caption_payload();
    payload.remove("captions");
    payload.remove("description");
    let workshop = workshop(&dir, Some(85), Some(payload));
    let signal = workshop.create_signal("caption jualan").await.unwrap();

    let err = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap_err();

    match err {
        AutopreneurError::MissingFields { product_type, fields } => {
            assert_eq!(product_type, "caption_bank");
            assert_eq!(fields, vec!["description".to_string(), "captions".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(workshop.list_products().unwrap().is_empty());
    assert_eq!(workshop.find_signal(&signal.id).unwrap().status, SignalStatus::Failed);
    assert!(!dir.path().join("products").exists());
}

#[tokio::test]
async fn test_product_save_failure_marks_signal_failed() {
    let dir = TempDir::new().unwrap();
    let mut workshop = workshop(&dir, Some(85), Some(caption_payload()));
    workshop.products = Box::new(ReadOnlyStore);
    let signal = workshop.create_signal("caption jualan").await.unwrap();

    let err = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap_err();

    assert!(matches!(err, AutopreneurError::Storage(_)));
    assert_eq!(workshop.find_signal(&signal.id).unwrap().status, SignalStatus::Failed);
    let leftovers = fs::read_dir(dir.path().join("products")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_promotion_failure_names_the_stored_product() {
    let dir = TempDir::new().unwrap();
    let mut workshop = workshop(&dir, Some(85), Some(caption_payload()));
    let signal = workshop.create_signal("caption jualan").await.unwrap();
    // 允许 `new -> generating` 写入一次，之后的写入全部失败
    workshop.signals = Box::new(LimitedSaves {
        inner: MemoryStore::with_records(workshop.list_signals().unwrap()),
        remaining: Mutex::new(1),
    });

    let err = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap_err();

    let products = workshop.list_products().unwrap();
    assert_eq!(products.len(), 1);
    assert!(matches!(err, AutopreneurError::Storage(_)));
    assert!(err.to_string().contains(&products[0].id));
    assert_eq!(workshop.find_signal(&signal.id).unwrap().status, SignalStatus::Generating);
    assert!(matches!(
        workshop.check().unwrap().as_slice(),
        [Finding::ProductForUnpromotedSignal { status: SignalStatus::Generating, .. }]
    ));
}

#[tokio::test]
async fn test_assemble_requires_new_signal() {
    let dir = TempDir::new().unwrap();
    let workshop = workshop(&dir, Some(85), None);
    let signal = workshop.create_signal("caption jualan").await.unwrap();
    let _ = workshop.assemble_product(&signal.id, ProductType::CaptionBank).await;

    let err = workshop
        .assemble_product(&signal.id, ProductType::CaptionBank)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AutopreneurError::InvalidTransition {
            from: SignalStatus::Failed,
            to: SignalStatus::Generating,
            ..
        }
    ));

    let err = workshop
        .assemble_product("deadbeef", ProductType::CaptionBank)
        .await
        .unwrap_err();
    assert!(matches!(err, AutopreneurError::SignalNotFound(_)));
}

#[tokio::test]
async fn test_summary_counts_statuses() {
    let dir = TempDir::new().unwrap();
    let workshop = workshop(&dir, Some(60), Some(caption_payload()));
    let first = workshop.create_signal("satu").await.unwrap();
    workshop.create_signal("dua").await.unwrap();
    let third = workshop.create_signal("tiga").await.unwrap();

    workshop
        .assemble_product(&first.id, ProductType::CaptionBank)
        .await
        .unwrap();
    workshop.begin_generation(&third.id).unwrap();
    workshop.fail_generation(&third.id).unwrap();

    let summary = workshop.summary().unwrap();
    assert_eq!(
        summary,
        Summary {
            signals: 3,
            new: 1,
            generating: 0,
            generated: 1,
            failed: 1,
            products: 1,
        }
    );
    assert!(workshop.check().unwrap().is_empty());
}
