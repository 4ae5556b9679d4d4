use std::sync::Arc;

use tera::Tera;

use crate::bilingual::{BilingualResolver, Dictionary};
use crate::config::{Config, PdfEngineKind};
use crate::db::DbPool;
use crate::error::Result;
use crate::normalize::RecordNormalizer;
use crate::pdf::{ChromiumEngine, DisabledEngine, NativeEngine, PdfEngine};
use crate::producer::{DocumentProducer, ProducerSettings};
use crate::storage::PhotoResolver;
use crate::templates::{load_pages, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub producer: Arc<DocumentProducer>,
    pub pages: Arc<Tera>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Arc<Config>) -> Result<Self> {
        let producer = Arc::new(build_producer(&config)?);
        let pages = Arc::new(load_pages(&config.templates_folder));
        Ok(Self {
            pool,
            config,
            producer,
            pages,
        })
    }
}

/// Wires the generation pipeline from configuration. Fails only when a
/// configured dictionary file cannot be read.
pub fn build_producer(config: &Config) -> Result<DocumentProducer> {
    let dictionary = match &config.dictionary_path {
        Some(path) => Dictionary::load(path)?,
        None => Dictionary::builtin(),
    };
    tracing::info!(entries = dictionary.len(), "dictionary loaded");

    let engine: Arc<dyn PdfEngine> = match config.pdf_engine {
        PdfEngineKind::Chromium => Arc::new(ChromiumEngine::new(
            config.chromium_path.clone(),
            config.render_timeout,
        )),
        PdfEngineKind::Native => Arc::new(NativeEngine::new(config.pdf_font_dir.clone())),
        PdfEngineKind::None => Arc::new(DisabledEngine),
    };
    tracing::info!(engine = engine.name(), "PDF engine selected");

    Ok(DocumentProducer::new(
        RecordNormalizer::new(BilingualResolver::new(Arc::new(dictionary), config.numerals)),
        TemplateStore::new(config.templates_folder.clone()),
        PhotoResolver::new(config.upload_folder.clone()),
        engine,
        ProducerSettings {
            certificates_dir: config.certificates_folder.clone(),
            assets_base: config.assets_base_url.clone(),
            uploads_base: config.uploads_base_url.clone(),
            verification_base_url: config.verification_base_url.clone(),
        },
    ))
}
