pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use crate::database::ExamStore;
use crate::services::{
    evaluation::EvaluationService, exam::ExamService, extract::ExtractService,
    generation::GenerationService, model_provider::ProviderRegistry,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExamStore>,
    pub providers: Arc<ProviderRegistry>,
    pub extract_service: ExtractService,
    pub generation_service: GenerationService,
    pub exam_service: ExamService,
    pub default_provider: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ExamStore>,
        providers: Arc<ProviderRegistry>,
        default_provider: String,
    ) -> Self {
        let extract_service = ExtractService::new();
        let generation_service = GenerationService::new(providers.clone());
        let exam_service = ExamService::new(
            store.clone(),
            EvaluationService::new(providers.clone()),
            default_provider.clone(),
        );

        Self {
            store,
            providers,
            extract_service,
            generation_service,
            exam_service,
            default_provider,
        }
    }
}
