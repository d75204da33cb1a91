pub mod config;

pub use config::{
    ExportConfigUseCase, ImportConfigUseCase, ImportSummary, LoadExternalConfigUseCase,
};
