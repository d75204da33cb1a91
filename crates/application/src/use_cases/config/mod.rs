mod export;
mod import;
mod load_external;

pub use export::ExportConfigUseCase;
pub use import::{ImportConfigUseCase, ImportSummary};
pub use load_external::LoadExternalConfigUseCase;
