//! 业务能力层：每个阶段只描述"我能做什么"，不关心流程顺序

pub mod admission_download;
pub mod direction_detail;
pub mod direction_discovery;
pub mod export_reader;
pub mod row_normalizer;
pub mod selectors;
pub mod university_stage;
pub mod urls;

pub use admission_download::AdmissionDownload;
pub use direction_detail::{DirectionDetail, DirectionOutcome};
pub use direction_discovery::DirectionDiscovery;
pub use row_normalizer::{NormalizedBatch, RowContext};
pub use university_stage::UniversityStage;
