pub mod columns;
pub mod descriptions;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod pages;
pub mod pipelines;
pub mod summary;
pub mod trip_table;
pub mod univariate;

pub use error::{EdaError, Result};
pub use loader::{load_trip_table, parse_trip_table, LoadOptions};
pub use pages::{render_page, Page, PageRequest, PageView};
pub use pipelines::{all_pipeline_descriptors, run_pipeline, PipelineId};
pub use summary::{ChartKind, ChartSpec, SummaryTable};
pub use trip_table::TripTable;
