pub mod flow;
pub mod ingest;
pub mod target;

pub use flow::{FlowCutoff, FlowPlan, apply_flow, strip_flow_head};
pub use ingest::{IngestCache, IngestOutput, ingest, parse_time_str, sort_and_reindex};
pub use target::{AxisBinding, ShapeKind, Target, TargetStore, Value};
