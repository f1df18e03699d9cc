//! childhealth-ranker: turns a stored prediction payload into the results view.
//!
//! Pipeline: parse the stored text (tolerantly) → halve every score → stable
//! descending sort → top 3 → risk tiers, bar chart and summary cards.
//! Nothing here returns an error: any missing or malformed input is the
//! `NoData` state.

pub mod rank;
pub mod view;

pub use rank::{halve_all, rank_conditions, top_n, RankedCondition, RiskTier, TOP_N};
pub use view::{present, present_value, Bar, BarChart, ResultsView, SummaryCard, NO_DATA_NOTICE};
