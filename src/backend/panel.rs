use std::sync::Arc;
use thiserror::Error;

use super::analysis::{AnalysisError, AnalysisRecord, QueryIntent};
use super::catalog::RegionCatalog;
use super::filters::{FieldName, FilterError, FilterState};
use super::Ticket;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("An analysis is already running")]
    AlreadyRunning,
}

/// What the result area shows. A search that matched nothing is `HasResults(vec![])`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultView {
    #[default]
    NotYetSearched,
    HasResults(Vec<AnalysisRecord>),
}

impl ResultView {
    pub fn records(&self) -> Option<&[AnalysisRecord]> {
        match self {
            ResultView::NotYetSearched => None,
            ResultView::HasResults(records) => Some(records),
        }
    }
}

/// Filter form plus result area of the sentiment screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPanel {
    pub filters: FilterState,
    view: ResultView,
    pending: Option<Ticket>,
    error: Option<String>,
}

impl SearchPanel {
    pub fn new(catalog: Arc<RegionCatalog>) -> Self {
        Self {
            filters: FilterState::new(catalog),
            view: ResultView::NotYetSearched,
            pending: None,
            error: None,
        }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_field(&mut self, field: FieldName, value: &str) -> Result<(), FilterError> {
        self.filters.set_field(field, value)
    }

    /// Snapshots the filters for `ticket`. The caller sends the intent to the backend.
    pub fn submit(&mut self, ticket: Ticket) -> Result<QueryIntent, PanelError> {
        if self.pending.is_some() {
            return Err(PanelError::AlreadyRunning);
        }
        let intent = QueryIntent::from_filters(&self.filters);
        tracing::info!("Analysis {} submitted for bill {:?}", ticket, intent.bill_label());
        self.pending = Some(ticket);
        self.error = None;
        Ok(intent)
    }

    /// Applies the outcome of `ticket` once. Returns false for an outcome nobody is waiting for.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<AnalysisRecord>, AnalysisError>,
    ) -> bool {
        if self.pending != Some(ticket) {
            tracing::warn!("Discarding analysis {} result, not pending", ticket);
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(records) => {
                tracing::info!("Analysis {} returned {} records", ticket, records.len());
                self.view = ResultView::HasResults(records);
            }
            Err(e) => {
                tracing::warn!("Analysis {} failed: {}", ticket, e);
                self.view = ResultView::NotYetSearched;
                self.error = Some(failure_message(&e));
            }
        }
        true
    }

    /// Clears the results and the target bill; every other filter is kept.
    pub fn reset(&mut self) {
        self.view = ResultView::NotYetSearched;
        self.filters.target_bill.clear();
        self.pending = None;
        self.error = None;
    }

    /// Drops any in-flight submission so its result is discarded.
    pub fn abandon(&mut self) {
        if let Some(ticket) = self.pending.take() {
            tracing::info!("Analysis {} abandoned", ticket);
        }
    }
}

pub fn failure_message(error: &AnalysisError) -> String {
    match error {
        AnalysisError::TimedOut => "분석 시간이 초과되었습니다. 다시 시도해주세요.".to_string(),
        other => format!("분석 오류: {}", other),
    }
}
