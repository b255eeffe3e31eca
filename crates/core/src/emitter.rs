//! Paginated bounded emitter.
//!
//! Pulls pages from a [`PageSource`] one at a time, converts every record and
//! forwards it to an [`ItemSink`]. The cap and the sink-closed condition are
//! checked after every item, so emission can stop in the middle of a page and
//! never forwards more than `cap` items.

use tracing::debug;

use crate::error::{QueryError, Result};
use crate::store::{ItemSink, PageSource, ResultItem, SinkStatus};

/// Emitted count and cap for one retrieval loop. A cap of 0 means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmissionState {
    emitted: usize,
    cap: usize,
}

impl EmissionState {
    pub fn new(cap: usize) -> Self {
        Self { emitted: 0, cap }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Whether the cap has been reached. Always false when unlimited.
    pub fn is_capped(&self) -> bool {
        self.cap != 0 && self.emitted >= self.cap
    }

    fn record(&mut self) {
        self.emitted += 1;
    }
}

/// Why emission stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The cap was reached.
    Capped,
    /// The sink stopped accepting items.
    SinkClosed,
    /// The store reported no further pages.
    Exhausted,
}

/// Summary of a finished emission loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmissionReport {
    pub emitted: usize,
    pub pages: usize,
    pub termination: Termination,
}

/// Drives `source` until the cap is hit, the sink closes or pages run out.
///
/// Items forwarded before a store or conversion failure stay forwarded.
pub async fn emit<S, F, K>(
    source: &mut S,
    mut convert: F,
    sink: &mut K,
    state: &mut EmissionState,
) -> Result<EmissionReport>
where
    S: PageSource + ?Sized,
    F: FnMut(S::Record) -> Result<ResultItem>,
    K: ItemSink + ?Sized,
{
    let mut pages = 0;

    let termination = 'pages: loop {
        if state.is_capped() {
            break Termination::Capped;
        }

        let page = pages + 1;
        let records = source
            .next_page()
            .await
            .map_err(|e| QueryError::StoreRequest {
                page,
                message: e.to_string(),
            })?;
        let Some(records) = records else {
            break Termination::Exhausted;
        };
        pages = page;
        debug!(page, records = records.len(), "Fetched page");

        for record in records {
            let item = convert(record)?;
            if sink.write_item(&item)? == SinkStatus::Closed {
                break 'pages Termination::SinkClosed;
            }
            state.record();
            if state.is_capped() {
                break 'pages Termination::Capped;
            }
        }
    };

    debug!(
        emitted = state.emitted(),
        pages,
        ?termination,
        "Emission finished"
    );

    Ok(EmissionReport {
        emitted: state.emitted(),
        pages,
        termination,
    })
}
