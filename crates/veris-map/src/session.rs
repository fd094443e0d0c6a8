use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use veris_models::config::MapConfig;
use veris_models::filter::{FilterState, Viewport};
use veris_models::marker::Projection;
use veris_models::profile::RiskProfile;
use veris_models::property::Property;
use veris_store::{FilterQuery, PropertySource};

use crate::error::{CommandError, MapError};
use crate::filter_store::FilterStore;
use crate::interpreter;
use crate::projector::MarkerProjector;
use crate::reply::decode_reply;

/// Outcome of feeding one assistant reply through the session: the text
/// to show, and the new filter snapshot if a command was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyOutcome {
    pub reply: String,
    pub state: Option<FilterState>,
}

/// Handle for one in-flight property fetch. Carries the generation the
/// fetch was launched against and the token that cancels it.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    token: CancellationToken,
    query: FilterQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// One user's map: the filter state, the property source, and the last
/// good projection.
///
/// Filter mutations are synchronous; fetching and projecting are split
/// into `begin_refresh` / `complete` around the async fetch so a fetch
/// that raced with a newer mutation is detected by its generation and
/// discarded. `refresh` wires the two together for the common path.
pub struct MapSession {
    store: FilterStore,
    source: Arc<dyn PropertySource>,
    projector: MarkerProjector,
    profile: RiskProfile,
    viewport: Viewport,
    last_projection: Projection,
    inflight: Option<CancellationToken>,
}

impl MapSession {
    pub fn new(source: Arc<dyn PropertySource>, profile: RiskProfile, map: MapConfig) -> Self {
        let projector = MarkerProjector::new(map);
        let viewport = projector.home_viewport();
        Self {
            store: FilterStore::new(),
            source,
            projector,
            profile,
            viewport,
            last_projection: Projection {
                markers: Vec::new(),
                viewport: Some(viewport),
            },
            inflight: None,
        }
    }

    pub fn filter_state(&self) -> &FilterState {
        self.store.current()
    }

    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    /// The last successfully projected marker set. Never blanks on a
    /// failed or discarded fetch.
    pub fn projection(&self) -> &Projection {
        &self.last_projection
    }

    /// Feed one raw assistant reply through the session. A reply whose
    /// attached command is rejected still yields its text; the command
    /// is ignored with a warning and the filter state keeps its value.
    pub fn apply_reply(&mut self, raw: &str) -> Result<ReplyOutcome, MapError> {
        let reply = decode_reply(raw)?;
        let state = match reply.command {
            Some(command) => match self.apply_command_value(&command) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(error = %e, "map command ignored");
                    None
                }
            },
            None => None,
        };
        Ok(ReplyOutcome {
            reply: reply.reply,
            state,
        })
    }

    /// Decode and apply a raw command. On success the generation bumps
    /// and any in-flight fetch is cancelled; on rejection nothing moves.
    pub fn apply_command_value(&mut self, raw: &Value) -> Result<FilterState, CommandError> {
        let state = interpreter::apply(raw, &mut self.store)?;
        if let Some(token) = self.inflight.take() {
            debug!("filter state changed; cancelling in-flight fetch");
            token.cancel();
        }
        Ok(state)
    }

    /// Start a fetch for the current filter snapshot. The previous
    /// in-flight fetch, if any, is superseded and cancelled.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.inflight = Some(token.clone());
        FetchTicket {
            generation: self.store.generation(),
            token,
            query: FilterQuery::from_state(self.store.current()),
        }
    }

    /// Apply the results of a completed fetch. Results for any
    /// generation other than the current one are discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        properties: Vec<Property>,
    ) -> Result<&Projection, MapError> {
        let current = self.store.generation();
        if ticket.generation != current {
            debug!(
                fetched = ticket.generation,
                current, "discarding stale fetch result"
            );
            return Err(MapError::Stale {
                expected: current,
                actual: ticket.generation,
            });
        }
        if ticket.token.is_cancelled() {
            // Same generation but a newer refresh superseded this one.
            return Err(MapError::Store(veris_store::StoreError::Cancelled));
        }
        self.inflight = None;

        let mut projection =
            self.projector
                .project(&properties, self.store.current(), &self.profile);
        match projection.viewport {
            Some(viewport) => self.viewport = viewport,
            // No survivors: hold the viewport where it was.
            None => projection.viewport = Some(self.viewport),
        }
        self.last_projection = projection;
        Ok(&self.last_projection)
    }

    /// Fetch and project the current filter snapshot.
    pub async fn refresh(&mut self) -> Result<&Projection, MapError> {
        let ticket = self.begin_refresh();
        let properties = self.source.fetch(&ticket.query, &ticket.token).await?;
        self.complete(ticket, properties)
    }
}
