//! Planet requests: the source trait, the ticket the view issues and the
//! inbox completions are posted to.
//!
//! The view never awaits anything itself. Selecting a star queues a
//! [`FetchTicket`]; the host drives [`run_fetch`] on its executor, which
//! posts a [`FetchCompletion`] into the shared [`FetchInbox`]. The next
//! `tick` drains the inbox and applies completions whose generation still
//! matches the focused star.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use futures::future::{self, FutureExt, LocalBoxFuture};
use crate::components::record::{Planet, Star};
use crate::error::FetchError;

/// Asynchronous planet lookup for a star.
pub trait PlanetSource {
    fn fetch_planets(&self, star: &Star) -> LocalBoxFuture<'static, Result<Vec<Planet>, FetchError>>;
}

/// A planet request issued by the view on entering the focused state.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    /// Focus generation the result belongs to.
    pub generation: u64,
    pub star_index: usize,
    pub star: Star,
}

/// Result of a ticket, tagged with the ticket's generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCompletion {
    pub generation: u64,
    pub star_index: usize,
    pub result: Result<Vec<Planet>, FetchError>,
}

/// Single-threaded mailbox shared between in-flight fetches and the view.
#[derive(Debug, Clone, Default)]
pub struct FetchInbox {
    queue: Rc<RefCell<VecDeque<FetchCompletion>>>,
}

impl FetchInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, completion: FetchCompletion) {
        self.queue.borrow_mut().push_back(completion);
    }

    /// Oldest pending completion.
    pub fn pop(&self) -> Option<FetchCompletion> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Run one ticket against `source` and post the outcome to `inbox`.
/// The source is only borrowed while the request is created.
pub fn run_fetch(
    source: &dyn PlanetSource,
    ticket: FetchTicket,
    inbox: FetchInbox,
) -> LocalBoxFuture<'static, ()> {
    let request = source.fetch_planets(&ticket.star);
    async move {
        let result = request.await;
        if let Err(err) = &result {
            log::warn!("planet fetch for star #{} failed: {}", ticket.star_index, err);
        }
        inbox.post(FetchCompletion {
            generation: ticket.generation,
            star_index: ticket.star_index,
            result,
        });
    }
    .boxed_local()
}

/// In-memory source keyed by star id. Unknown stars resolve to `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    systems: HashMap<u64, Result<Vec<Planet>, FetchError>>,
}

impl CatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_planets(mut self, star_id: u64, planets: Vec<Planet>) -> Self {
        self.systems.insert(star_id, Ok(planets));
        self
    }

    pub fn with_failure(mut self, star_id: u64, error: FetchError) -> Self {
        self.systems.insert(star_id, Err(error));
        self
    }
}

impl PlanetSource for CatalogSource {
    fn fetch_planets(&self, star: &Star) -> LocalBoxFuture<'static, Result<Vec<Planet>, FetchError>> {
        let result = match star.id.and_then(|id| self.systems.get(&id)) {
            Some(result) => result.clone(),
            None => Err(FetchError::NotFound(star.display_name().to_string())),
        };
        future::ready(result).boxed_local()
    }
}
