//! Get, view and submit workflows tying the resolver, cache and gateway together

use crate::cache::PuzzleCache;
use crate::error::{CacheError, IdentityError, PuzzleError};
use crate::gateway::{AnswerHint, RemoteGateway, SubmissionAttempt, Verdict};
use crate::identity::{PuzzleIdentity, Resolution};
use crate::record::{Part, PuzzleRecord};
use crate::select::select_part;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How hard to try for the part 2 question after part 1 is solved
///
/// The service may not disclose part 2 on the very first re-scrape, so the
/// refresh is repeated with exponential backoff until it shows up or the
/// attempts run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Total scrapes, including the first one; at least one is always made
    pub attempts: u32,
    /// Delay before the second scrape, doubled for each further one
    pub initial_backoff: Duration,
}

impl RefreshPolicy {
    fn backoff(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(retry))
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Terminal state of a submission that reached the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Correct, or already solved remotely; the cache reflects the solved part
    Accepted {
        part: Part,
        /// Whether the part 2 question was obtained by a refresh
        refreshed: bool,
        record: PuzzleRecord,
    },
    /// Wrong answer; nothing was cached
    Rejected {
        part: Part,
        hint: Option<AnswerHint>,
    },
    /// The service asks to wait before submitting again
    Throttled {
        part: Part,
        wait: Option<Duration>,
    },
}

/// Orchestrates resolve, fetch, submit and cache reconciliation
pub struct Coordinator<G> {
    gateway: G,
    cache: PuzzleCache,
    refresh: RefreshPolicy,
}

impl<G: RemoteGateway> Coordinator<G> {
    pub fn new(gateway: G, cache: PuzzleCache) -> Self {
        Self {
            gateway,
            cache,
            refresh: RefreshPolicy::default(),
        }
    }

    pub fn with_refresh_policy(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn cache(&self) -> &PuzzleCache {
        &self.cache
    }

    /// Turn a resolution into a concrete puzzle, asking the gateway for `latest`
    pub fn resolve(&self, resolution: Resolution) -> Result<PuzzleIdentity, PuzzleError> {
        match resolution {
            Resolution::Exact(identity) => Ok(identity),
            Resolution::Latest { year } => {
                let year = year.unwrap_or_else(|| self.gateway.current_year());
                let day = self
                    .gateway
                    .latest_unlocked_day(year)
                    .ok_or(IdentityError::NotYetReleased(year))?;
                let identity = PuzzleIdentity::new(year, day)?;
                debug!(%identity, "resolved latest puzzle");
                Ok(identity)
            }
        }
    }

    /// Cached record, scraping it on a cold cache
    pub fn get(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, PuzzleError> {
        self.cache
            .get_or_fetch(identity, |identity| self.scrape(identity))
    }

    /// Record to display; `refresh` forces a re-scrape first
    pub fn view(&self, identity: PuzzleIdentity, refresh: bool) -> Result<PuzzleRecord, PuzzleError> {
        if refresh {
            self.refresh(identity)
        } else {
            self.get(identity)
        }
    }

    /// Re-scrape and merge into the cache without losing local progress
    pub fn refresh(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, PuzzleError> {
        let fresh = self.scrape(identity)?;
        let stored = match self.cache.update(identity, |record| {
            *record = std::mem::take(record).merge(fresh.clone());
        }) {
            Ok(record) => record,
            Err(CacheError::NotCached(_)) => {
                self.cache.put(identity, &fresh)?;
                fresh
            }
            Err(e) => return Err(e.into()),
        };
        Ok(stored)
    }

    /// Submit `answer` for `part`, or for the first unsolved part when `None`
    pub fn submit(
        &self,
        identity: PuzzleIdentity,
        part: Option<Part>,
        answer: &str,
    ) -> Result<SubmitOutcome, PuzzleError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(PuzzleError::EmptyAnswer);
        }

        let record = self.get(identity)?;
        let part = match part {
            Some(part) => part,
            None => select_part(&record).map_err(|_| PuzzleError::AlreadyComplete(identity))?,
        };

        let attempt = SubmissionAttempt {
            identity,
            part,
            answer: answer.to_string(),
        };
        info!(%identity, %part, "submitting answer");
        let verdict = self.gateway.submit(&attempt)?;
        debug!(%identity, %part, ?verdict, "submission verdict");

        match verdict {
            Verdict::Correct => {
                let record = self.cache.update(identity, |record| {
                    record.mark_solved(part, Some(attempt.answer));
                })?;
                let needs_refresh = part == Part::One;
                Ok(self.accept(identity, part, record, needs_refresh))
            }
            Verdict::AlreadySolved => self.reconcile_already_solved(identity, part),
            Verdict::Incorrect { hint } => Ok(SubmitOutcome::Rejected { part, hint }),
            Verdict::RateLimited { wait } => Ok(SubmitOutcome::Throttled { part, wait }),
        }
    }

    /// Sync local progress after the service reports the level as done
    ///
    /// The service gives the same reply for part 2 while part 1 is still open,
    /// so part 2 is only marked here when part 1 is known to be solved.
    /// Otherwise the page decides.
    fn reconcile_already_solved(
        &self,
        identity: PuzzleIdentity,
        part: Part,
    ) -> Result<SubmitOutcome, PuzzleError> {
        // The answer may not be the right one, so only the bit is synced
        let record = self.cache.update(identity, |record| {
            if part == Part::One || record.is_solved(Part::One) {
                record.mark_solved(part, None);
            }
        })?;
        if record.is_solved(part) {
            let needs_refresh = part == Part::One && record.question_part2.is_none();
            return Ok(self.accept(identity, part, record, needs_refresh));
        }

        let record = self.refresh(identity)?;
        if record.is_solved(part) {
            return Ok(SubmitOutcome::Accepted {
                part,
                refreshed: record.question_part2.is_some(),
                record,
            });
        }
        warn!(%identity, %part, "service reports the wrong level, part is still locked");
        Err(PuzzleError::PartLocked { identity, part })
    }

    fn accept(
        &self,
        identity: PuzzleIdentity,
        part: Part,
        record: PuzzleRecord,
        needs_refresh: bool,
    ) -> SubmitOutcome {
        if !needs_refresh {
            return SubmitOutcome::Accepted {
                part,
                refreshed: false,
                record,
            };
        }

        match self.refresh_until_part_two(identity) {
            Ok(record) => SubmitOutcome::Accepted {
                part,
                refreshed: record.question_part2.is_some(),
                record,
            },
            Err(e) => {
                // The solved part is already committed; only the page update failed
                warn!(%identity, error = %e, "could not refresh puzzle after solving part 1");
                SubmitOutcome::Accepted {
                    part,
                    refreshed: false,
                    record,
                }
            }
        }
    }

    fn refresh_until_part_two(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, PuzzleError> {
        let attempts = self.refresh.attempts.max(1);
        let mut retry = 0;
        loop {
            let record = self.refresh(identity)?;
            retry += 1;
            if record.question_part2.is_some() || retry >= attempts {
                return Ok(record);
            }

            let delay = self.refresh.backoff(retry - 1);
            debug!(%identity, ?delay, "part 2 not disclosed yet, retrying refresh");
            thread::sleep(delay);
        }
    }

    fn scrape(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, PuzzleError> {
        info!(%identity, "fetching puzzle");
        Ok(self.gateway.scrape(identity)?)
    }
}
