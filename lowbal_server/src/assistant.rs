//! Simulated offer assistant.
//!
//! The `OfferAssistant` runs a background thread that turns `OfferJob`s into
//! offer drafts. Each job is drafted immediately from the tab snapshot it
//! carries, then held back for a random processing delay on a short-lived
//! timer thread before the result is handed to the main loop as an
//! `AssistantEvent`.
//!
//! The assistant never touches the session store. Whether a draft is still
//! wanted when its delay elapses is decided by the main loop, which owns the
//! store.
//!
//! The assistant thread stops once every `Sender<OfferJob>` has been dropped.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};
use lowbal_common::Response;
use lowbal_common::negotiation::{OfferDraft, draft_offer};
use lowbal_common::result::Result;
use lowbal_common::session::{NegotiationTab, SessionId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default lower bound of the simulated processing delay.
pub const DEFAULT_MIN_DELAY_MS: u64 = 2000;
/// Default upper bound of the simulated processing delay.
pub const DEFAULT_MAX_DELAY_MS: u64 = 4000;

/// Timing and randomness settings for the assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Shortest processing delay.
    pub min_delay: Duration,
    /// Longest processing delay.
    pub max_delay: Duration,
    /// Seed for reproducible drafts; drawn from the OS when `None`.
    pub seed: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(DEFAULT_MIN_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            seed: None,
        }
    }
}

/// Request to draft an offer for one tab.
pub struct OfferJob {
    /// Snapshot of the tab at request time.
    pub tab: NegotiationTab,
    /// Where the final response goes.
    pub reply: Sender<Response>,
}

/// Message sent by the assistant to the main loop.
pub enum AssistantEvent {
    /// A draft (or drafting error) whose processing delay has elapsed.
    Drafted {
        /// Tab the draft belongs to.
        session_id: SessionId,
        /// Drafting result.
        draft: Result<OfferDraft>,
        /// Where the final response goes.
        reply: Sender<Response>,
    },
}

/// Background offer drafting with simulated latency.
pub struct OfferAssistant;

impl OfferAssistant {
    /// Start the assistant thread.
    ///
    /// Returns the job channel and the thread handle. Drafted events are pushed to `events`.
    pub fn start(
        config: AssistantConfig,
        events: Sender<AssistantEvent>,
    ) -> (Sender<OfferJob>, JoinHandle<()>) {
        let (job_tx, job_rx) = unbounded::<OfferJob>();
        let handle = thread::spawn(move || run(config, job_rx, events));
        (job_tx, handle)
    }
}

fn run(config: AssistantConfig, jobs: Receiver<OfferJob>, events: Sender<AssistantEvent>) {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(
        "Offer assistant started (delay {:?}..={:?})",
        config.min_delay, config.max_delay
    );

    for job in jobs {
        let session_id = job.tab.id;
        let draft = draft_offer(&job.tab, &mut rng);
        let delay = processing_delay(&config, &mut rng);
        debug!("Negotiation {}: draft ready in {:?}", session_id, delay);

        let events = events.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let event = AssistantEvent::Drafted {
                session_id,
                draft,
                reply: job.reply,
            };
            if events.send(event).is_err() {
                warn!("Negotiation {}: main loop gone, draft dropped", session_id);
            }
        });
    }
    info!("Offer assistant stopping...");
}

/// Draws a delay uniformly from the configured bounds.
fn processing_delay<R: Rng + ?Sized>(config: &AssistantConfig, rng: &mut R) -> Duration {
    let min = config.min_delay.as_millis() as u64;
    let max = config.max_delay.as_millis() as u64;
    if max <= min {
        return config.min_delay;
    }
    Duration::from_millis(rng.random_range(min..=max))
}
