//! Controller: lifecycle state machine and observation bookkeeping.
//!
//! States: Idle (no watcher) -> Watching (watcher live, pending > 0) -> Idle.
//! All state lives on the instance; independently constructed controllers
//! share nothing. The host is a collaborator passed by `&mut` to every
//! operation, never owned.

use log::{debug, trace};

use crate::config::Config;
use crate::error::{ConfigError, LoadError};
use crate::host::{DocumentHost, VisibilityWatcher, WatchOptions};
use crate::loader;
use crate::outcome::{Hooks, LoadOutcome};
use crate::validate::validate;

/// Deferred-load controller over one document host.
///
/// Invariants:
/// - `pending == tracked.len()` between notification batches;
/// - an element is in `tracked` iff it is registered with the watcher, not
///   yet resolved and not currently loading;
/// - at most one watcher instance exists at a time.
#[derive(Debug)]
pub struct Controller<E, W> {
    cfg: Config,
    hooks: Hooks<E>,
    tracked: Vec<E>,
    pending: usize,
    loading: Vec<E>,
    watcher: Option<W>,
}

impl<E, W> Controller<E, W>
where
    E: Clone + PartialEq,
    W: VisibilityWatcher<E>,
{
    /// Create a controller. The configuration is validated by [`Self::init`],
    /// not here, so construction itself never fails.
    pub fn new(cfg: Config, hooks: Hooks<E>) -> Self {
        Self {
            cfg,
            hooks,
            tracked: Vec::new(),
            pending: 0,
            loading: Vec::new(),
            watcher: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Tracked elements remaining.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether a watcher is currently active.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Validate the configuration, discard any previous watcher, scan the
    /// document and start watching every eligible element. When the host has
    /// no visibility primitive, every eligible element is loaded immediately
    /// and no watcher is created.
    pub fn init<H>(&mut self, host: &mut H) -> Result<(), ConfigError>
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        validate(&self.cfg)?;

        // The watcher is destroyed and recreated by every init.
        self.teardown();

        let eligible = self.scan(host);
        if eligible.is_empty() {
            debug!("init: no eligible elements for {:?}", self.cfg.selector);
            return Ok(());
        }

        if !host.visibility_supported() {
            debug!(
                "init: visibility primitive unavailable, loading {} element(s) immediately",
                eligible.len()
            );
            for element in eligible {
                self.begin_load(host, element);
            }
            return Ok(());
        }

        debug!("init: watching {} element(s)", eligible.len());
        let mut watcher = host.create_watcher(&WatchOptions {
            root: self.cfg.root.clone(),
            root_margin: self.cfg.root_margin.clone(),
            threshold: self.cfg.threshold,
        });
        for element in &eligible {
            watcher.observe(element);
        }
        self.pending = eligible.len();
        self.tracked = eligible;
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Rescan the document and register newly eligible elements with the
    /// existing watcher. A no-op when no watcher is active: `update` never
    /// creates one, it requires a prior successful `init`.
    pub fn update<H>(&mut self, host: &mut H) -> Result<(), ConfigError>
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        validate(&self.cfg)?;

        let Some(watcher) = self.watcher.as_mut() else {
            trace!("update: no active watcher, nothing to do");
            return Ok(());
        };

        let mut added = 0usize;
        for element in host.query(&self.cfg.selector) {
            if !loader::is_eligible(host, &element)
                || self.tracked.contains(&element)
                || self.loading.contains(&element)
            {
                continue;
            }
            watcher.observe(&element);
            self.tracked.push(element);
            self.pending += 1;
            added += 1;
        }
        if added > 0 {
            debug!("update: now watching {} more element(s)", added);
        }
        Ok(())
    }

    /// Disconnect the watcher and clear tracked state. Idempotent and safe
    /// from any state. Loads already dispatched are not cancelled: they
    /// settle normally through [`Self::probe_settled`].
    pub fn destroy(&mut self) {
        self.teardown();
    }

    /// Handle one watcher notification batch. Entries are `(element,
    /// visible)`; non-visible entries and elements not currently tracked are
    /// ignored. Each visible element is deregistered before its load is
    /// issued, so a second notification can never start a second load. Once
    /// nothing remains pending the watcher is discarded.
    pub fn visibility_batch<H>(&mut self, host: &mut H, entries: &[(E, bool)])
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        for (element, visible) in entries {
            if !*visible {
                continue;
            }
            let Some(idx) = self.tracked.iter().position(|e| e == element) else {
                continue;
            };
            let element = self.tracked.remove(idx);
            self.pending -= 1;
            if let Some(watcher) = self.watcher.as_mut() {
                watcher.unobserve(&element);
            }
            self.begin_load(host, element);
        }

        if self.pending == 0 {
            if let Some(mut watcher) = self.watcher.take() {
                debug!("all tracked elements resolved, discarding watcher");
                watcher.disconnect();
            }
        }
    }

    /// Deliver the result of an asynchronous fetch probe and apply the
    /// outcome to the element. Called by the host's event loop; also called
    /// internally for elements that fail before a probe can be issued.
    pub fn probe_settled<H>(
        &mut self,
        host: &mut H,
        element: &E,
        result: Result<(), LoadError>,
    ) -> LoadOutcome
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        if let Some(idx) = self.loading.iter().position(|e| e == element) {
            self.loading.remove(idx);
        }
        let outcome = match result {
            Ok(()) => {
                loader::apply_success(host, &self.cfg, element);
                LoadOutcome::Loaded
            }
            Err(err) => {
                debug!("load failed: {err}");
                loader::apply_failure(host, &self.cfg, element);
                LoadOutcome::Failed
            }
        };
        self.hooks.fire(outcome, element);
        outcome
    }

    /// Eligible elements for this controller, in document order, excluding
    /// anything already mid-load.
    fn scan<H>(&self, host: &H) -> Vec<E>
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        host.query(&self.cfg.selector)
            .into_iter()
            .filter(|e| loader::is_eligible(host, e) && !self.loading.contains(e))
            .collect()
    }

    /// Load one element right away, bypassing visibility detection. The
    /// element is deregistered first if it was being watched. An element
    /// with no deferred reference settles immediately with the failure
    /// outcome; an element whose probe is already in flight is left alone.
    pub fn load<H>(&mut self, host: &mut H, element: E)
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        if let Some(idx) = self.tracked.iter().position(|e| *e == element) {
            self.tracked.remove(idx);
            self.pending -= 1;
            if let Some(watcher) = self.watcher.as_mut() {
                watcher.unobserve(&element);
            }
        }
        self.begin_load(host, element);
    }

    fn begin_load<H>(&mut self, host: &mut H, element: E)
    where
        H: DocumentHost<Element = E, Watcher = W>,
    {
        // At most one outstanding load per element: a second trigger while
        // the probe is in flight must not start another probe or fire the
        // hooks twice.
        if self.loading.contains(&element) {
            trace!("load already in flight, ignoring");
            return;
        }
        let request = loader::read_request(host, &element);
        if request.src.is_none() && request.srcset.is_none() {
            self.probe_settled(host, &element, Err(LoadError::NoSource));
            return;
        }
        trace!("probing deferred resource");
        self.loading.push(element.clone());
        host.start_probe(&element, request);
    }

    fn teardown(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.disconnect();
        }
        self.tracked.clear();
        self.pending = 0;
    }
}
