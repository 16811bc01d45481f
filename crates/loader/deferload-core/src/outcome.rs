//! Outcome contract.
//!
//! Load failure is an expected, common result, so it is modelled as a tagged
//! outcome value rather than exception-like control flow. Hooks fire
//! synchronously once the outcome has been applied to the element; panics
//! inside a hook are not caught.

/// What happened to one element's deferred load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Resource confirmed loadable; references applied, loaded class added.
    Loaded,
    /// Probe failed or the element carried no resource reference; error
    /// class added. The element is still marked resolved and never retried.
    Failed,
}

type Hook<E> = Box<dyn FnMut(&E)>;

/// Optional per-outcome callbacks, invoked with the affected element.
pub struct Hooks<E> {
    pub on_loaded: Option<Hook<E>>,
    pub on_error: Option<Hook<E>>,
}

impl<E> Default for Hooks<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E> Hooks<E> {
    pub fn none() -> Self {
        Self {
            on_loaded: None,
            on_error: None,
        }
    }

    pub fn on_loaded(mut self, f: impl FnMut(&E) + 'static) -> Self {
        self.on_loaded = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&E) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn fire(&mut self, outcome: LoadOutcome, element: &E) {
        let hook = match outcome {
            LoadOutcome::Loaded => self.on_loaded.as_mut(),
            LoadOutcome::Failed => self.on_error.as_mut(),
        };
        if let Some(f) = hook {
            f(element);
        }
    }
}

impl<E> std::fmt::Debug for Hooks<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_loaded", &self.on_loaded.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
