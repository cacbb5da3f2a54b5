//! Navigation guard: ties route changes to the session lifecycle.
//!
//! Every navigation runs in a fixed order:
//!
//! 1. resolve the destination
//! 2. `deactivate()` the outgoing game, if any
//! 3. `activate()` the destination game, if it is a game route
//!
//! The guard borrows the controller mutably for its whole life, so nothing
//! else can start or stop a session behind its back.

use log::{debug, warn};

use super::routes::{normalize, RouteTable, RouteTarget, NOT_FOUND};
use crate::core::Result;
use crate::session::{SessionController, SessionHandle, SessionSummary};

/// What one navigation did.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Path before the navigation (`None` on the first one).
    pub from: Option<String>,
    /// Normalized destination path.
    pub to: String,
    pub target: RouteTarget,
    pub params: Vec<(String, String)>,
    /// Summary of the game that was torn down.
    pub stopped: Option<SessionSummary>,
    /// Game that was started.
    pub started: Option<SessionHandle>,
}

impl Transition {
    /// Whether the navigation changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from.as_deref() == Some(self.to.as_str())
            && self.stopped.is_none()
            && self.started.is_none()
    }
}

/// Router hook holding an explicit reference to the session controller.
pub struct NavigationGuard<'c> {
    routes: RouteTable,
    controller: &'c mut SessionController,
    current: Option<(String, RouteTarget)>,
}

impl<'c> NavigationGuard<'c> {
    /// Bind `routes` to `controller`, rejecting game routes with no factory.
    pub fn new(routes: RouteTable, controller: &'c mut SessionController) -> Result<Self> {
        routes.validate(controller.registry())?;
        Ok(Self {
            routes,
            controller,
            current: None,
        })
    }

    /// Navigate to the table's initial path.
    pub fn enter(&mut self) -> Result<Transition> {
        let initial = self.routes.initial_path().to_string();
        self.navigate(&initial)
    }

    /// Move to `path`, stopping the outgoing game before starting the next.
    ///
    /// Navigating to the current path changes nothing, unless it is a game
    /// route whose game is not running; then the game is started again. If
    /// the destination game fails to start, the guard still records the new
    /// path and the error is returned; no session is left running.
    pub fn navigate(&mut self, path: &str) -> Result<Transition> {
        let to = normalize(path);
        let from = self.current.as_ref().map(|(p, _)| p.clone());

        if let Some((current_path, target)) = &self.current {
            let running = self.controller.active_variant();
            let settled = target.game().is_none() || target.game() == running;
            if *current_path == to && settled {
                debug!("navigation: already at {}", to);
                return Ok(Transition {
                    from,
                    to,
                    target: target.clone(),
                    params: Vec::new(),
                    stopped: None,
                    started: None,
                });
            }
        }

        let (target, params) = match self.routes.resolve(&to) {
            Some(m) => (m.target, m.params),
            None => (RouteTarget::page(NOT_FOUND), Vec::new()),
        };

        let stopped = self.controller.deactivate();
        self.current = Some((to.clone(), target.clone()));
        debug!("navigation: {} -> {}", from.as_deref().unwrap_or("(none)"), to);

        let started = match target.game() {
            Some(variant) => match self.controller.activate(variant) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!("navigation: could not enter {}: {}", to, err);
                    return Err(err);
                }
            },
            None => None,
        };

        Ok(Transition {
            from,
            to,
            target,
            params,
            stopped,
            started,
        })
    }

    /// Tear down the running game, as when the application closes.
    pub fn leave(&mut self) -> Option<SessionSummary> {
        self.current = None;
        self.controller.deactivate()
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&str> {
        self.current.as_ref().map(|(p, _)| p.as_str())
    }

    #[must_use]
    pub fn current_target(&self) -> Option<&RouteTarget> {
        self.current.as_ref().map(|(_, t)| t)
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &*self.controller
    }

    /// Mutable access for frame and input driving.
    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut *self.controller
    }
}
