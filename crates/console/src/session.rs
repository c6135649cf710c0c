//! Session controller: the single owner of authentication and view state.
//!
//! ```text
//!                login_succeeded()
//!  Unauthenticated ───────────────────▶ Authenticated(role)
//!        ▲                                   │
//!        └───── logout() / SessionSignal::Expired
//! ```
//!
//! The controller is mutated only through `&mut self` by its owner. Network calls run
//! elsewhere and may resolve in any order; each one carries a [`RequestTicket`] bound to
//! the session epoch, and results settled against an outdated epoch are dropped.

use std::sync::Arc;

use clubdesk_auth::{GateDecision, Role, View, gate, read_claims};
use clubdesk_client::{ApiError, ApiResult, CredentialStore};
use clubdesk_core::{Adherent, AdherentId, Entity, Page};
use clubdesk_events::{SessionSignal, SignalBus, Subscription};

/// Observable session state.
///
/// When `authenticated` is false, `role`, `subject` and `selected` are `None` and
/// `current_view` is the landing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub role: Option<Role>,
    pub subject: Option<String>,
    pub current_view: View,
    pub selected: Option<AdherentId>,
}

impl Session {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            role: None,
            subject: None,
            current_view: View::landing(),
            selected: None,
        }
    }
}

/// What the front-end should draw right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Login entry.
    Login,
    Show(View),
    AccessDenied { back_to: View },
    /// Nothing at all.
    Hidden,
}

/// Proof that a request was issued during a given session epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    epoch: u64,
}

/// Outcome of handing a request result back to the controller.
#[derive(Debug)]
pub enum Settled<T> {
    /// Issued and settled in the current session.
    Current(T),
    Failed(ApiError),
    /// Issued before the latest logout or expiry; dropped.
    Stale,
    /// The API rejected the credential; the session has been reset.
    Expired,
}

/// Data only an authenticated session may hold.
#[derive(Debug, Default)]
struct ViewData {
    members: Option<Page<Adherent>>,
    details: Option<Adherent>,
}

pub struct SessionController {
    session: Session,
    credentials: Arc<dyn CredentialStore>,
    expiry: Subscription<SessionSignal>,
    epoch: u64,
    data: ViewData,
}

impl SessionController {
    /// Register the expiry observer and restore the session from the credential store.
    ///
    /// A stored credential whose claims do not decode is cleared.
    pub fn new<B>(credentials: Arc<dyn CredentialStore>, signals: &B) -> Self
    where
        B: SignalBus<SessionSignal> + ?Sized,
    {
        let mut controller = Self {
            session: Session::anonymous(),
            credentials,
            expiry: signals.subscribe(),
            epoch: 0,
            data: ViewData::default(),
        };
        controller.restore();
        controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    pub fn role(&self) -> Option<Role> {
        self.session.role
    }

    /// Adopt the credential a successful login or registration just stored.
    ///
    /// Returns `false` (and stays unauthenticated) if that credential does not decode.
    pub fn login_succeeded(&mut self) -> bool {
        // Anything still queued predates this login.
        self.expiry.drain();
        self.session = Session::anonymous();
        self.data = ViewData::default();
        self.epoch += 1;
        self.restore()
    }

    /// Explicit logout: forget the credential and every authenticated-only datum.
    pub fn logout(&mut self) {
        if self.session.authenticated {
            tracing::info!(subject = ?self.session.subject, "logged out");
        }
        self.reset();
    }

    /// Apply pending expiry signals. Returns `true` if the session was reset.
    pub fn pump_signals(&mut self) -> bool {
        let expired = self
            .expiry
            .drain()
            .into_iter()
            .any(|signal| matches!(signal, SessionSignal::Expired));

        expired && self.expire()
    }

    pub fn navigate(&mut self, view: View) {
        if !self.session.authenticated {
            tracing::debug!(%view, "navigation ignored while unauthenticated");
            return;
        }
        self.session.current_view = view;
        self.session.selected = None;
        self.data.details = None;
    }

    pub fn select(&mut self, id: AdherentId) {
        if !self.session.authenticated {
            return;
        }
        if self.session.selected != Some(id) {
            self.data.details = None;
        }
        self.session.selected = Some(id);
        self.session.current_view = View::Details;
    }

    pub fn create_new(&mut self) {
        self.navigate(View::Form);
    }

    /// Switch the selection to editing. Returns `false` when nothing is selected.
    pub fn edit(&mut self) -> bool {
        if !self.session.authenticated || self.session.selected.is_none() {
            return false;
        }
        self.session.current_view = View::Edit;
        true
    }

    pub fn close_details(&mut self) {
        self.navigate(View::List);
    }

    pub fn form_finished(&mut self) {
        self.navigate(View::List);
    }

    pub fn cancel_edit(&mut self) {
        if !self.session.authenticated {
            return;
        }
        self.session.current_view = View::Details;
    }

    /// Ticket for a request about to be issued.
    pub fn begin_request(&self) -> RequestTicket {
        RequestTicket { epoch: self.epoch }
    }

    /// Hand back the result of a request.
    ///
    /// A `SessionExpired` error resets the session even if the expiry signal has not
    /// been pumped yet. Results issued under an older epoch, or arriving while
    /// unauthenticated, are dropped.
    pub fn settle<T>(&mut self, ticket: RequestTicket, result: ApiResult<T>) -> Settled<T> {
        self.pump_signals();

        if let Err(ApiError::SessionExpired) = result {
            self.expire();
            return Settled::Expired;
        }

        if ticket.epoch != self.epoch || !self.session.authenticated {
            tracing::debug!(
                ticket = ticket.epoch,
                epoch = self.epoch,
                "discarding result of an outdated request"
            );
            return Settled::Stale;
        }

        match result {
            Ok(value) => Settled::Current(value),
            Err(err) => Settled::Failed(err),
        }
    }

    /// Settle a member list and keep it as the current list.
    pub fn accept_members(
        &mut self,
        ticket: RequestTicket,
        result: ApiResult<Page<Adherent>>,
    ) -> Settled<&Page<Adherent>> {
        match self.settle(ticket, result) {
            Settled::Current(page) => Settled::Current(&*self.data.members.insert(page)),
            other => other.discard(),
        }
    }

    /// Settle a member record and keep it as the details of the selection.
    pub fn accept_details(
        &mut self,
        ticket: RequestTicket,
        result: ApiResult<Adherent>,
    ) -> Settled<&Adherent> {
        match self.settle(ticket, result) {
            // The selection moved on while the request was in flight.
            Settled::Current(adherent)
                if self.session.selected.is_some_and(|id| id != adherent.id()) =>
            {
                Settled::Stale
            }
            Settled::Current(adherent) => Settled::Current(&*self.data.details.insert(adherent)),
            other => other.discard(),
        }
    }

    pub fn members(&self) -> Option<&Page<Adherent>> {
        self.data.members.as_ref()
    }

    pub fn details(&self) -> Option<&Adherent> {
        self.data.details.as_ref()
    }

    /// Compose authentication, the view gate and the selection into a screen.
    pub fn screen(&self) -> Screen {
        if !self.session.authenticated {
            return Screen::Login;
        }

        let view = self.session.current_view;
        match gate(view, self.session.role) {
            GateDecision::Allow => {
                let needs_selection = matches!(view, View::Details | View::Edit);
                if needs_selection && self.session.selected.is_none() {
                    Screen::Hidden
                } else {
                    Screen::Show(view)
                }
            }
            GateDecision::AccessDenied { back_to } => Screen::AccessDenied { back_to },
            GateDecision::Hidden => Screen::Hidden,
        }
    }

    fn restore(&mut self) -> bool {
        let Some(token) = self.credentials.get() else {
            return false;
        };

        let Some(claims) = read_claims(Some(&token)) else {
            tracing::warn!("stored credential does not decode; clearing it");
            if let Err(err) = self.credentials.clear() {
                tracing::warn!(error = %err, "failed to clear undecodable credential");
            }
            return false;
        };

        self.session = Session {
            authenticated: true,
            role: claims.role(),
            subject: claims.sub,
            current_view: View::landing(),
            selected: None,
        };
        tracing::info!(subject = ?self.session.subject, role = ?self.session.role, "session authenticated");
        true
    }

    /// Reset on expiry. A no-op while unauthenticated.
    fn expire(&mut self) -> bool {
        if !self.session.authenticated {
            return false;
        }
        tracing::info!(subject = ?self.session.subject, "session expired");
        self.reset();
        true
    }

    fn reset(&mut self) {
        if let Err(err) = self.credentials.clear() {
            tracing::warn!(error = %err, "failed to clear credential");
        }
        self.expiry.drain();
        self.session = Session::anonymous();
        self.data = ViewData::default();
        self.epoch += 1;
    }
}

impl<T> Settled<T> {
    /// Re-type an outcome that carries no payload.
    fn discard<U>(self) -> Settled<U> {
        match self {
            Settled::Current(_) | Settled::Stale => Settled::Stale,
            Settled::Failed(err) => Settled::Failed(err),
            Settled::Expired => Settled::Expired,
        }
    }
}

impl core::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &self.session)
            .field("epoch", &self.epoch)
            .finish()
    }
}
