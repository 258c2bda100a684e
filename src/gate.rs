//! Session freshness gate.
//!
//! Decides whether a page load may proceed. A load is admitted only when a
//! token exists *and* the page-scoped freshness flag was armed by a login
//! (or soft re-entry) since the last admission. Admission consumes the flag,
//! so a reload in the same page instance is denied.
//!
//! The gate is an explicit state machine: [`transition`] is a pure function
//! of the current [`GateState`] and an [`Event`], and
//! [`FreshnessGate::evaluate`] drives it against a [`SessionStore`].
//! The flag is observed through [`SessionStore::take`], so checking and
//! clearing it is one atomic step and two concurrent evaluations on the
//! same store admit at most one page.

use std::sync::Arc;

use log::debug;

use crate::config;
use crate::error::{DashboardError, Result};
use crate::session::{self, Identity, Namespace, SessionStore, FRESH_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Start,
    NoToken,
    /// Token found; flag not yet checked.
    TokenPresent,
    TokenNoFlag,
    /// Flag observed, and removed by the same read.
    TokenFlagPresent,
    Consumed,
    Granted,
    Denied(Denial),
}

impl GateState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Granted | Self::Denied(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TokenChecked { present: bool },
    FlagTaken { present: bool },
    /// Unconditional step out of a state that needs no further reading.
    Advance,
}

/// Why a page load was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No token at all: first-time login.
    Unauthenticated,
    /// Token present but the page was not entered through a login action.
    UnverifiedSession,
}

impl Denial {
    pub fn redirect(self) -> &'static str {
        config::LOGIN_PAGE
    }

    /// The login page can offer "continue with saved token" instead of a full sign-in.
    pub fn allows_soft_reentry(self) -> bool {
        self == Self::UnverifiedSession
    }
}

impl From<Denial> for DashboardError {
    fn from(d: Denial) -> Self {
        match d {
            Denial::Unauthenticated => DashboardError::Unauthenticated,
            Denial::UnverifiedSession => DashboardError::UnverifiedSession,
        }
    }
}

/// Returns `None` when `event` is not a legal input in `state`.
pub fn transition(state: GateState, event: Event) -> Option<GateState> {
    use GateState::*;
    match (state, event) {
        (Start, Event::TokenChecked { present: false }) => Some(NoToken),
        (Start, Event::TokenChecked { present: true }) => Some(TokenPresent),
        (TokenPresent, Event::FlagTaken { present: false }) => Some(TokenNoFlag),
        (TokenPresent, Event::FlagTaken { present: true }) => Some(TokenFlagPresent),
        (NoToken, Event::Advance) => Some(Denied(Denial::Unauthenticated)),
        (TokenNoFlag, Event::Advance) => Some(Denied(Denial::UnverifiedSession)),
        (TokenFlagPresent, Event::Advance) => Some(Consumed),
        (Consumed, Event::Advance) => Some(Granted),
        _ => None,
    }
}

/// What the presentation layer gets once a load is admitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub token: String,
    pub identity: Option<Identity>,
}

impl Grant {
    pub fn greeting(&self) -> Option<String> {
        self.identity
            .as_ref()
            .map(|id| format!("Hi, {}! 👋", id.first_name()))
    }

    pub fn access_code(&self) -> Option<&str> {
        self.identity.as_ref().and_then(|id| id.access_code.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Granted(Grant),
    Denied(Denial),
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

pub struct FreshnessGate {
    store: Arc<dyn SessionStore>,
}

impl FreshnessGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Evaluate one page load.
    pub fn evaluate(&self) -> Result<Admission> {
        let mut state = GateState::Start;
        let mut token = None;

        loop {
            let event = match state {
                GateState::Start => {
                    token = session::token(self.store.as_ref())?;
                    Event::TokenChecked {
                        present: token.is_some(),
                    }
                }
                GateState::TokenPresent => {
                    let flag = self.store.take(Namespace::Page, FRESH_KEY)?;
                    Event::FlagTaken {
                        present: flag.as_deref().is_some_and(session::is_fresh),
                    }
                }
                GateState::Granted => {
                    let token = token.take().ok_or(DashboardError::Unauthenticated)?;
                    let identity = session::identity(self.store.as_ref())?;
                    return Ok(Admission::Granted(Grant { token, identity }));
                }
                GateState::Denied(denial) => {
                    debug!("Page load denied ({:?}); redirecting to {}", denial, denial.redirect());
                    return Ok(Admission::Denied(denial));
                }
                _ => Event::Advance,
            };

            let next = transition(state, event).ok_or_else(|| {
                DashboardError::InvalidArgument(format!(
                    "No gate transition from {:?} on {:?}",
                    state, event
                ))
            })?;
            debug!("Gate {:?} --{:?}--> {:?}", state, event, next);
            state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GateState::*;

    #[test]
    fn start_branches_on_token() {
        assert_eq!(transition(Start, Event::TokenChecked { present: false }), Some(NoToken));
        assert_eq!(transition(Start, Event::TokenChecked { present: true }), Some(TokenPresent));
    }

    #[test]
    fn token_present_branches_on_flag() {
        assert_eq!(
            transition(TokenPresent, Event::FlagTaken { present: false }),
            Some(TokenNoFlag)
        );
        assert_eq!(
            transition(TokenPresent, Event::FlagTaken { present: true }),
            Some(TokenFlagPresent)
        );
    }

    #[test]
    fn denials_carry_reason() {
        assert_eq!(
            transition(NoToken, Event::Advance),
            Some(Denied(Denial::Unauthenticated))
        );
        assert_eq!(
            transition(TokenNoFlag, Event::Advance),
            Some(Denied(Denial::UnverifiedSession))
        );
    }

    #[test]
    fn flag_path_goes_through_consumed() {
        assert_eq!(transition(TokenFlagPresent, Event::Advance), Some(Consumed));
        assert_eq!(transition(Consumed, Event::Advance), Some(Granted));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for event in [
            Event::Advance,
            Event::TokenChecked { present: true },
            Event::FlagTaken { present: true },
        ] {
            assert_eq!(transition(Granted, event), None);
            assert_eq!(transition(Denied(Denial::Unauthenticated), event), None);
        }
        assert!(Granted.is_terminal());
        assert!(!Consumed.is_terminal());
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        assert_eq!(transition(Start, Event::FlagTaken { present: true }), None);
        assert_eq!(transition(Start, Event::Advance), None);
        assert_eq!(transition(TokenPresent, Event::Advance), None);
    }

    #[test]
    fn only_unverified_session_offers_soft_reentry() {
        assert!(Denial::UnverifiedSession.allows_soft_reentry());
        assert!(!Denial::Unauthenticated.allows_soft_reentry());
        assert_eq!(Denial::Unauthenticated.redirect(), config::LOGIN_PAGE);
    }
}
