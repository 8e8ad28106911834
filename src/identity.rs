//! Signed-in parent and identity change notifications
//!
//! Authentication happens outside the crate. An [`IdentityProvider`] reports
//! who is signed in and notifies subscribers on every sign-in and sign-out;
//! only the application orchestrator consumes it.

use std::collections::BTreeMap;

use derive_where::derive_where;
use serde::{Deserialize, Serialize};

/// Identifier of a signed-in account
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct UserId(String);

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The signed-in parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account identifier, owner of saved quizzes
    pub id: UserId,
    /// E-mail address, possibly empty
    pub email: String,
    /// Name shown in the menu
    pub display_name: String,
}

impl Identity {
    /// Builds an identity from raw account data
    ///
    /// The display name is the full name if present, else the local part of
    /// the e-mail address, else `"User"`.
    pub fn from_account(id: impl Into<UserId>, email: Option<&str>, full_name: Option<&str>) -> Self {
        let email = email.map(str::trim).unwrap_or_default();
        let display_name = full_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or_else(|| email.split('@').next().filter(|local| !local.is_empty()))
            .unwrap_or("User")
            .to_owned();

        Self {
            id: id.into(),
            email: email.to_owned(),
            display_name,
        }
    }
}

/// Callback run on every identity change, with the new identity
pub type Listener = Box<dyn FnMut(Option<&Identity>)>;

/// Handle returned by [`IdentityProvider::subscribe`]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use = "dropping the handle makes the subscription impossible to cancel"]
pub struct Subscription(u64);

/// Source of the current identity
pub trait IdentityProvider {
    /// The currently signed-in parent, if any
    fn current(&self) -> Option<Identity>;

    /// Registers a listener for identity changes
    fn subscribe(&mut self, listener: Listener) -> Subscription;

    /// Removes a listener, returning whether it was still registered
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

/// In-process identity provider
///
/// Hosts call [`LocalIdentity::set`] when their authentication layer
/// reports a change; tests use it directly.
#[derive(Default)]
#[derive_where(Debug)]
pub struct LocalIdentity {
    current: Option<Identity>,
    #[derive_where(skip)]
    listeners: BTreeMap<u64, Listener>,
    next_subscription: u64,
}

impl LocalIdentity {
    /// Creates a provider with an initial identity
    pub fn new(current: Option<Identity>) -> Self {
        Self {
            current,
            ..Self::default()
        }
    }

    /// Replaces the identity and notifies every listener, in subscription order
    pub fn set(&mut self, identity: Option<Identity>) {
        tracing::info!(
            signed_in = identity.is_some(),
            listeners = self.listeners.len(),
            "identity changed"
        );
        self.current = identity;
        for listener in self.listeners.values_mut() {
            listener(self.current.as_ref());
        }
    }
}

impl IdentityProvider for LocalIdentity {
    fn current(&self) -> Option<Identity> {
        self.current.clone()
    }

    fn subscribe(&mut self, listener: Listener) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.insert(id, listener);
        Subscription(id)
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.remove(&subscription.0).is_some()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let identity = Identity::from_account("u1", Some("sam@example.com"), Some("Sam Lee"));
        assert_eq!(identity.display_name, "Sam Lee");

        let identity = Identity::from_account("u1", Some("sam@example.com"), Some("  "));
        assert_eq!(identity.display_name, "sam");

        let identity = Identity::from_account("u1", None, None);
        assert_eq!(identity.display_name, "User");
        assert_eq!(identity.email, "");
        assert_eq!(identity.id.to_string(), "u1");
    }

    #[test]
    fn test_listeners_are_notified_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut provider = LocalIdentity::default();

        let sink = Rc::clone(&seen);
        let subscription = provider.subscribe(Box::new(move |identity: Option<&Identity>| {
            sink.borrow_mut()
                .push(identity.map(|i| i.display_name.clone()));
        }));

        provider.set(Some(Identity::from_account("u1", None, Some("Sam"))));
        provider.set(None);
        assert_eq!(*seen.borrow(), vec![Some("Sam".to_string()), None]);

        assert!(provider.unsubscribe(subscription));
        provider.set(Some(Identity::from_account("u2", None, None)));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(
            provider.current().map(|i| i.id),
            Some(UserId::from("u2"))
        );
    }

    #[test]
    fn test_unsubscribe_twice() {
        let mut provider = LocalIdentity::new(None);
        let first = provider.subscribe(Box::new(|_: Option<&Identity>| {}));
        let second = provider.subscribe(Box::new(|_: Option<&Identity>| {}));
        assert_ne!(first, second);
        assert!(provider.unsubscribe(first));
        let stale = Subscription(0);
        assert!(!provider.unsubscribe(stale));
        assert!(provider.unsubscribe(second));
    }

    #[test]
    fn test_debug_leaves_out_listeners() {
        let mut provider = LocalIdentity::new(Some(Identity::from_account("u1", None, Some("Sam"))));
        let _subscription = provider.subscribe(Box::new(|_: Option<&Identity>| {}));
        let debug = format!("{provider:?}");
        assert!(debug.starts_with("LocalIdentity"));
        assert!(debug.contains("Sam"));
        assert!(debug.contains("next_subscription: 1"));
        assert!(!debug.contains("listeners"));
    }
}
