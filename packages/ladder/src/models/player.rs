use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::credential::Credential;
use crate::rating::DEFAULT_RATING;

/// A registered player. Two values are the same player when their logins match.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    login: String,
    email: String,
    #[serde(skip)]
    credential: Credential,
    rating: f64,
}

impl Player {
    pub fn new(login: String, secret: &str, email: String) -> Self {
        Player {
            login,
            email,
            credential: Credential::derive(secret),
            rating: DEFAULT_RATING,
        }
    }

    /// Rebuilds a player from stored columns.
    pub fn from_parts(login: String, email: String, credential: Credential, rating: f64) -> Self {
        Player {
            login,
            email,
            credential,
            rating,
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Replaces the credential with one derived from `secret`.
    pub fn set_secret(&mut self, secret: &str) {
        self.credential = Credential::derive(secret);
    }

    /// In-memory only; persist with `PlayerService::save`.
    pub fn adjust_rating(&mut self, delta: f64) {
        self.rating += delta;
    }

    pub(crate) fn set_rating(&mut self, rating: f64) {
        self.rating = rating;
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.login == other.login
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.login.hash(state);
    }
}
