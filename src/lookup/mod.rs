//! User lookup services
//!
//! Both variants resolve an id against the fixed table. They differ only in
//! what they hand back: the naive one allocates a fresh `Rc` on every call,
//! the memoized one keeps returning the same `Rc` while the id is unchanged.

pub mod memo;

use std::rc::Rc;

use crate::users::{self, User, UserId};
use memo::Memo;

pub trait UserLookup {
    /// Short name used in trace output
    fn label(&self) -> &'static str;

    fn find(&mut self, id: UserId) -> Option<Rc<User>>;
}

fn search(id: UserId) -> Option<Rc<User>> {
    users::find_user(id).map(|user| Rc::new(user.clone()))
}

fn describe(result: &Option<Rc<User>>) -> String {
    match result {
        Some(user) => user.summary(),
        None => "not found".to_string(),
    }
}

/// Searches on every call
#[derive(Debug, Default)]
pub struct NaiveLookup;

impl UserLookup for NaiveLookup {
    fn label(&self) -> &'static str {
        "find"
    }

    fn find(&mut self, id: UserId) -> Option<Rc<User>> {
        tracing::debug!(target: "lookup", "{} called with user id {}", self.label(), id);
        let result = search(id);
        tracing::debug!(target: "lookup", "{} result: {}", self.label(), describe(&result));
        result
    }
}

/// Searches only when the id differs from the previous call
#[derive(Debug, Default)]
pub struct MemoLookup {
    memo: Memo<UserId, Option<Rc<User>>>,
}

impl MemoLookup {
    pub fn new() -> Self {
        Self { memo: Memo::new() }
    }

    /// Number of linear searches actually performed
    pub fn searches(&self) -> u64 {
        self.memo.computations()
    }
}

impl UserLookup for MemoLookup {
    fn label(&self) -> &'static str {
        "find_memoized"
    }

    fn find(&mut self, id: UserId) -> Option<Rc<User>> {
        tracing::debug!(target: "lookup", "{} called with user id {}", self.label(), id);
        let result = self.memo.get_or_compute(id, |id| search(*id)).clone();
        tracing::debug!(target: "lookup", "{} memoized result: {}", self.label(), describe(&result));
        result
    }
}
