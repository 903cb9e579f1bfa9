//! Display components
//!
//! A component turns props into a [`UserCard`]. The problematic display is a
//! bare [`UserDisplay`] over the naive lookup and runs on every redraw
//! request; the optimized display wraps a memoized-lookup [`UserDisplay`] in
//! the [`Memoized`] gate so unchanged props never reach it.

pub mod memoized;

use serde::Serialize;
use std::fmt::Debug;
use std::rc::Rc;

use crate::lookup::{MemoLookup, NaiveLookup, UserLookup};
use crate::users::{User, UserId};
pub use memoized::Memoized;

pub trait Component {
    type Props: Clone + PartialEq + Debug;
    type Output: Clone;

    fn name(&self) -> &'static str;

    /// One execution of the rendering logic
    fn render(&mut self, props: &Self::Props) -> Self::Output;

    /// Output shown when a gate hands back `previous` instead of rendering
    fn reused(&self, previous: &Self::Output) -> Self::Output {
        previous.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDisplayProps {
    pub user_id: UserId,
}

/// How a render's lookup result relates to the previous render's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceIdentity {
    /// A different allocation than last time (or the first render)
    New,
    /// The very same `Rc` as last time
    Stable,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCard {
    pub title: String,
    pub summary: String,
    pub render_count: u64,
    pub reference: ReferenceIdentity,
}

pub struct UserDisplay<L> {
    name: &'static str,
    label: &'static str,
    lookup: L,
    render_count: u64,
    last_user: Option<Rc<User>>,
}

pub type ProblematicDisplay = UserDisplay<NaiveLookup>;
pub type OptimizedDisplay = Memoized<UserDisplay<MemoLookup>>;

impl ProblematicDisplay {
    pub fn problematic() -> Self {
        UserDisplay::new("ProblematicUserDisplay", "Problematic", NaiveLookup)
    }
}

impl OptimizedDisplay {
    pub fn optimized() -> Self {
        Memoized::new(UserDisplay::new(
            "OptimizedUserDisplay",
            "Optimized",
            MemoLookup::new(),
        ))
    }

    pub fn render_count(&self) -> u64 {
        self.inner().render_count()
    }
}

impl<L: UserLookup> UserDisplay<L> {
    pub fn new(name: &'static str, label: &'static str, lookup: L) -> Self {
        Self {
            name,
            label,
            lookup,
            render_count: 0,
            last_user: None,
        }
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}

impl<L: UserLookup> Component for UserDisplay<L> {
    type Props = UserDisplayProps;
    type Output = UserCard;

    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&mut self, props: &UserDisplayProps) -> UserCard {
        self.render_count += 1;

        let user = self.lookup.find(props.user_id);
        let reference = match (&user, &self.last_user) {
            (None, _) => ReferenceIdentity::Missing,
            (Some(current), Some(previous)) if Rc::ptr_eq(current, previous) => {
                ReferenceIdentity::Stable
            }
            (Some(_), _) => ReferenceIdentity::New,
        };

        tracing::info!(target: "render", "{} rendered {} times", self.name, self.render_count);

        let summary = user
            .as_deref()
            .map(User::summary)
            .unwrap_or_else(|| "User not found".to_string());
        self.last_user = user;

        UserCard {
            title: format!("{} Component (Render count: {})", self.label, self.render_count),
            summary,
            render_count: self.render_count,
            reference,
        }
    }

    /// A reused card still points at the record it was rendered with
    fn reused(&self, previous: &UserCard) -> UserCard {
        let reference = match previous.reference {
            ReferenceIdentity::Missing => ReferenceIdentity::Missing,
            ReferenceIdentity::New | ReferenceIdentity::Stable => ReferenceIdentity::Stable,
        };
        UserCard { reference, ..previous.clone() }
    }
}
