//! Headless scripted runs: apply a list of steps to a fresh controller and
//! snapshot both components after each one.

use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

use crate::app::App;
use crate::display::UserCard;
use crate::users::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Force,
    Select(UserId),
}

#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("unknown step '{0}' (expected 'force' or 'select=ID')")]
    Unknown(String),

    #[error("step '{0}' is missing a user id")]
    MissingId(String),

    #[error("invalid user id in step '{step}': {source}")]
    BadId {
        step: String,
        #[source]
        source: ParseIntError,
    },
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let step = s.trim();
        let (name, arg) = match step.split_once(&['=', ':'][..]) {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (step, None),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("force" | "f", None) => Ok(Step::Force),
            ("select" | "s", Some("")) | ("select" | "s", None) => {
                Err(StepError::MissingId(step.to_string()))
            }
            ("select" | "s", Some(id)) => id
                .parse()
                .map(Step::Select)
                .map_err(|source| StepError::BadId {
                    step: step.to_string(),
                    source,
                }),
            _ => Err(StepError::Unknown(step.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Force => write!(f, "force"),
            Step::Select(id) => write!(f, "select={}", id),
        }
    }
}

/// Parse a comma-separated step list; blank entries are ignored
pub fn parse_steps(script: &str) -> Result<Vec<Step>, StepError> {
    script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Step>())
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub step: String,
    pub selected_user: UserId,
    pub counter: u64,
    pub controller_renders: u64,
    pub redrawn: bool,
    pub problematic: UserCard,
    pub optimized: UserCard,
}

impl Snapshot {
    fn capture(step: impl Into<String>, app: &App, redrawn: bool) -> Self {
        Self {
            step: step.into(),
            selected_user: app.selected_user,
            counter: app.counter,
            controller_renders: app.render_count,
            redrawn,
            problematic: app.problematic_card.clone(),
            optimized: app.optimized_card.clone(),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] user={} counter={} controller renders={}{}",
            self.step,
            self.selected_user,
            self.counter,
            self.controller_renders,
            if self.redrawn { "" } else { " (no redraw)" }
        )?;
        for card in [&self.problematic, &self.optimized] {
            writeln!(f, "  {}", card.title)?;
            writeln!(f, "    {}", card.summary)?;
        }
        Ok(())
    }
}

/// Run the steps against `app`, returning the initial snapshot followed by
/// one per step
pub fn run(app: &mut App, steps: &[Step]) -> Vec<Snapshot> {
    let mut snapshots = Vec::with_capacity(steps.len() + 1);
    snapshots.push(Snapshot::capture("initial", app, true));

    for step in steps {
        let redrawn = match *step {
            Step::Force => {
                app.force_rerender();
                true
            }
            Step::Select(id) => app.select_user(id),
        };
        snapshots.push(Snapshot::capture(step.to_string(), app, redrawn));
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_parse_steps() {
        let steps = parse_steps("force, select=2 ,s:99,,F").unwrap();
        assert_eq!(
            steps,
            vec![Step::Force, Step::Select(2), Step::Select(99), Step::Force]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "jump".parse::<Step>(),
            Err(StepError::Unknown("jump".to_string()))
        );
        assert_eq!(
            "select".parse::<Step>(),
            Err(StepError::MissingId("select".to_string()))
        );
        assert!(matches!(
            "select=bob".parse::<Step>(),
            Err(StepError::BadId { .. })
        ));
        assert!(matches!(
            "force=3".parse::<Step>(),
            Err(StepError::Unknown(_))
        ));
        assert!(parse_steps("force,select=-1").is_err());
    }

    #[test]
    fn test_run_force_scenario() {
        let mut app = App::new(&AppConfig::default(), None);
        let steps = parse_steps("force,force,force").unwrap();
        let snapshots = run(&mut app, &steps);

        assert_eq!(snapshots.len(), 4);
        let last = snapshots.last().unwrap();
        assert_eq!(last.problematic.render_count, 4);
        assert_eq!(last.optimized.render_count, 1);
        assert_eq!(last.counter, 3);
    }

    #[test]
    fn test_run_reselect_scenario() {
        let mut app = App::new(&AppConfig::default(), None);
        let snapshots = run(&mut app, &[Step::Select(2), Step::Select(2)]);

        assert!(snapshots[1].redrawn);
        assert!(!snapshots[2].redrawn);
        assert_eq!(snapshots[2].optimized.render_count, 2);
        assert_eq!(snapshots[2].optimized.summary, "User: Bob (user) - Inactive");

        let text = snapshots[2].to_string();
        assert!(text.starts_with("[select=2] user=2"));
        assert!(text.contains("(no redraw)"));
    }

    #[test]
    fn test_snapshot_json() {
        let mut app = App::new(&AppConfig::default(), None);
        let snapshots = run(&mut app, &[Step::Select(99)]);
        let json = serde_json::to_value(&snapshots[1]).unwrap();

        assert_eq!(json["selected_user"], 99);
        assert_eq!(json["problematic"]["summary"], "User not found");
        assert_eq!(json["optimized"]["reference"], "missing");
    }
}
