use super::Component;

/// Re-render suppression gate around any [`Component`].
///
/// Remembers the props and output of the last execution. A render request
/// with equal props returns the remembered output and never reaches the
/// wrapped component.
pub struct Memoized<C: Component> {
    inner: C,
    last: Option<(C::Props, C::Output)>,
    skipped: u64,
}

impl<C: Component> Memoized<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last: None,
            skipped: 0,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Render requests answered without running the wrapped component
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<C: Component> Component for Memoized<C> {
    type Props = C::Props;
    type Output = C::Output;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn reused(&self, previous: &Self::Output) -> Self::Output {
        self.inner.reused(previous)
    }

    fn render(&mut self, props: &Self::Props) -> Self::Output {
        if let Some((last_props, output)) = &self.last {
            if last_props == props {
                self.skipped += 1;
                tracing::debug!(
                    target: "memo",
                    "{} props unchanged ({:?}), render skipped",
                    self.inner.name(),
                    props
                );
                return self.inner.reused(output);
            }
        }

        tracing::debug!(target: "memo", "{} props changed to {:?}, rendering", self.inner.name(), props);
        let output = self.inner.render(props);
        self.last = Some((props.clone(), output.clone()));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts executions and echoes its props
    struct Echo {
        runs: u32,
    }

    impl Component for Echo {
        type Props = u32;
        type Output = String;

        fn name(&self) -> &'static str {
            "Echo"
        }

        fn render(&mut self, props: &u32) -> String {
            self.runs += 1;
            format!("{} (run {})", props, self.runs)
        }
    }

    #[test]
    fn test_equal_props_skip_inner_render() {
        let mut echo = Memoized::new(Echo { runs: 0 });
        assert_eq!(echo.render(&7), "7 (run 1)");
        assert_eq!(echo.render(&7), "7 (run 1)");
        assert_eq!(echo.render(&7), "7 (run 1)");
        assert_eq!(echo.inner().runs, 1);
        assert_eq!(echo.skipped(), 2);
    }

    #[test]
    fn test_changed_props_render_again() {
        let mut echo = Memoized::new(Echo { runs: 0 });
        echo.render(&1);
        assert_eq!(echo.render(&2), "2 (run 2)");
        assert_eq!(echo.render(&1), "1 (run 3)");
        assert_eq!(echo.skipped(), 0);
    }

    #[test]
    fn test_gates_compose() {
        let mut echo = Memoized::new(Memoized::new(Echo { runs: 0 }));
        echo.render(&3);
        echo.render(&3);
        assert_eq!(echo.inner().inner().runs, 1);
        assert_eq!(echo.name(), "Echo");
    }
}
