use std::future::Future;
use std::time::Duration;

use stratus_core::{Error, Lifecycle, Result};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{NotFoundPolicy, TargetStates, WaiterConfig};

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation<T> {
    Found(T),
    Gone,
}

/// How a completed wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The resource matched the target.
    Reached(T),
    /// The resource disappeared under [`NotFoundPolicy::Succeed`].
    Gone,
}

impl<T> WaitOutcome<T> {
    pub fn into_resource(self) -> Option<T> {
        match self {
            WaitOutcome::Reached(resource) => Some(resource),
            WaitOutcome::Gone => None,
        }
    }
}

/// A finished wait together with how long it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waited<T> {
    pub outcome: WaitOutcome<T>,
    pub attempts: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    Issued,
    Polling,
    Succeeded,
    TimedOut,
    Failed,
}

impl WaitPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::TimedOut | Self::Failed)
    }
}

/// Drives one wait from `Issued` to a terminal phase.
#[derive(Debug)]
pub struct Waiter {
    config: WaiterConfig,
    target: String,
    policy: NotFoundPolicy,
    phase: WaitPhase,
    attempts: u32,
    last_state: Option<String>,
}

impl Waiter {
    /// `target` names what is being waited for in logs and timeout errors.
    pub fn new(config: WaiterConfig, target: impl Into<String>, policy: NotFoundPolicy) -> Self {
        Self {
            config,
            target: target.into(),
            policy,
            phase: WaitPhase::Issued,
            attempts: 0,
            last_state: None,
        }
    }

    pub fn phase(&self) -> WaitPhase {
        self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_state(&self) -> Option<&str> {
        self.last_state.as_deref()
    }

    /// Poll until `done` accepts the observed resource.
    ///
    /// The first poll happens immediately. Poll errors end the wait, except
    /// not-found errors under [`NotFoundPolicy::Succeed`], which complete it
    /// with [`WaitOutcome::Gone`].
    pub async fn wait_until<T, F, Fut, P>(&mut self, mut poll: F, mut done: P) -> Result<Waited<T>>
    where
        T: Lifecycle,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observation<T>>>,
        P: FnMut(&T) -> bool,
    {
        if self.phase.is_terminal() {
            return Err(Error::InvalidInput(format!(
                "waiter for {} already finished",
                self.target
            )));
        }
        self.config.validate()?;

        let started = Instant::now();
        let deadline = started + self.config.max_wait;
        let mut interval = self.config.first_interval();
        self.phase = WaitPhase::Polling;

        loop {
            self.attempts += 1;
            let observation = match poll().await {
                Ok(observation) => observation,
                Err(e) if e.is_not_found() => Observation::Gone,
                Err(e) => {
                    self.phase = WaitPhase::Failed;
                    warn!(target_states = %self.target, attempt = self.attempts, error = %e, "Poll failed");
                    return Err(e);
                }
            };

            match observation {
                Observation::Found(resource) => {
                    self.last_state = resource.lifecycle_state().map(str::to_owned);
                    debug!(
                        target_states = %self.target,
                        attempt = self.attempts,
                        state = self.last_state.as_deref().unwrap_or("<none>"),
                        "Polled resource"
                    );
                    if done(&resource) {
                        return Ok(self.succeed(WaitOutcome::Reached(resource), started));
                    }
                }
                Observation::Gone => match self.policy {
                    NotFoundPolicy::Succeed => {
                        return Ok(self.succeed(WaitOutcome::Gone, started));
                    }
                    NotFoundPolicy::Fail => {
                        self.phase = WaitPhase::Failed;
                        warn!(target_states = %self.target, attempt = self.attempts, "Resource disappeared while waiting");
                        return Err(Error::NotFound(format!(
                            "resource disappeared while waiting for {}",
                            self.target
                        )));
                    }
                },
            }

            let now = Instant::now();
            if now >= deadline {
                self.phase = WaitPhase::TimedOut;
                let elapsed = now - started;
                warn!(
                    target_states = %self.target,
                    attempts = self.attempts,
                    elapsed_secs = elapsed.as_secs(),
                    "Timed out waiting"
                );
                return Err(Error::WaitTimeout {
                    target: self.target.clone(),
                    attempts: self.attempts,
                    elapsed,
                    last_state: self.last_state.clone(),
                });
            }

            sleep(interval.min(deadline - now)).await;
            interval = self.config.next_interval(interval);
        }
    }

    fn succeed<T>(&mut self, outcome: WaitOutcome<T>, started: Instant) -> Waited<T> {
        self.phase = WaitPhase::Succeeded;
        let elapsed = started.elapsed();
        info!(
            target_states = %self.target,
            attempts = self.attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            gone = matches!(outcome, WaitOutcome::Gone),
            "Wait complete"
        );
        Waited {
            outcome,
            attempts: self.attempts,
            elapsed,
        }
    }
}

/// Poll a lifecycle resource until its state is one of `targets`.
pub async fn wait_for_states<T, F, Fut>(
    config: WaiterConfig,
    targets: &TargetStates,
    policy: NotFoundPolicy,
    poll: F,
) -> Result<Waited<T>>
where
    T: Lifecycle,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Observation<T>>>,
{
    let mut waiter = Waiter::new(config, targets.to_string(), policy);
    waiter
        .wait_until(poll, |resource| {
            resource
                .lifecycle_state()
                .is_some_and(|state| targets.matches(state))
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Fake(&'static str);

    impl Lifecycle for Fake {
        fn lifecycle_state(&self) -> Option<&str> {
            Some(self.0)
        }
    }

    fn sequence(
        states: &'static [&'static str],
    ) -> impl FnMut() -> std::future::Ready<Result<Observation<Fake>>> {
        let mut next = 0;
        move || {
            let state = states[next.min(states.len() - 1)];
            next += 1;
            std::future::ready(Ok(Observation::Found(Fake(state))))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_first_match() {
        let targets = TargetStates::new(["active"]);
        let waited = wait_for_states(
            WaiterConfig::default(),
            &targets,
            NotFoundPolicy::Fail,
            sequence(&["CREATING", "CREATING", "ACTIVE", "DELETED"]),
        )
        .await
        .unwrap();

        assert_eq!(waited.outcome, WaitOutcome::Reached(Fake("ACTIVE")));
        assert_eq!(waited.attempts, 3);
        // Slept 1s then 2s.
        assert_eq!(waited.elapsed, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_with_last_state() {
        let config = WaiterConfig::default().with_max_wait(Duration::from_secs(10));
        let targets = TargetStates::new(["ACTIVE"]);
        let err = wait_for_states(config, &targets, NotFoundPolicy::Fail, sequence(&["CREATING"]))
            .await
            .unwrap_err();

        // Polls at 0, 1, 3, 7 and 10 seconds.
        match err {
            Error::WaitTimeout {
                attempts,
                elapsed,
                last_state,
                ..
            } => {
                assert_eq!(attempts, 5);
                assert_eq!(elapsed, Duration::from_secs(10));
                assert_eq!(last_state.as_deref(), Some("CREATING"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_succeeds_under_succeed_policy() {
        let mut calls = 0;
        let mut waiter = Waiter::new(WaiterConfig::default(), "DELETED", NotFoundPolicy::Succeed);
        let waited = waiter
            .wait_until(
                || {
                    calls += 1;
                    let result = if calls < 2 {
                        Ok(Observation::Found(Fake("DELETING")))
                    } else {
                        Err(Error::Service {
                            status: 404,
                            code: "NotAuthorizedOrNotFound".into(),
                            message: "gone".into(),
                            opc_request_id: None,
                        })
                    };
                    std::future::ready(result)
                },
                |r: &Fake| r.0 == "DELETED",
            )
            .await
            .unwrap();

        assert_eq!(waited.outcome, WaitOutcome::Gone);
        assert_eq!(waiter.phase(), WaitPhase::Succeeded);
        assert_eq!(waiter.last_state(), Some("DELETING"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gone_fails_under_fail_policy() {
        let mut waiter = Waiter::new(WaiterConfig::default(), "ACTIVE", NotFoundPolicy::Fail);
        let err = waiter
            .wait_until(
                || std::future::ready(Ok(Observation::<Fake>::Gone)),
                |_| true,
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(waiter.phase(), WaitPhase::Failed);
        assert_eq!(waiter.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_propagates() {
        let mut waiter = Waiter::new(WaiterConfig::default(), "ACTIVE", NotFoundPolicy::Succeed);
        let err = waiter
            .wait_until(
                || std::future::ready(Err::<Observation<Fake>, _>(Error::Transport("reset".into()))),
                |_| true,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(waiter.phase(), WaitPhase::Failed);

        let again = waiter
            .wait_until(|| std::future::ready(Ok(Observation::Found(Fake("ACTIVE")))), |_| true)
            .await;
        assert!(matches!(again, Err(Error::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected_before_polling() {
        let config = WaiterConfig::default()
            .with_max_interval(Duration::ZERO)
            .with_max_wait(Duration::from_millis(200));
        let targets = TargetStates::new(["ACTIVE"]);
        let mut polls = 0;
        let err = wait_for_states(config, &targets, NotFoundPolicy::Fail, || {
            polls += 1;
            std::future::ready(Ok(Observation::Found(Fake("CREATING"))))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(polls, 0);
    }
}
