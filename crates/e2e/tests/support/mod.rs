//! Shared fixtures for runner integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use flowcheck_e2e::{FlowError, FlowResult, RunContext, RunnerConfig, Session, StepAction};

pub const BASE: &str = "http://app.test/";

pub fn config() -> RunnerConfig {
    RunnerConfig {
        base_url: BASE.to_string(),
        echo: false,
        ..Default::default()
    }
}

/// Observations shared between a test and the session it hands to the runner
#[derive(Clone, Default)]
pub struct Probe {
    closes: Arc<AtomicUsize>,
    visited: Arc<Mutex<Vec<String>>>,
}

impl Probe {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

/// In-memory session with scripted redirects, pages and failures
#[derive(Default)]
pub struct ScriptedSession {
    probe: Probe,
    current: Option<String>,
    redirects: HashMap<String, String>,
    pages: HashMap<String, String>,
    unreachable: Vec<String>,
    fail_snapshot: bool,
    fail_close: bool,
}

impl ScriptedSession {
    pub fn new(probe: &Probe) -> Self {
        Self {
            probe: probe.clone(),
            ..Default::default()
        }
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }

    pub fn failing_snapshots(mut self) -> Self {
        self.fail_snapshot = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn boxed(self) -> Box<dyn Session> {
        Box::new(self)
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> FlowResult<()> {
        if self.unreachable.iter().any(|u| u == url) {
            return Err(FlowError::Session(format!("could not reach {}", url)));
        }
        self.probe.visited.lock().unwrap().push(url.to_string());
        let landed = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        self.current = Some(landed);
        Ok(())
    }

    async fn current_url(&mut self) -> FlowResult<String> {
        self.current.clone().ok_or(FlowError::NoPage)
    }

    async fn page_source(&mut self) -> FlowResult<String> {
        let url = self.current.as_ref().ok_or(FlowError::NoPage)?;
        Ok(self.pages.get(url).cloned().unwrap_or_default())
    }

    async fn snapshot(&mut self) -> FlowResult<Vec<u8>> {
        if self.fail_snapshot {
            return Err(FlowError::Session("screenshot not supported".to_string()));
        }
        Ok(self.current.clone().unwrap_or_default().into_bytes())
    }

    async fn close(&mut self) -> FlowResult<()> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(FlowError::Session("browser already gone".to_string()));
        }
        Ok(())
    }
}

/// Records a pass under its name
pub struct Passes(pub &'static str);

#[async_trait]
impl StepAction for Passes {
    fn describe(&self) -> String {
        format!("passes:{}", self.0)
    }

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()> {
        ctx.pass(self.0);
        Ok(())
    }
}

/// Fails without recording anything, like an element that cannot be found
pub struct Breaks(pub &'static str);

#[async_trait]
impl StepAction for Breaks {
    fn describe(&self) -> String {
        "breaks".to_string()
    }

    async fn run(&self, _ctx: &mut RunContext) -> FlowResult<()> {
        Err(FlowError::StepFailed {
            step: "find element".to_string(),
            reason: self.0.to_string(),
        })
    }
}

/// Panics mid-step
pub struct Panics;

#[async_trait]
impl StepAction for Panics {
    fn describe(&self) -> String {
        "panics".to_string()
    }

    async fn run(&self, _ctx: &mut RunContext) -> FlowResult<()> {
        panic!("driver crashed");
    }
}
