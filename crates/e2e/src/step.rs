//! Step actions and the combinators that compose them into flows

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

use crate::error::{FlowError, FlowResult};
use crate::runner::RunContext;

/// One discrete interaction or assertion against the application.
///
/// Steps report their own outcome through the run context. Returning an
/// error means the step could not complete; the error travels up until a
/// [`Guarded`] step or the runner catches it.
#[async_trait]
pub trait StepAction: Send + Sync {
    /// Short description used in logs and error messages
    fn describe(&self) -> String;

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()>;
}

/// Run a step behind a panic boundary
pub async fn run_step(step: &dyn StepAction, ctx: &mut RunContext) -> FlowResult<()> {
    debug!("Executing step: {}", step.describe());

    match AssertUnwindSafe(step.run(ctx)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(FlowError::StepPanicked {
            step: step.describe(),
            reason: panic_message(panic.as_ref()),
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Ordered composite flow. The first failing step ends it.
pub struct Sequence {
    name: String,
    steps: Vec<Box<dyn StepAction>>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl StepAction + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn with_steps(mut self, steps: Vec<Box<dyn StepAction>>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[async_trait]
impl StepAction for Sequence {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()> {
        for step in &self.steps {
            run_step(step.as_ref(), ctx).await?;
        }
        Ok(())
    }
}

/// Catches the inner step's failure and records it as a failed result in the
/// active suite, so the surrounding flow keeps going.
pub struct Guarded {
    name: String,
    inner: Box<dyn StepAction>,
}

impl Guarded {
    pub fn new(name: impl Into<String>, inner: impl StepAction + 'static) -> Self {
        Self::boxed(name, Box::new(inner))
    }

    pub fn boxed(name: impl Into<String>, inner: Box<dyn StepAction>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

#[async_trait]
impl StepAction for Guarded {
    fn describe(&self) -> String {
        format!("guarded:{}", self.name)
    }

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()> {
        if let Err(e) = run_step(self.inner.as_ref(), ctx).await {
            warn!("{} failed: {}", self.name, e);
            ctx.fail(self.name.clone(), e.to_string());
        }
        Ok(())
    }
}

/// Records a pass in the active suite once the steps before it succeeded
pub struct Pass {
    name: String,
}

impl Pass {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl StepAction for Pass {
    fn describe(&self) -> String {
        format!("pass:{}", self.name)
    }

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()> {
        ctx.pass(self.name.clone());
        Ok(())
    }
}

/// Takes a best-effort snapshot; never fails
pub struct Checkpoint {
    label: String,
}

impl Checkpoint {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl StepAction for Checkpoint {
    fn describe(&self) -> String {
        format!("snapshot:{}", self.label)
    }

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()> {
        let _ = ctx.capture(&self.label).await;
        Ok(())
    }
}
