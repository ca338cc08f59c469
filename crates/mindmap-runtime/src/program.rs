//! Elm-style program driver.
//!
//! A [`Model`] turns messages into state changes and [`Cmd`]s. The
//! [`Program`] runs the message loop, performs storage commands against a
//! [`DocumentStore`], and queues everything that needs the host (HTTP,
//! downloads, dialogs, animation frames) as [`Effect`]s.
//!
//! ```ignore
//! let mut program = Program::new(app, Box::new(MemoryStore::new()));
//! program.init();
//! program.dispatch(Event::Resize { width: 800.0, height: 600.0 });
//! for effect in program.take_effects() {
//!     // hand to the host
//! }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use mindmap_core::MindMapError;
use mindmap_core::event::Event;
use serde::Serialize;

use crate::export::Export;
use crate::persistence::DocumentStore;
use crate::share::ShareRequest;

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages; every interaction [`Event`] converts into one.
    type Message: From<Event> + Send + 'static;

    /// What [`Model::view`] produces for the host to draw.
    type View;

    /// Startup commands.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    fn view(&self) -> Self::View;
}

/// A blocking notification shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A message the user acknowledges.
    Alert { message: String },
    /// A message with a copyable value, such as a share link.
    Prompt { message: String, value: String },
}

/// Side effects returned from `init()` and `update()`.
#[derive(Debug)]
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Execute multiple commands in parallel.
    Batch(Vec<Cmd<M>>),
    /// Execute commands sequentially.
    Sequence(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Request another animation frame after a duration.
    Tick(Duration),
    /// Store serialized text under `key`.
    Persist { key: String, json: String },
    /// Remove `key` from storage.
    ClearStorage { key: String },
    /// POST a share request.
    Share(ShareRequest),
    /// Offer a file for download.
    Download(Export),
    Notify(Notification),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn tick(duration: Duration) -> Self {
        Self::Tick(duration)
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self::Notify(Notification::Alert {
            message: message.into(),
        })
    }

    /// Create a batch of parallel commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Batch)
    }

    /// Create a sequence of commands.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Sequence)
    }

    fn collapse(cmds: Vec<Self>, wrap: fn(Vec<Self>) -> Self) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => wrap(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

/// Work the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "data", rename_all = "snake_case")]
pub enum Effect {
    /// Schedule a tick message after the duration.
    Tick(Duration),
    Share(ShareRequest),
    Download(Export),
    Notify(Notification),
}

/// Runs a [`Model`] against a storage backend.
pub struct Program<M: Model> {
    model: M,
    store: Box<dyn DocumentStore>,
    queue: VecDeque<M::Message>,
    effects: Vec<Effect>,
}

impl<M: Model> Program<M> {
    pub fn new(model: M, store: Box<dyn DocumentStore>) -> Self {
        Self {
            model,
            store,
            queue: VecDeque::new(),
            effects: Vec::new(),
        }
    }

    /// Run the model's startup commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute(cmd);
        self.drain();
    }

    /// Feed a message (or an [`Event`]) and run until the queue is empty.
    pub fn dispatch(&mut self, msg: impl Into<M::Message>) {
        self.queue.push_back(msg.into());
        self.drain();
    }

    /// Effects accumulated since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn view(&self) -> M::View {
        self.model.view()
    }

    fn drain(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            let cmd = self.model.update(msg);
            self.execute(cmd);
        }
    }

    fn execute(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
            Cmd::Msg(msg) => self.queue.push_back(msg),
            Cmd::Tick(duration) => {
                if !self.effects.iter().any(|e| matches!(e, Effect::Tick(_))) {
                    self.effects.push(Effect::Tick(duration));
                }
            }
            Cmd::Persist { key, json } => {
                if let Err(err) = self.store.set(&key, &json) {
                    self.storage_failed(err.into());
                }
            }
            Cmd::ClearStorage { key } => {
                if let Err(err) = self.store.remove(&key) {
                    self.storage_failed(err.into());
                }
            }
            Cmd::Share(request) => self.effects.push(Effect::Share(request)),
            Cmd::Download(export) => self.effects.push(Effect::Download(export)),
            Cmd::Notify(notification) => self.effects.push(Effect::Notify(notification)),
        }
    }

    fn storage_failed(&mut self, err: MindMapError) {
        tracing::warn!(backend = self.store.name(), error = %err, "storage command failed");
        self.effects
            .push(Effect::Notify(Notification::Alert {
                message: err.user_message(),
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[derive(Debug)]
    enum Msg {
        Event,
        Save(String),
        Chain(u32),
    }

    impl From<Event> for Msg {
        fn from(_: Event) -> Self {
            Msg::Event
        }
    }

    #[derive(Default)]
    struct Counter {
        seen: Vec<String>,
    }

    impl Model for Counter {
        type Message = Msg;
        type View = usize;

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Event => {
                    self.seen.push("event".into());
                    Cmd::tick(Duration::from_millis(16))
                }
                Msg::Save(json) => Cmd::Persist {
                    key: "k".into(),
                    json,
                },
                Msg::Chain(0) => Cmd::alert("done"),
                Msg::Chain(n) => {
                    self.seen.push(format!("chain {n}"));
                    Cmd::batch(vec![Cmd::none(), Cmd::msg(Msg::Chain(n - 1))])
                }
            }
        }

        fn view(&self) -> usize {
            self.seen.len()
        }
    }

    #[test]
    fn batch_of_one_unwraps() {
        let cmd: Cmd<()> = Cmd::batch(vec![Cmd::none(), Cmd::tick(Duration::ZERO)]);
        assert!(matches!(cmd, Cmd::Tick(_)));
        assert!(Cmd::<()>::sequence(vec![]).is_none());
    }

    #[test]
    fn messages_chain_until_quiet() {
        let mut program = Program::new(Counter::default(), Box::new(MemoryStore::new()));
        program.init();
        program.dispatch(Msg::Chain(3));
        assert_eq!(program.view(), 3);
        assert_eq!(
            program.take_effects(),
            vec![Effect::Notify(Notification::Alert {
                message: "done".into()
            })]
        );
    }

    #[test]
    fn ticks_are_coalesced() {
        let mut program = Program::new(Counter::default(), Box::new(MemoryStore::new()));
        program.dispatch(Event::Blur);
        program.dispatch(Event::Blur);
        assert_eq!(program.take_effects().len(), 1);
        assert!(program.take_effects().is_empty());
    }

    #[test]
    fn persist_writes_store() {
        let mut program = Program::new(Counter::default(), Box::new(MemoryStore::new()));
        program.dispatch(Msg::Save("{}".into()));
        assert_eq!(program.store().get("k").unwrap().as_deref(), Some("{}"));
        assert!(program.take_effects().is_empty());
    }
}
