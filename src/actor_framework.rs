use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Construct the full Entity from the ID and creation parameters
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Errors produced by the generic actor machinery.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("No id generator configured for this resource")]
    NoIdGenerator,
    #[error("Rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    /// Insert under a caller-chosen id. Existing ids are rejected.
    Register {
        id: T::Id,
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    /// Insert under an id produced by the actor's generator.
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    /// Applies every action or none of them.
    ActionBatch {
        actions: Vec<(T::Id, T::Action)>,
        respond_to: Response<Vec<T::ActionResult>>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

type IdGenerator<Id> = Box<dyn Fn(usize) -> Id + Send + Sync>;

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: IndexMap<T::Id, T>,
    next_id_fn: Option<IdGenerator<T::Id>>,
}

impl<T: Entity> ResourceActor<T> {
    /// Actor whose entities are always registered under caller-supplied ids.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    /// Actor that also mints ids for `Create` requests. The generator receives
    /// the number of entities currently held.
    pub fn with_id_generator(
        buffer_size: usize,
        next_id_fn: impl Fn(usize) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id_fn)))
    }

    fn build(buffer_size: usize, next_id_fn: Option<IdGenerator<T::Id>>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: IndexMap::new(),
            next_id_fn,
        };
        (actor, ResourceClient::new(sender))
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Register { id, params, respond_to } => {
                    let _ = respond_to.send(self.insert(id, params));
                }
                ResourceRequest::Create { params, respond_to } => {
                    let next_id = self.next_id_fn.as_ref().map(|next_id| next_id(self.store.len()));
                    let result = match next_id {
                        Some(id) => self.insert(id, params),
                        None => Err(FrameworkError::NoIdGenerator),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let items = self.store.values().cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::ActionBatch { actions, respond_to } => {
                    let _ = respond_to.send(self.apply_batch(actions));
                }
            }
        }
        debug!(remaining = self.store.len(), "resource actor stopped");
    }

    fn insert(&mut self, id: T::Id, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        if self.store.contains_key(&id) {
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    /// Runs the actions against scratch copies and only swaps them into the
    /// store once every action has succeeded.
    fn apply_batch(
        &mut self,
        actions: Vec<(T::Id, T::Action)>,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        let mut staged: IndexMap<T::Id, T> = IndexMap::new();
        let mut results = Vec::with_capacity(actions.len());

        for (id, action) in actions {
            let item = match staged.entry(id.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let current = self
                        .store
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                    entry.insert(current)
                }
            };
            results.push(item.handle_action(action).map_err(FrameworkError::Rejected)?);
        }

        for (id, item) in staged {
            if let Some(slot) = self.store.get_mut(&id) {
                *slot = item;
            }
        }
        Ok(results)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn register(&self, id: T::Id, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Register { id, params, respond_to })
            .await
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    pub async fn perform_batch(
        &self,
        actions: Vec<(T::Id, T::Action)>,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::ActionBatch { actions, respond_to })
            .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
        value: u32,
    }

    // Custom Actions
    #[derive(Debug)]
    enum CounterAction {
        Take(u32),
        Rename(String),
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type Action = CounterAction;
        type ActionResult = u32;

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, String> {
            if params.label.is_empty() {
                return Err("label must not be empty".to_string());
            }
            Ok(Self {
                id,
                label: params.label,
                value: params.value,
            })
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, String> {
            match action {
                CounterAction::Take(amount) => {
                    if amount > self.value {
                        return Err(format!("only {} left", self.value));
                    }
                    self.value -= amount;
                    Ok(self.value)
                }
                CounterAction::Rename(label) => {
                    self.label = label;
                    Ok(self.value)
                }
            }
        }
    }

    fn counter(label: &str, value: u32) -> CounterCreate {
        CounterCreate {
            label: label.to_string(),
            value,
        }
    }

    fn spawn_counters() -> ResourceClient<Counter> {
        let (actor, client) = ResourceActor::with_id_generator(10, |count| format!("c{}", count + 1));
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_register_rejects_duplicate_ids() {
        let client = spawn_counters();

        let id = client.register("a".into(), counter("first", 1)).await.unwrap();
        assert_eq!(id, "a");

        let err = client.register("a".into(), counter("second", 2)).await.unwrap_err();
        assert_eq!(err, FrameworkError::AlreadyExists("a".into()));

        let kept = client.get("a".into()).await.unwrap().unwrap();
        assert_eq!(kept.label, "first");
    }

    #[tokio::test]
    async fn test_create_uses_generator_and_list_keeps_insertion_order() {
        let client = spawn_counters();

        client.register("z".into(), counter("zed", 0)).await.unwrap();
        let generated = client.create(counter("gen", 0)).await.unwrap();
        assert_eq!(generated, "c2");

        let labels: Vec<String> = client.list().await.unwrap().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["zed", "gen"]);
    }

    #[tokio::test]
    async fn test_create_without_generator_fails() {
        let (actor, client) = ResourceActor::<Counter>::new(4);
        tokio::spawn(actor.run());

        let err = client.create(counter("x", 1)).await.unwrap_err();
        assert_eq!(err, FrameworkError::NoIdGenerator);
    }

    #[tokio::test]
    async fn test_rejected_construction_is_not_stored() {
        let client = spawn_counters();

        let err = client.register("bad".into(), counter("", 1)).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));
        assert!(client.get("bad".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_actions_mutate_state() {
        let client = spawn_counters();
        client.register("a".into(), counter("apples", 5)).await.unwrap();

        let left = client.perform_action("a".into(), CounterAction::Take(2)).await.unwrap();
        assert_eq!(left, 3);

        client
            .perform_action("a".into(), CounterAction::Rename("pears".into()))
            .await
            .unwrap();
        let item = client.get("a".into()).await.unwrap().unwrap();
        assert_eq!(item.label, "pears");
        assert_eq!(item.value, 3);

        let missing = client.perform_action("nope".into(), CounterAction::Take(1)).await.unwrap_err();
        assert_eq!(missing, FrameworkError::NotFound("nope".into()));
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let client = spawn_counters();
        client.register("a".into(), counter("apples", 5)).await.unwrap();
        client.register("b".into(), counter("bananas", 1)).await.unwrap();

        let err = client
            .perform_batch(vec![
                ("a".into(), CounterAction::Take(4)),
                ("b".into(), CounterAction::Take(2)),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));
        assert_eq!(client.get("a".into()).await.unwrap().unwrap().value, 5);
        assert_eq!(client.get("b".into()).await.unwrap().unwrap().value, 1);

        // Repeated ids accumulate against the staged copy.
        let results = client
            .perform_batch(vec![
                ("a".into(), CounterAction::Take(2)),
                ("a".into(), CounterAction::Take(2)),
                ("b".into(), CounterAction::Take(1)),
            ])
            .await
            .unwrap();
        assert_eq!(results, vec![3, 1, 0]);
        assert_eq!(client.get("a".into()).await.unwrap().unwrap().value, 1);
        assert_eq!(client.get("b".into()).await.unwrap().unwrap().value, 0);
    }
}
