//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_batch`] to assert behavior.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

type Responder<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test owns, so the test plays the actor:
/// it inspects each request and decides the reply (success, failure, or none).
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Responder<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Register request
pub async fn expect_register<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::CreateParams, Responder<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Register { id, params, respond_to }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an ActionBatch request
pub async fn expect_batch<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Vec<(T::Id, T::Action)>, Responder<Vec<T::ActionResult>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::ActionBatch { actions, respond_to }) => Some((actions, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CustomerClient;
    use crate::customer_actor::CustomerError;
    use crate::domain::{Customer, CustomerTier};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<Customer>(10);
        let client = CustomerClient::new(inner);

        let register_task = tokio::spawn(async move {
            client
                .register_customer(Customer::premium("C1", "Test", "test@example.com"))
                .await
        });

        let (id, params, responder) = expect_register(&mut receiver).await.expect("Expected Register request");
        assert_eq!(id, "C1");
        assert_eq!(params.name, "Test");
        assert_eq!(params.tier, CustomerTier::Premium);
        responder.send(Err(FrameworkError::AlreadyExists(id))).unwrap();

        let result = register_task.await.unwrap();
        assert_eq!(result, Err(CustomerError::AlreadyExists("C1".to_string())));
    }
}
