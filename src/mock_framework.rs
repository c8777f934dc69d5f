//! Utilities for testing clients in isolation.
//!
//! A mock client sends its requests to a channel the test controls instead
//! of a running store task. The test inspects each request as it arrives and
//! answers through its oneshot responder, so client orchestration logic can
//! be exercised deterministically with simulated successes and failures.

use tokio::sync::{mpsc, oneshot};

use crate::store_framework::{StoreClient, StoreEntity, StoreError, StoreRequest};

/// Creates a mock client and the receiver for asserting its requests.
pub fn create_mock_client<T: StoreEntity>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Asserts the next request is an `Add` and hands back its draft and
/// responder.
pub async fn expect_add<T: StoreEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Draft, oneshot::Sender<Result<T::Id, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Add { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Asserts the next request is a `List` and hands back its responder.
pub async fn expect_list<T: StoreEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, StoreError>>> {
    match receiver.recv().await {
        Some(StoreRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderDraft, OrderStatus};

    #[tokio::test]
    async fn mock_client_answers_an_add() {
        let (client, mut receiver) = create_mock_client::<Order>(10);

        let add_task = tokio::spawn(async move {
            let draft = OrderDraft {
                id: "9".to_string(),
                order_number: "ORDER-99999".to_string(),
                date: "2025-01-01".to_string(),
                status: OrderStatus::Pending,
                total: 500.0,
                items: 1,
                product_name: None,
            };
            client.add(draft).await
        });

        let (draft, responder) = expect_add(&mut receiver).await.expect("Expected Add request");
        assert_eq!(draft.order_number, "ORDER-99999");
        responder.send(Ok("9".to_string())).unwrap();

        assert_eq!(add_task.await.unwrap(), Ok("9".to_string()));
    }

    #[tokio::test]
    async fn mock_client_answers_a_list() {
        let (client, mut receiver) = create_mock_client::<Order>(10);

        let list_task = tokio::spawn(async move { client.list().await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        responder.send(Ok(Vec::new())).unwrap();

        assert_eq!(list_task.await.unwrap(), Ok(Vec::new()));
    }
}
