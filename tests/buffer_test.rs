/*!
 * Bounded Buffer Tests
 * Blocking bounds, FIFO delivery, and cooperative cancellation
 */

use pretty_assertions::assert_eq;
use process_simulator::{BoundedBuffer, BufferError, CancelToken, ProducerConsumer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const SHORT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_sixth_produce_blocks_until_consume() {
    let buffer = Arc::new(BoundedBuffer::new(5));
    for item in 1..=5u64 {
        timeout(SHORT, buffer.produce(item))
            .await
            .expect("produce within capacity must not block")
            .unwrap();
    }
    assert_eq!(buffer.len(), 5);

    let sixth = {
        let buffer = Arc::clone(&buffer);
        tokio::spawn(async move { buffer.produce(6).await })
    };
    tokio::time::sleep(SHORT).await;
    assert!(!sixth.is_finished());
    assert_eq!(buffer.len(), 5);

    assert_eq!(buffer.consume().await, Ok(1));
    timeout(SHORT, sixth).await.unwrap().unwrap().unwrap();
    assert_eq!(buffer.len(), 5);
}

#[tokio::test]
async fn test_consume_on_empty_blocks_until_produce() {
    let buffer: Arc<BoundedBuffer<u64>> = Arc::new(BoundedBuffer::new(5));
    let consumer = {
        let buffer = Arc::clone(&buffer);
        tokio::spawn(async move { buffer.consume().await })
    };
    tokio::time::sleep(SHORT).await;
    assert!(!consumer.is_finished());

    buffer.produce(42).await.unwrap();
    assert_eq!(timeout(SHORT, consumer).await.unwrap().unwrap(), Ok(42));
    assert!(buffer.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_flows_preserve_order_and_bounds() {
    let buffer = Arc::new(BoundedBuffer::new(3));
    let producer = {
        let buffer = Arc::clone(&buffer);
        tokio::spawn(async move {
            let mut max_len = 0;
            for item in 0..500u64 {
                buffer.produce(item).await.unwrap();
                max_len = max_len.max(buffer.len());
            }
            max_len
        })
    };
    let consumer = {
        let buffer = Arc::clone(&buffer);
        tokio::spawn(async move {
            let mut seen = Vec::with_capacity(500);
            for _ in 0..500 {
                seen.push(buffer.consume().await.unwrap());
            }
            seen
        })
    };

    let max_len = producer.await.unwrap();
    let seen = consumer.await.unwrap();
    assert!(max_len <= 3);
    assert_eq!(seen, (0..500).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_demo_moves_every_item_in_order() {
    let report = ProducerConsumer::new(5, 10)
        .with_pacing(Duration::ZERO, Duration::ZERO)
        .run()
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.produced, (1..=10).collect::<Vec<u64>>());
    assert_eq!(report.consumed, report.produced);
    assert!(report.max_observed_len <= report.capacity);
}

#[tokio::test]
async fn test_demo_fast_producer_stays_bounded() {
    let report = ProducerConsumer::new(2, 8)
        .with_pacing(Duration::ZERO, Duration::from_millis(2))
        .run()
        .await
        .unwrap();

    assert!(report.is_complete());
    assert!(report.max_observed_len <= 2);
}

#[tokio::test]
async fn test_cancel_stops_both_flows() {
    let demo = ProducerConsumer::new(5, 1_000)
        .with_pacing(Duration::from_millis(5), Duration::from_millis(5));
    let cancel = demo.cancel_token();
    let buffer = demo.buffer();

    let run = tokio::spawn(demo.run());
    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();

    let report = timeout(Duration::from_secs(2), run)
        .await
        .expect("cancelled flows must finish")
        .unwrap()
        .unwrap();
    assert!(report.cancelled);
    assert!(!report.is_complete());
    assert!(report.produced.len() < 1_000);
    assert!(report.consumed.len() <= report.produced.len());
    assert_eq!(report.consumed, report.produced[..report.consumed.len()].to_vec());

    // Counts stay consistent: leftovers are still consumable without waiting
    let leftover = report.produced.len() - report.consumed.len();
    assert_eq!(buffer.len(), leftover);
    for _ in 0..leftover {
        assert!(buffer.try_consume().is_ok());
    }
    assert_eq!(buffer.try_consume(), Err(BufferError::Empty));
}

#[tokio::test]
async fn test_pre_cancelled_token() {
    let token = CancelToken::new();
    token.cancel();
    let report = ProducerConsumer::new(5, 10)
        .with_cancel_token(token)
        .run()
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.produced.is_empty());
    assert!(report.consumed.is_empty());
}
