//! Integration tests for the WebSocket peer link.
//!
//! These spin up a real listener and client over loopback to verify
//! data actually flows both ways and that a close is observed as
//! `Ok(None)` on the other end.

use checkline_peer::{connect, PeerListener};

/// Binds a listener on an OS-assigned port and connects a guest to it.
async fn linked_pair() -> (checkline_peer::PeerLink, checkline_peer::PeerLink) {
    let mut listener = PeerListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let identity = listener.identity().to_string();

    let host_task = tokio::spawn(async move {
        listener.accept().await.expect("should accept")
    });
    let guest = connect(&identity).await.expect("should connect");
    let host = host_task.await.expect("accept task should complete");
    (host, guest)
}

#[tokio::test]
async fn test_identity_is_a_dialable_address() {
    let listener = PeerListener::bind("127.0.0.1:0").await.unwrap();
    let identity = listener.identity();
    assert!(identity.starts_with("127.0.0.1:"));
    // The OS picked a real port, not 0.
    assert!(!identity.ends_with(":0"));
}

#[tokio::test]
async fn test_guest_to_host_delivery() {
    let (host, guest) = linked_pair().await;

    guest.send(b"hello host").await.unwrap();
    let received = host.recv().await.unwrap();
    assert_eq!(received, Some(b"hello host".to_vec()));
}

#[tokio::test]
async fn test_host_to_guest_delivery() {
    let (host, guest) = linked_pair().await;

    host.send(b"hello guest").await.unwrap();
    let received = guest.recv().await.unwrap();
    assert_eq!(received, Some(b"hello guest".to_vec()));
}

#[tokio::test]
async fn test_messages_arrive_in_order() {
    let (host, guest) = linked_pair().await;

    for i in 0u8..10 {
        guest.send(&[i]).await.unwrap();
    }
    for i in 0u8..10 {
        assert_eq!(host.recv().await.unwrap(), Some(vec![i]));
    }
}

#[tokio::test]
async fn test_close_is_observed_as_none() {
    let (host, guest) = linked_pair().await;

    guest.close().await.unwrap();
    let received = host.recv().await.unwrap();
    assert_eq!(received, None);
}

#[tokio::test]
async fn test_connect_to_dead_identity_fails() {
    // Bind then immediately drop to get an address nobody listens on.
    let listener = PeerListener::bind("127.0.0.1:0").await.unwrap();
    let identity = listener.identity().to_string();
    drop(listener);

    let result = connect(&identity).await;
    assert!(result.is_err());
}
