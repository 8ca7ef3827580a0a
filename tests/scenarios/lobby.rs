//! Lobby scenario tests
//!
//! Admission, rejection reasons, and roster updates

use crate::harness::TestServer;

/// Test: Every joined client sees the full roster after each join
#[tokio::test]
async fn test_join_broadcasts_roster() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut alice = server.join("alice", "mage").await.expect("alice join");
    assert_eq!(alice.expect("LOBBY_UPDATE").await.unwrap(), vec!["alice,Mage"]);

    let mut bob = server.join("bob", "WARRIOR").await.expect("bob join");
    let expected = vec!["alice,Mage", "bob,Warrior"];
    assert_eq!(alice.expect("LOBBY_UPDATE").await.unwrap(), expected);
    assert_eq!(bob.expect("LOBBY_UPDATE").await.unwrap(), expected);
}

/// Test: Rejections carry a reason and go only to the requester
#[tokio::test]
async fn test_join_rejections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", "Mage").await.unwrap();
    alice.expect("LOBBY_UPDATE").await.unwrap();

    let mut other = server.connect().await.unwrap();

    other.send("JOIN|alice|Archer").await.unwrap();
    assert_eq!(other.expect("JOIN_REJECTED").await.unwrap(), vec!["name already taken"]);

    other.send("JOIN|bob|Paladin").await.unwrap();
    assert_eq!(
        other.expect("JOIN_REJECTED").await.unwrap(),
        vec!["unknown archetype: Paladin"]
    );

    other.send("JOIN|a,b|Archer").await.unwrap();
    assert_eq!(other.expect("JOIN_REJECTED").await.unwrap(), vec!["invalid name"]);

    // Still free to join after rejections
    other.send("JOIN|bob|Archer").await.unwrap();
    other.expect("JOIN_SUCCESS").await.unwrap();
    other.send("JOIN|bob2|Archer").await.unwrap();
    assert_eq!(other.expect("JOIN_REJECTED").await.unwrap(), vec!["already joined"]);

    // alice saw only bob's successful join
    let lines = alice.drain().await;
    assert_eq!(lines, vec!["LOBBY_UPDATE|alice,Mage|bob,Archer"]);
}

/// Test: Joining is closed while a match runs
#[tokio::test]
async fn test_join_during_match_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let _clients = server
        .start_battle(&[("alice", "Mage"), ("bob", "Warrior")])
        .await
        .unwrap();

    let mut late = server.connect().await.unwrap();
    late.send("JOIN|carol|Archer").await.unwrap();
    assert_eq!(
        late.expect("JOIN_REJECTED").await.unwrap(),
        vec!["match already in progress"]
    );
}

/// Test: Leaving the lobby removes the participant
#[tokio::test]
async fn test_lobby_departure() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", "Mage").await.unwrap();
    let bob = server.join("bob", "Lancer").await.unwrap();
    alice.drain().await;

    bob.close().await.unwrap();
    assert_eq!(alice.expect("LOBBY_UPDATE").await.unwrap(), vec!["alice,Mage"]);

    // The name is free again
    let _bob = server.join("bob", "Archer").await.unwrap();
    assert_eq!(
        alice.expect("LOBBY_UPDATE").await.unwrap(),
        vec!["alice,Mage", "bob,Archer"]
    );
}

/// Test: Malformed lines are ignored without dropping the connection
#[tokio::test]
async fn test_garbage_lines_ignored() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    client.send("HELLO").await.unwrap();
    client.send("").await.unwrap();
    client.send("JOIN|onlyname").await.unwrap();
    client.send("ACTION|nobody|defense||").await.unwrap();

    client.send("JOIN|alice|Necromancer\r").await.unwrap();
    client.expect("JOIN_SUCCESS").await.unwrap();
    assert_eq!(
        client.expect("LOBBY_UPDATE").await.unwrap(),
        vec!["alice,Necromancer"]
    );
}
