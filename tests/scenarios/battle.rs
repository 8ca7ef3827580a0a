//! Battle scenario tests
//!
//! Turn flow, priority, status effects, departures, and match end

use crate::harness::TestServer;

/// Test: A full turn produces state, narration, then the next turn
#[tokio::test]
async fn test_single_turn_flow() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut alice = server.join("alice", "Mage").await.unwrap();
    let mut bob = server.join("bob", "Warrior").await.unwrap();
    server.start_match().await.unwrap();

    alice.expect("GAME_START").await.unwrap();
    let info = alice.expect("PLAYERS_INFO").await.unwrap();
    assert_eq!(
        info,
        vec![
            "alice,Mage,4,100,100,20,20,true,none",
            "bob,Warrior,1,100,100,20,20,true,none"
        ]
    );
    assert_eq!(alice.expect("START_TURN").await.unwrap(), vec!["1"]);
    assert_eq!(bob.expect("START_TURN").await.unwrap(), vec!["1"]);

    alice.action("alice", "attack", "bob", "Fireball").await.unwrap();
    bob.action("bob", "defense", "", "").await.unwrap();

    for client in [&mut alice, &mut bob] {
        let update = client.expect("PLAYERS_UPDATE").await.unwrap();
        assert_eq!(
            update,
            vec![
                "alice,Mage,4,100,100,18,20,true,none",
                "bob,Warrior,1,84,100,20,20,true,none"
            ]
        );
        let result = client.expect("TURN_RESULT").await.unwrap();
        assert_eq!(
            result,
            vec![
                "alice: attacked bob with Fireball dealing 16 damage",
                "bob: took a defensive stance"
            ]
        );
        assert_eq!(client.expect("START_TURN").await.unwrap(), vec!["2"]);
    }
}

/// Test: A match played to the end returns everyone to a fresh lobby
#[tokio::test]
async fn test_match_to_completion() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut clients = server
        .start_battle(&[("alice", "Assassin"), ("bob", "Warrior")])
        .await
        .unwrap();
    let (alice, bob) = clients.split_at_mut(1);
    let (alice, bob) = (&mut alice[0], &mut bob[0]);

    let plan = ["Venom Blade", "Venom Blade", "Stab", "Stab"];
    for (turn, skill) in plan.iter().enumerate() {
        alice.action("alice", "attack", "bob", skill).await.unwrap();
        bob.action("bob", "attack", "alice", "Sword Strike").await.unwrap();

        let result = alice.expect("TURN_RESULT").await.unwrap();
        if turn < 3 {
            alice.expect("START_TURN").await.unwrap();
            continue;
        }

        // Poison finishes bob before anyone acts
        assert_eq!(result[0], "bob took 2 poison damage");
        assert_eq!(result[1], "bob was defeated by poison!");
        assert_eq!(result[2], "alice: tried to attack without a valid target");
        assert_eq!(result[3], "bob: could not act");
    }

    assert_eq!(alice.expect("GAME_END").await.unwrap(), vec!["alice"]);
    assert_eq!(bob.expect("GAME_END").await.unwrap(), vec!["alice"]);
    assert_eq!(
        alice.expect("LOBBY_UPDATE").await.unwrap(),
        vec!["alice,Assassin", "bob,Warrior"]
    );

    let status: serde_json::Value = server.get("/session").await.unwrap().json().await.unwrap();
    assert_eq!(status["phase"], "lobby");
    assert_eq!(status["matches_played"], 1);
    assert_eq!(status["participants"][1]["hp"], 100);
    assert_eq!(status["participants"][1]["alive"], true);

    // Rematch with the same connections
    server.start_match().await.unwrap();
    let info = bob.expect("PLAYERS_INFO").await.unwrap();
    assert_eq!(info[0], "alice,Assassin,6,100,100,20,20,true,none");
}

/// Test: Frozen participants may only send a forced skip
#[tokio::test]
async fn test_frozen_participant_skips() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut clients = server
        .start_battle(&[("alice", "Mage"), ("bob", "Warrior")])
        .await
        .unwrap();
    let (alice, bob) = clients.split_at_mut(1);
    let (alice, bob) = (&mut alice[0], &mut bob[0]);

    alice.action("alice", "attack", "bob", "Freezing Meteor").await.unwrap();
    bob.action("bob", "defense", "", "").await.unwrap();

    let result = bob.expect("TURN_RESULT").await.unwrap();
    assert_eq!(
        result[0],
        "alice: attacked bob with Freezing Meteor dealing 40 damage - bob is FROZEN for 2 turns!"
    );
    assert_eq!(bob.expect("START_TURN").await.unwrap(), vec!["2"]);

    // Rejected: bob is still frozen
    bob.action("bob", "defense", "", "").await.unwrap();
    bob.action("bob", "paralyzed", "", "").await.unwrap();
    alice.action("alice", "defense", "", "").await.unwrap();

    let result = alice.expect("TURN_RESULT").await.unwrap();
    assert!(result.contains(&"bob: is frozen and cannot act".to_string()));
    assert!(!result.iter().any(|l| l == "bob: took a defensive stance"));
}

/// Test: Disconnecting mid-turn counts as a skip and completes the turn
#[tokio::test]
async fn test_disconnect_mid_turn() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut clients = server
        .start_battle(&[("alice", "Mage"), ("bob", "Warrior"), ("carol", "Archer")])
        .await
        .unwrap();
    let carol = clients.pop().unwrap();
    let (alice, bob) = clients.split_at_mut(1);
    let (alice, bob) = (&mut alice[0], &mut bob[0]);

    alice.action("alice", "defense", "", "").await.unwrap();
    bob.action("bob", "defense", "", "").await.unwrap();
    carol.close().await.unwrap();

    let result = alice.expect("TURN_RESULT").await.unwrap();
    assert!(result.contains(&"carol: skipped the turn".to_string()));
    assert_eq!(alice.expect("START_TURN").await.unwrap(), vec!["2"]);

    let status: serde_json::Value = server.get("/session").await.unwrap().json().await.unwrap();
    assert_eq!(status["turn"], 2);
    assert_eq!(status["connections"], 2);
    assert_eq!(status["participants"][2]["alive"], false);
}

/// Test: A connection cannot submit actions for another participant
#[tokio::test]
async fn test_cannot_impersonate() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut clients = server
        .start_battle(&[("alice", "Mage"), ("bob", "Warrior")])
        .await
        .unwrap();
    let (alice, bob) = clients.split_at_mut(1);
    let (alice, bob) = (&mut alice[0], &mut bob[0]);

    alice.action("bob", "defense", "", "").await.unwrap();
    alice.action("alice", "defense", "", "").await.unwrap();
    bob.action("bob", "attack", "alice", "Sword Strike").await.unwrap();

    let result = bob.expect("TURN_RESULT").await.unwrap();
    assert_eq!(
        result,
        vec![
            "alice: took a defensive stance",
            "bob: attacked alice (defending) with Sword Strike dealing 5 damage"
        ]
    );
}
