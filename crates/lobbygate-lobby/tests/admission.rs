//! Integration tests for admission: the documented scenarios plus
//! concurrency stress against one shared lobby.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Barrier};
use std::thread;

use lobbygate_lobby::{
    Entry, InMemoryLobbyRegistry, Lobby, LobbyConfig, LobbyError, LobbyRegistry,
};
use lobbygate_protocol::{ConnectionId, LobbyId};

// =========================================================================
// Helpers
// =========================================================================

fn addr(n: u32) -> IpAddr {
    IpAddr::V4(Ipv4Addr::from(0x0a00_0000 + n))
}

fn lobby(capacity: usize, per_address_quota: usize) -> Arc<Lobby> {
    Arc::new(Lobby::new(
        LobbyId::new("stress"),
        LobbyConfig {
            capacity,
            per_address_quota,
        },
    ))
}

/// Fires `requests` newcomer requests at `lobby` from `threads` threads,
/// all released at once. `address_of(i)` picks request i's address.
/// Returns how many were admitted.
fn hammer(
    lobby: &Arc<Lobby>,
    threads: usize,
    requests: usize,
    address_of: fn(usize) -> IpAddr,
) -> usize {
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let lobby = Arc::clone(lobby);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut admitted = 0;
                for i in (t..requests).step_by(threads) {
                    if let Ok(Entry::Admitted(_)) =
                        lobby.enter(None, address_of(i), None)
                    {
                        admitted += 1;
                    }
                }
                admitted
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).sum()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_capacity_two_admits_two_then_rejects_full() {
    let lobby = lobby(2, 1);

    let first = lobby.enter(None, addr(1), None).unwrap();
    let second = lobby.enter(None, addr(2), None).unwrap();
    assert!(matches!(first, Entry::Admitted(_)));
    assert!(matches!(second, Entry::Admitted(_)));
    assert_eq!(lobby.participant_count(), 2);

    let third = lobby.enter(None, addr(3), None);
    assert!(matches!(third, Err(LobbyError::Full(_))));
    assert_eq!(lobby.participant_count(), 2);
}

#[test]
fn test_same_address_second_request_rejects_quota() {
    let lobby = lobby(8, 1);

    let first = lobby.enter(None, addr(1), None).unwrap();
    let second = lobby.enter(None, addr(1), None);

    assert!(matches!(first, Entry::Admitted(_)));
    assert!(matches!(second, Err(LobbyError::QuotaExceeded(_))));
}

#[test]
fn test_connected_token_never_admits_as_new() {
    let lobby = lobby(8, 8);
    let Entry::Admitted(issued) = lobby.enter(None, addr(1), None).unwrap() else {
        panic!("expected admission");
    };
    lobby
        .attach_transport(issued.participant_id, ConnectionId::new(1))
        .unwrap();

    for n in 0..5 {
        let result = lobby.enter(Some(&issued.token), addr(n), None);
        assert!(matches!(result, Err(LobbyError::DuplicateSession(_))));
    }
    assert_eq!(lobby.participant_count(), 1);
}

#[test]
fn test_returning_token_consumes_no_capacity() {
    let lobby = lobby(1, 1);
    let Entry::Admitted(issued) = lobby.enter(None, addr(1), None).unwrap() else {
        panic!("expected admission");
    };

    for n in 2..6 {
        let entry = lobby.enter(Some(&issued.token), addr(n), None).unwrap();
        assert!(matches!(entry, Entry::Resumed(id) if id == issued.participant_id));
        assert_eq!(lobby.count_from(addr(n)), 1);
    }
    assert_eq!(lobby.participant_count(), 1);
}

#[test]
fn test_resume_from_other_address_can_exceed_quota() {
    let lobby = lobby(4, 1);
    lobby.enter(None, addr(1), None).unwrap();
    let Entry::Admitted(second) = lobby.enter(None, addr(2), None).unwrap() else {
        panic!("expected admission");
    };

    // The address refresh on resume is not quota-checked.
    let entry = lobby.enter(Some(&second.token), addr(1), None).unwrap();

    assert!(matches!(entry, Entry::Resumed(id) if id == second.participant_id));
    assert_eq!(lobby.count_from(addr(1)), 2);
    assert_eq!(lobby.count_from(addr(2)), 0);

    // Newcomers from the crowded address are still turned away.
    let newcomer = lobby.enter(None, addr(1), None);
    assert!(matches!(newcomer, Err(LobbyError::QuotaExceeded(_))));
}

#[test]
fn test_token_from_other_lobby_is_a_stranger() {
    let registry = InMemoryLobbyRegistry::new();
    let a = registry.create(LobbyConfig::default());
    let b = registry.create(LobbyConfig::default());
    let Entry::Admitted(issued) = a.enter(None, addr(1), None).unwrap() else {
        panic!("expected admission");
    };

    let looked_up = registry.lookup(b.id()).unwrap();
    assert!(looked_up.resolve(Some(&issued.token)).is_none());
    assert!(looked_up.participants_for(Some(&issued.token)).is_none());
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_concurrent_newcomers_never_exceed_capacity() {
    for _ in 0..20 {
        let lobby = lobby(5, 100);

        let admitted = hammer(&lobby, 8, 64, |i| addr(i as u32));

        assert_eq!(admitted, 5);
        assert_eq!(lobby.participant_count(), 5);
    }
}

#[test]
fn test_concurrent_same_address_never_exceeds_quota() {
    for _ in 0..20 {
        let lobby = lobby(100, 3);

        // Every request comes from one of two addresses.
        let admitted = hammer(&lobby, 8, 64, |i| addr((i % 2) as u32));

        assert_eq!(admitted, 6);
        assert_eq!(lobby.count_from(addr(0)), 3);
        assert_eq!(lobby.count_from(addr(1)), 3);
    }
}

#[test]
fn test_concurrent_resumes_and_admissions_keep_both_limits() {
    let lobby = lobby(10, 2);
    let Entry::Admitted(issued) = lobby.enter(None, addr(0), None).unwrap() else {
        panic!("expected admission");
    };
    let token = Arc::new(issued.token);

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let lobby = Arc::clone(&lobby);
            let barrier = Arc::clone(&barrier);
            let token = Arc::clone(&token);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..50u32 {
                    if t % 2 == 0 {
                        // Resumes roam over addresses no newcomer uses.
                        let _ = lobby.enter(Some(&*token), addr(100 + i % 4), None);
                    } else {
                        let _ = lobby.enter(None, addr(i % 4), None);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(lobby.participant_count() <= 10);
    for n in 0..4 {
        assert!(lobby.count_from(addr(n)) <= 2, "address {n} over quota");
    }
    let roaming: usize = (100..104).map(|n| lobby.count_from(addr(n))).sum();
    assert!(roaming <= 1, "the returning participant is counted once");
}

#[test]
fn test_snapshot_during_admissions_is_consistent() {
    let lobby = lobby(200, 200);
    let reader = {
        let lobby = Arc::clone(&lobby);
        thread::spawn(move || {
            for _ in 0..500 {
                let (data, views) = lobby.snapshot();
                assert_eq!(data.participant_count, views.len());
            }
        })
    };

    let admitted = hammer(&lobby, 4, 200, |i| addr(i as u32));

    reader.join().unwrap();
    assert_eq!(admitted, 200);
}
