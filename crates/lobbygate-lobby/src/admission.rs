//! The admission decision table.
//!
//! Given a roster, the participant (if any) the request's token resolved
//! to, and the request's source address, [`decide`] picks exactly one
//! outcome. Rows are evaluated in order:
//!
//! | # | Condition                                   | Decision                 |
//! |---|---------------------------------------------|--------------------------|
//! | 1 | resolved and connected                      | `RejectDuplicateSession` |
//! | 2 | resolved                                    | `ContinueExisting`       |
//! | 3a| no free slot                                | `RejectFull`             |
//! | 3b| address already holds its quota             | `RejectQuota`            |
//! | 3c| otherwise                                   | `AdmitAsNew`             |
//!
//! Duplicate detection comes first so a returning participant is never
//! counted as a new slot consumer.
//!
//! `decide` is pure. Applying the decision (refreshing an address,
//! issuing a participant) is [`Lobby::enter`](crate::Lobby::enter)'s job,
//! under the same lock the decision was made under.

use std::net::IpAddr;

use lobbygate_protocol::ParticipantId;
use lobbygate_session::{Participant, Roster};

use crate::LobbyConfig;

/// The outcome of an admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The token's participant already has a live transport.
    RejectDuplicateSession,
    /// A returning participant; refresh their address, no new slot.
    ContinueExisting(ParticipantId),
    /// No free slot for a newcomer.
    RejectFull,
    /// The newcomer's address is at its quota.
    RejectQuota,
    /// Admit a newcomer.
    AdmitAsNew,
}

/// Runs the decision table. See the module docs for the row order.
pub fn decide(
    config: &LobbyConfig,
    roster: &Roster,
    resolved: Option<&Participant>,
    address: IpAddr,
) -> Decision {
    if let Some(participant) = resolved {
        if participant.status().is_connected() {
            return Decision::RejectDuplicateSession;
        }
        return Decision::ContinueExisting(participant.id());
    }

    if !config.has_free_slot(roster.len()) {
        return Decision::RejectFull;
    }

    if roster.count_from(address) >= config.per_address_quota {
        return Decision::RejectQuota;
    }

    Decision::AdmitAsNew
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use lobbygate_protocol::ConnectionId;

    use super::*;

    fn addr(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 168, 0, last))
    }

    fn config(capacity: usize, per_address_quota: usize) -> LobbyConfig {
        LobbyConfig {
            capacity,
            per_address_quota,
        }
    }

    #[test]
    fn test_decide_connected_participant_rejects_duplicate() {
        let mut roster = Roster::new();
        let issued = roster.issue(None, addr(1));
        roster.attach(issued.participant_id, ConnectionId::new(1)).unwrap();
        let resolved = roster.resolve(Some(&issued.token));

        let decision = decide(&config(4, 1), &roster, resolved, addr(1));

        assert_eq!(decision, Decision::RejectDuplicateSession);
    }

    #[test]
    fn test_decide_duplicate_wins_over_full_lobby() {
        // Row 1 is checked before row 3a: a full lobby still reports the
        // duplicate, not "full".
        let mut roster = Roster::new();
        let issued = roster.issue(None, addr(1));
        roster.attach(issued.participant_id, ConnectionId::new(1)).unwrap();
        let resolved = roster.resolve(Some(&issued.token));

        let decision = decide(&config(1, 1), &roster, resolved, addr(1));

        assert_eq!(decision, Decision::RejectDuplicateSession);
    }

    #[test]
    fn test_decide_disconnected_participant_continues() {
        let mut roster = Roster::new();
        let issued = roster.issue(None, addr(1));
        let resolved = roster.resolve(Some(&issued.token));

        let decision = decide(&config(1, 1), &roster, resolved, addr(1));

        // Even though the lobby is full, a returning participant gets in.
        assert_eq!(decision, Decision::ContinueExisting(issued.participant_id));
    }

    #[test]
    fn test_decide_full_lobby_rejects_newcomer() {
        let mut roster = Roster::new();
        roster.issue(None, addr(1));
        roster.issue(None, addr(2));

        let decision = decide(&config(2, 5), &roster, None, addr(3));

        assert_eq!(decision, Decision::RejectFull);
    }

    #[test]
    fn test_decide_address_at_quota_rejects_newcomer() {
        let mut roster = Roster::new();
        roster.issue(None, addr(1));

        let decision = decide(&config(4, 1), &roster, None, addr(1));

        assert_eq!(decision, Decision::RejectQuota);
    }

    #[test]
    fn test_decide_address_below_quota_admits() {
        let mut roster = Roster::new();
        roster.issue(None, addr(1));

        let decision = decide(&config(4, 2), &roster, None, addr(1));

        assert_eq!(decision, Decision::AdmitAsNew);
    }

    #[test]
    fn test_decide_empty_lobby_admits() {
        let roster = Roster::new();

        let decision = decide(&config(4, 1), &roster, None, addr(1));

        assert_eq!(decision, Decision::AdmitAsNew);
    }

    #[test]
    fn test_decide_zero_quota_rejects_everyone() {
        let roster = Roster::new();

        let decision = decide(&config(4, 0), &roster, None, addr(1));

        assert_eq!(decision, Decision::RejectQuota);
    }
}
