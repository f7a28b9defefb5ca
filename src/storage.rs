//! Persistence seam for user, statistics, and session records. The engine
//! never depends on these calls succeeding; the route layer consumes the
//! trait and can swap the map-backed store for a database-backed one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::{RoundOutcome, RoundSummary};

pub const STARTING_BALANCE: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub user_id: u32,
    pub total_hands: u32,
    pub hands_won: u32,
    pub blackjacks: u32,
    pub busts: u32,
    pub net_profit: i64,
    pub balance: u32,
}

impl Stats {
    fn seed(user_id: u32) -> Self {
        Stats {
            user_id,
            total_hands: 0,
            hands_won: 0,
            blackjacks: 0,
            busts: 0,
            net_profit: 0,
            balance: STARTING_BALANCE,
        }
    }

    /// Fold one settled round into the record.
    pub fn record(&mut self, summary: &RoundSummary) {
        let won = matches!(summary.result, RoundOutcome::Win | RoundOutcome::Blackjack);
        self.total_hands += 1;
        if won {
            self.hands_won += 1;
        }
        if summary.result == RoundOutcome::Blackjack {
            self.blackjacks += 1;
        }
        if summary.player_busted {
            self.busts += 1;
        }
        self.net_profit += summary.net_profit;
        self.balance = (self.balance as i64 + summary.net_profit).max(0) as u32;
    }
}

/// Field-wise patch for `update_stats`; unset fields keep their value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    pub total_hands: Option<u32>,
    pub hands_won: Option<u32>,
    pub blackjacks: Option<u32>,
    pub busts: Option<u32>,
    pub net_profit: Option<i64>,
    pub balance: Option<u32>,
}

impl StatsPatch {
    fn apply(&self, stats: &mut Stats) {
        if let Some(v) = self.total_hands {
            stats.total_hands = v;
        }
        if let Some(v) = self.hands_won {
            stats.hands_won = v;
        }
        if let Some(v) = self.blackjacks {
            stats.blackjacks = v;
        }
        if let Some(v) = self.busts {
            stats.busts = v;
        }
        if let Some(v) = self.net_profit {
            stats.net_profit = v;
        }
        if let Some(v) = self.balance {
            stats.balance = v;
        }
    }
}

/// A serialized round snapshot appended for later resume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: u32,
    pub user_id: u32,
    pub state: serde_json::Value,
}

pub trait Storage {
    fn get_user(&self, id: u32) -> Option<User>;
    fn get_user_by_username(&self, username: &str) -> Option<User>;
    /// Creating a user also seeds their default stats record.
    fn create_user(&mut self, new_user: NewUser) -> User;

    fn get_stats(&self, user_id: u32) -> Option<Stats>;
    fn update_stats(&mut self, user_id: u32, patch: StatsPatch) -> Stats;

    fn append_session(&mut self, user_id: u32, state: serde_json::Value) -> Session;
    fn latest_session(&self, user_id: u32) -> Option<Session>;
}

/// Map-backed store, the default for the demo deployment.
pub struct MemStorage {
    users: HashMap<u32, User>,
    stats: HashMap<u32, Stats>,
    sessions: HashMap<u32, Vec<Session>>,
    next_user_id: u32,
    next_session_id: u32,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage {
            users: HashMap::new(),
            stats: HashMap::new(),
            sessions: HashMap::new(),
            next_user_id: 1,
            next_session_id: 1,
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        MemStorage::new()
    }
}

impl Storage for MemStorage {
    fn get_user(&self, id: u32) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.values().find(|u| u.username == username).cloned()
    }

    fn create_user(&mut self, new_user: NewUser) -> User {
        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User {
            id,
            username: new_user.username,
            password: new_user.password,
        };
        self.users.insert(id, user.clone());
        self.stats.insert(id, Stats::seed(id));
        user
    }

    fn get_stats(&self, user_id: u32) -> Option<Stats> {
        self.stats.get(&user_id).cloned()
    }

    fn update_stats(&mut self, user_id: u32, patch: StatsPatch) -> Stats {
        let stats = self
            .stats
            .entry(user_id)
            .or_insert_with(|| Stats::seed(user_id));
        patch.apply(stats);
        stats.clone()
    }

    fn append_session(&mut self, user_id: u32, state: serde_json::Value) -> Session {
        let id = self.next_session_id;
        self.next_session_id += 1;
        let session = Session { id, user_id, state };
        self.sessions.entry(user_id).or_default().push(session.clone());
        session
    }

    fn latest_session(&self, user_id: u32) -> Option<Session> {
        self.sessions
            .get(&user_id)
            .and_then(|sessions| sessions.last())
            .cloned()
    }
}
