use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ActionError;
use crate::stats::HeroId;

pub type DraftId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blue" => Ok(Side::Blue),
            "red" => Ok(Side::Red),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Ban => "ban",
            ActionKind::Pick => "pick",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One slot of the draft order: which side acts and whether it bans or picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TurnToken {
    pub side: Side,
    pub kind: ActionKind,
}

impl TurnToken {
    pub const fn new(side: Side, kind: ActionKind) -> Self {
        TurnToken { side, kind }
    }
}

impl fmt::Display for TurnToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.side, self.kind)
    }
}

impl From<TurnToken> for String {
    fn from(token: TurnToken) -> Self {
        token.to_string()
    }
}

impl TryFrom<String> for TurnToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (side, kind) = value
            .split_once('_')
            .ok_or_else(|| format!("malformed turn token: {}", value))?;
        let side = side.parse::<Side>()?;
        let kind = match kind {
            "ban" => ActionKind::Ban,
            "pick" => ActionKind::Pick,
            other => return Err(format!("unknown action kind: {}", other)),
        };
        Ok(TurnToken { side, kind })
    }
}

const BLUE_BAN: TurnToken = TurnToken::new(Side::Blue, ActionKind::Ban);
const RED_BAN: TurnToken = TurnToken::new(Side::Red, ActionKind::Ban);
const BLUE_PICK: TurnToken = TurnToken::new(Side::Blue, ActionKind::Pick);
const RED_PICK: TurnToken = TurnToken::new(Side::Red, ActionKind::Pick);

/// Standard competitive order. Pick phases 2 and 3 open with red.
pub const STANDARD_TURN_ORDER: [TurnToken; 14] = [
    BLUE_BAN, RED_BAN, BLUE_BAN, RED_BAN, // ban phase 1
    BLUE_PICK, RED_PICK, // pick phase 1
    BLUE_BAN, RED_BAN, // ban phase 2
    RED_PICK, BLUE_PICK, // pick phase 2
    RED_PICK, BLUE_PICK, BLUE_PICK, RED_PICK, // pick phase 3
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    Next(TurnToken),
    Completed,
}

impl Turn {
    pub fn token(&self) -> Option<TurnToken> {
        match self {
            Turn::Next(token) => Some(*token),
            Turn::Completed => None,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Next(token) => token.fmt(f),
            Turn::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    BanPhase1,
    PickPhase1,
    BanPhase2,
    PickPhase2,
    PickPhase3,
    Completed,
}

impl DraftPhase {
    /// Phase of the standard order that contains turn `index`.
    pub fn at(index: usize) -> DraftPhase {
        match index {
            0..=3 => DraftPhase::BanPhase1,
            4..=5 => DraftPhase::PickPhase1,
            6..=7 => DraftPhase::BanPhase2,
            8..=9 => DraftPhase::PickPhase2,
            10..=13 => DraftPhase::PickPhase3,
            _ => DraftPhase::Completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftPhase::BanPhase1 => "Ban Phase 1",
            DraftPhase::PickPhase1 => "Pick Phase 1",
            DraftPhase::BanPhase2 => "Ban Phase 2",
            DraftPhase::PickPhase2 => "Pick Phase 2",
            DraftPhase::PickPhase3 => "Pick Phase 3",
            DraftPhase::Completed => "Draft Completed",
        }
    }
}

impl fmt::Display for DraftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lane slot of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    ExpLane = 1,
    Jungler = 2,
    MidLane = 3,
    GoldLane = 4,
    Roamer = 5,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::ExpLane => "Exp Lane",
            Position::Jungler => "Jungler",
            Position::MidLane => "Mid Lane",
            Position::GoldLane => "Gold Lane",
            Position::Roamer => "Roamer",
        }
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Position::ExpLane),
            2 => Ok(Position::Jungler),
            3 => Ok(Position::MidLane),
            4 => Ok(Position::GoldLane),
            5 => Ok(Position::Roamer),
            other => Err(format!("position must be between 1 and 5, got {}", other)),
        }
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position as u8
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub position: Option<Position>,
    pub pick_order: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ban {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub ban_order: u32,
    pub created_at: DateTime<Utc>,
}

/// One side of a draft. Picks and bans are append-only; order numbers come from the
/// sequence length at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    side: Side,
    name: String,
    picks: Vec<Pick>,
    bans: Vec<Ban>,
}

impl Team {
    fn new(side: Side) -> Self {
        let name = match side {
            Side::Blue => "Blue Team",
            Side::Red => "Red Team",
        };
        Team {
            side,
            name: name.to_string(),
            picks: Vec::new(),
            bans: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn bans(&self) -> &[Ban] {
        &self.bans
    }

    pub fn pick_ids(&self) -> Vec<HeroId> {
        self.picks.iter().map(|p| p.hero_id).collect()
    }

    pub fn ban_ids(&self) -> Vec<HeroId> {
        self.bans.iter().map(|b| b.hero_id).collect()
    }

    pub fn contains(&self, hero_id: HeroId) -> bool {
        self.picks.iter().any(|p| p.hero_id == hero_id)
            || self.bans.iter().any(|b| b.hero_id == hero_id)
    }

    fn push_pick(&mut self, hero_id: HeroId, hero_name: String, position: Option<Position>) {
        let pick_order = self.picks.len() as u32 + 1;
        self.picks.push(Pick {
            hero_id,
            hero_name,
            position,
            pick_order,
            created_at: Utc::now(),
        });
    }

    fn push_ban(&mut self, hero_id: HeroId, hero_name: String) {
        let ban_order = self.bans.len() as u32 + 1;
        self.bans.push(Ban {
            hero_id,
            hero_name,
            ban_order,
            created_at: Utc::now(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftNote {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceInfo {
    pub next_turn: Turn,
    pub is_completed: bool,
    pub current_turn_index: usize,
    pub total_turns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSession {
    id: DraftId,
    name: String,
    turn_order: Vec<TurnToken>,
    cursor: usize,
    completed: bool,
    blue: Team,
    red: Team,
    #[serde(default)]
    notes: Vec<DraftNote>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DraftSession {
    pub fn new(id: DraftId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        DraftSession {
            id,
            name: name.into(),
            turn_order: STANDARD_TURN_ORDER.to_vec(),
            cursor: 0,
            completed: false,
            blue: Team::new(Side::Blue),
            red: Team::new(Side::Red),
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn turn_order(&self) -> &[TurnToken] {
        &self.turn_order
    }

    pub fn current_turn_index(&self) -> usize {
        self.cursor
    }

    pub fn total_turns(&self) -> usize {
        self.turn_order.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn notes(&self) -> &[DraftNote] {
        &self.notes
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    pub fn current_turn(&self) -> Turn {
        match self.turn_order.get(self.cursor) {
            Some(token) if !self.completed => Turn::Next(*token),
            _ => Turn::Completed,
        }
    }

    pub fn phase(&self) -> DraftPhase {
        if self.completed {
            DraftPhase::Completed
        } else {
            DraftPhase::at(self.cursor)
        }
    }

    pub fn is_hero_used(&self, hero_id: HeroId) -> bool {
        self.blue.contains(hero_id) || self.red.contains(hero_id)
    }

    /// Bans of both sides, blue first.
    pub fn all_bans(&self) -> Vec<HeroId> {
        let mut bans = self.blue.ban_ids();
        bans.extend(self.red.ban_ids());
        bans
    }

    /// Validate and record one ban or pick for the side whose turn it is.
    ///
    /// A rejected action leaves the session untouched.
    pub fn apply_action(
        &mut self,
        kind: ActionKind,
        hero_id: HeroId,
        hero_name: impl Into<String>,
        position: Option<Position>,
    ) -> Result<AdvanceInfo, ActionError> {
        if self.completed {
            return Err(ActionError::AlreadyCompleted);
        }
        let token = *self
            .turn_order
            .get(self.cursor)
            .ok_or(ActionError::AlreadyCompleted)?;
        if token.kind != kind {
            return Err(ActionError::WrongPhase {
                expected: token.kind,
                requested: kind,
            });
        }
        if self.is_hero_used(hero_id) {
            return Err(ActionError::HeroAlreadyUsed(hero_id));
        }

        let hero_name = hero_name.into();
        let team = self.team_mut(token.side);
        match kind {
            ActionKind::Pick => team.push_pick(hero_id, hero_name, position),
            ActionKind::Ban => team.push_ban(hero_id, hero_name),
        }

        self.cursor += 1;
        if self.cursor >= self.turn_order.len() {
            self.completed = true;
        }
        self.updated_at = Utc::now();

        tracing::info!(
            draft = self.id,
            token = %token,
            hero_id,
            cursor = self.cursor,
            completed = self.completed,
            "draft action applied"
        );

        Ok(AdvanceInfo {
            next_turn: self.current_turn(),
            is_completed: self.completed,
            current_turn_index: self.cursor,
            total_turns: self.turn_order.len(),
        })
    }

    pub fn add_note(&mut self, content: impl Into<String>) {
        let now = Utc::now();
        self.notes.push(DraftNote {
            content: content.into(),
            created_at: now,
        });
        self.updated_at = now;
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            id: self.id,
            name: self.name.clone(),
            phase: self.phase(),
            current_turn: self.current_turn(),
            current_turn_index: self.cursor,
            total_turns: self.turn_order.len(),
            is_completed: self.completed,
            blue: self.blue.clone(),
            red: self.red.clone(),
        }
    }
}

/// Read-only view of a draft's progress and both teams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSnapshot {
    pub id: DraftId,
    pub name: String,
    pub phase: DraftPhase,
    pub current_turn: Turn,
    pub current_turn_index: usize,
    pub total_turns: usize,
    pub is_completed: bool,
    pub blue: Team,
    pub red: Team,
}
