use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{DraftId, DraftSession, Position, Side, Team};
use crate::stats::HeroId;

pub type TemplateId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePick {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBan {
    pub hero_id: HeroId,
    pub hero_name: String,
}

/// Named copy of both teams' picks and bans, kept for reuse or sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub source_draft: DraftId,
    pub blue_picks: Vec<TemplatePick>,
    pub red_picks: Vec<TemplatePick>,
    pub blue_bans: Vec<TemplateBan>,
    pub red_bans: Vec<TemplateBan>,
    pub created_at: DateTime<Utc>,
}

impl DraftTemplate {
    /// Capture `session` as it stands. Without a name the template is called
    /// `"{draft name} Template"`.
    pub fn from_session(
        id: TemplateId,
        session: &DraftSession,
        name: Option<String>,
        description: impl Into<String>,
        is_public: bool,
    ) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("{} Template", session.name()));
        let blue = session.team(Side::Blue);
        let red = session.team(Side::Red);

        DraftTemplate {
            id,
            name,
            description: description.into(),
            is_public,
            source_draft: session.id(),
            blue_picks: template_picks(blue),
            red_picks: template_picks(red),
            blue_bans: template_bans(blue),
            red_bans: template_bans(red),
            created_at: Utc::now(),
        }
    }
}

fn template_picks(team: &Team) -> Vec<TemplatePick> {
    team.picks()
        .iter()
        .map(|p| TemplatePick {
            hero_id: p.hero_id,
            hero_name: p.hero_name.clone(),
            position: p.position,
        })
        .collect()
}

fn template_bans(team: &Team) -> Vec<TemplateBan> {
    team.bans()
        .iter()
        .map(|b| TemplateBan {
            hero_id: b.hero_id,
            hero_name: b.hero_name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::session::ActionKind;

    #[test]
    fn captures_both_teams_in_order() {
        let mut session = DraftSession::new(3, "Finals G1");
        session.apply_action(ActionKind::Ban, 5, "Nana", None).unwrap();
        session.apply_action(ActionKind::Ban, 6, "Tigreal", None).unwrap();
        session.apply_action(ActionKind::Ban, 7, "Alucard", None).unwrap();
        session.apply_action(ActionKind::Ban, 8, "Karina", None).unwrap();
        session
            .apply_action(ActionKind::Pick, 1, "Miya", Some(Position::GoldLane))
            .unwrap();

        let template = DraftTemplate::from_session(1, &session, None, "", true);
        assert_eq!(template.name, "Finals G1 Template");
        assert_eq!(template.source_draft, 3);
        assert!(template.is_public);
        assert_eq!(
            template.blue_picks,
            vec![TemplatePick {
                hero_id: 1,
                hero_name: "Miya".to_string(),
                position: Some(Position::GoldLane),
            }]
        );
        assert!(template.red_picks.is_empty());
        let blue_bans: Vec<_> = template.blue_bans.iter().map(|b| b.hero_id).collect();
        let red_bans: Vec<_> = template.red_bans.iter().map(|b| b.hero_id).collect();
        assert_eq!(blue_bans, vec![5, 7]);
        assert_eq!(red_bans, vec![6, 8]);
    }

    #[test]
    fn explicit_name_wins_over_default() {
        let session = DraftSession::new(1, "Scrim");
        let template =
            DraftTemplate::from_session(2, &session, Some("Anti-dive".to_string()), "notes", false);
        assert_eq!(template.name, "Anti-dive");
        assert_eq!(template.description, "notes");

        let blank = DraftTemplate::from_session(3, &session, Some("  ".to_string()), "", false);
        assert_eq!(blank.name, "Scrim Template");
    }
}
