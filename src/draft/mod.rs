pub mod registry;
pub mod session;
pub mod template;

pub use registry::DraftRegistry;
pub use session::{
    ActionKind, AdvanceInfo, Ban, DraftId, DraftNote, DraftPhase, DraftSession, DraftSnapshot,
    Pick, Position, Side, Team, Turn, TurnToken, STANDARD_TURN_ORDER,
};
pub use template::{DraftTemplate, TemplateBan, TemplateId, TemplatePick};
