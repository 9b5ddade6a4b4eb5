use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{
    Aggregate, AggregateId, AggregateRoot, Amount, DomainError, ExpenseId, ParticipantId,
};
use splitledger_events::Event;

use crate::expense::{Expense, Participant, Share};

/// Group identifier (aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub AggregateId);

impl GroupId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for GroupId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Group lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Active,
    Closed,
}

/// Aggregate root: ExpenseGroup (one trip/dinner/household of shared costs).
///
/// Owns the participant roster and the recorded expenses. Once closed, a
/// group rejects every mutating command; balances stay computable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseGroup {
    id: GroupId,
    name: String,
    description: Option<String>,
    organizer: Option<ParticipantId>,
    roster: BTreeMap<ParticipantId, Participant>,
    expenses: Vec<Expense>,
    status: GroupStatus,
    version: u64,
    created: bool,
}

impl ExpenseGroup {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: GroupId) -> Self {
        Self {
            id,
            name: String::new(),
            description: None,
            organizer: None,
            roster: BTreeMap::new(),
            expenses: Vec::new(),
            status: GroupStatus::Active,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn organizer(&self) -> Option<ParticipantId> {
        self.organizer
    }

    pub fn status(&self) -> GroupStatus {
        self.status
    }

    pub fn is_member(&self, participant_id: ParticipantId) -> bool {
        self.roster.contains_key(&participant_id)
    }

    pub fn participant(&self, participant_id: ParticipantId) -> Option<&Participant> {
        self.roster.get(&participant_id)
    }

    /// Roster in participant-id order.
    pub fn roster(&self) -> impl Iterator<Item = &Participant> {
        self.roster.values()
    }

    /// Recorded expenses in recording order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn expense(&self, expense_id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == expense_id)
    }
}

impl AggregateRoot for ExpenseGroup {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateGroup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroup {
    pub group_id: GroupId,
    pub name: String,
    pub description: Option<String>,
    /// The organizer is always on the roster, listed among `participants` or
    /// not.
    pub organizer: Participant,
    pub participants: Vec<Participant>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddParticipant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddParticipant {
    pub group_id: GroupId,
    pub participant: Participant,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveParticipant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveParticipant {
    pub group_id: GroupId,
    pub participant_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordExpense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordExpense {
    pub group_id: GroupId,
    pub expense: Expense,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AmendExpense (partial update; `None` keeps the existing value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendExpense {
    pub group_id: GroupId,
    pub expense_id: ExpenseId,
    pub total: Option<Amount>,
    pub description: Option<String>,
    pub payer_id: Option<ParticipantId>,
    pub shares: Option<Vec<Share>>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveExpense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveExpense {
    pub group_id: GroupId,
    pub expense_id: ExpenseId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CloseGroup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseGroup {
    pub group_id: GroupId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupCommand {
    CreateGroup(CreateGroup),
    AddParticipant(AddParticipant),
    RemoveParticipant(RemoveParticipant),
    RecordExpense(RecordExpense),
    AmendExpense(AmendExpense),
    RemoveExpense(RemoveExpense),
    CloseGroup(CloseGroup),
}

/// Event: GroupCreated. `participants` is the full initial roster, organizer
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreated {
    pub group_id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub organizer_id: ParticipantId,
    pub participants: Vec<Participant>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAdded {
    pub group_id: GroupId,
    pub participant: Participant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRemoved {
    pub group_id: GroupId,
    pub participant_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecorded {
    pub group_id: GroupId,
    pub expense: Expense,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseAmended. Carries the full effective expense after the
/// amendment, so consumers replace state instead of patching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAmended {
    pub group_id: GroupId,
    pub expense: Expense,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRemoved {
    pub group_id: GroupId,
    pub expense_id: ExpenseId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: GroupClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupClosed {
    pub group_id: GroupId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupEvent {
    GroupCreated(GroupCreated),
    ParticipantAdded(ParticipantAdded),
    ParticipantRemoved(ParticipantRemoved),
    ExpenseRecorded(ExpenseRecorded),
    ExpenseAmended(ExpenseAmended),
    ExpenseRemoved(ExpenseRemoved),
    GroupClosed(GroupClosed),
}

impl GroupEvent {
    /// The group this event belongs to.
    pub fn group_id(&self) -> GroupId {
        match self {
            GroupEvent::GroupCreated(e) => e.group_id,
            GroupEvent::ParticipantAdded(e) => e.group_id,
            GroupEvent::ParticipantRemoved(e) => e.group_id,
            GroupEvent::ExpenseRecorded(e) => e.group_id,
            GroupEvent::ExpenseAmended(e) => e.group_id,
            GroupEvent::ExpenseRemoved(e) => e.group_id,
            GroupEvent::GroupClosed(e) => e.group_id,
        }
    }
}

impl Event for GroupEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GroupEvent::GroupCreated(_) => "expenses.group.created",
            GroupEvent::ParticipantAdded(_) => "expenses.group.participant_added",
            GroupEvent::ParticipantRemoved(_) => "expenses.group.participant_removed",
            GroupEvent::ExpenseRecorded(_) => "expenses.group.expense_recorded",
            GroupEvent::ExpenseAmended(_) => "expenses.group.expense_amended",
            GroupEvent::ExpenseRemoved(_) => "expenses.group.expense_removed",
            GroupEvent::GroupClosed(_) => "expenses.group.closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GroupEvent::GroupCreated(e) => e.occurred_at,
            GroupEvent::ParticipantAdded(e) => e.occurred_at,
            GroupEvent::ParticipantRemoved(e) => e.occurred_at,
            GroupEvent::ExpenseRecorded(e) => e.occurred_at,
            GroupEvent::ExpenseAmended(e) => e.occurred_at,
            GroupEvent::ExpenseRemoved(e) => e.occurred_at,
            GroupEvent::GroupClosed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ExpenseGroup {
    type Command = GroupCommand;
    type Event = GroupEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            GroupEvent::GroupCreated(e) => {
                self.id = e.group_id;
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.organizer = Some(e.organizer_id);
                self.roster = e
                    .participants
                    .iter()
                    .map(|p| (p.id, p.clone()))
                    .collect();
                self.status = GroupStatus::Active;
                self.created = true;
            }
            GroupEvent::ParticipantAdded(e) => {
                self.roster.insert(e.participant.id, e.participant.clone());
            }
            GroupEvent::ParticipantRemoved(e) => {
                self.roster.remove(&e.participant_id);
            }
            GroupEvent::ExpenseRecorded(e) => {
                self.expenses.push(e.expense.clone());
            }
            GroupEvent::ExpenseAmended(e) => {
                if let Some(slot) = self.expenses.iter_mut().find(|x| x.id == e.expense.id) {
                    *slot = e.expense.clone();
                }
            }
            GroupEvent::ExpenseRemoved(e) => {
                self.expenses.retain(|x| x.id != e.expense_id);
            }
            GroupEvent::GroupClosed(_) => {
                self.status = GroupStatus::Closed;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            GroupCommand::CreateGroup(cmd) => self.handle_create(cmd),
            GroupCommand::AddParticipant(cmd) => self.handle_add_participant(cmd),
            GroupCommand::RemoveParticipant(cmd) => self.handle_remove_participant(cmd),
            GroupCommand::RecordExpense(cmd) => self.handle_record(cmd),
            GroupCommand::AmendExpense(cmd) => self.handle_amend(cmd),
            GroupCommand::RemoveExpense(cmd) => self.handle_remove_expense(cmd),
            GroupCommand::CloseGroup(cmd) => self.handle_close(cmd),
        }
    }
}

impl ExpenseGroup {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn ensure_group_id(&self, group_id: GroupId) -> Result<(), DomainError> {
        if self.id != group_id {
            return Err(DomainError::invariant("group_id mismatch"));
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status == GroupStatus::Closed {
            return Err(DomainError::validation("cannot modify a closed group"));
        }
        Ok(())
    }

    fn ensure_member(&self, participant_id: ParticipantId, role: &str) -> Result<(), DomainError> {
        if !self.roster.contains_key(&participant_id) {
            return Err(DomainError::validation(format!(
                "{role} {participant_id} is not a group member"
            )));
        }
        Ok(())
    }

    fn validate_participant(participant: &Participant) -> Result<(), DomainError> {
        if participant.name.trim().is_empty() {
            return Err(DomainError::validation("participant name cannot be empty"));
        }
        Ok(())
    }

    /// Intake validation for a new or amended expense.
    fn validate_expense(&self, expense: &Expense) -> Result<(), DomainError> {
        if !expense.total.is_positive() {
            return Err(DomainError::validation("expense total must be positive"));
        }
        self.ensure_member(expense.payer_id, "payer")?;

        if expense.shares.is_empty() {
            return Err(DomainError::validation("expense must have at least one share"));
        }
        let mut seen = BTreeSet::new();
        for share in &expense.shares {
            if share.amount.is_negative() {
                return Err(DomainError::validation("share amount cannot be negative"));
            }
            self.ensure_member(share.participant_id, "share participant")?;
            if !seen.insert(share.participant_id) {
                return Err(DomainError::validation(format!(
                    "participant {} appears in more than one share",
                    share.participant_id
                )));
            }
        }

        let share_total = expense.share_total()?;
        if !expense.is_reconciled()? {
            return Err(DomainError::invariant(format!(
                "shares sum to {share_total} but the expense total is {}",
                expense.total
            )));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateGroup) -> Result<Vec<GroupEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("group already exists"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("group name cannot be empty"));
        }
        Self::validate_participant(&cmd.organizer)?;

        // Normalize the roster: organizer first, no duplicates.
        let mut participants = vec![cmd.organizer.clone()];
        let mut seen: BTreeSet<ParticipantId> = BTreeSet::from([cmd.organizer.id]);
        for participant in &cmd.participants {
            Self::validate_participant(participant)?;
            if participant.id == cmd.organizer.id {
                continue;
            }
            if !seen.insert(participant.id) {
                return Err(DomainError::validation(format!(
                    "participant {} listed more than once",
                    participant.id
                )));
            }
            participants.push(participant.clone());
        }

        Ok(vec![GroupEvent::GroupCreated(GroupCreated {
            group_id: cmd.group_id,
            name: cmd.name.clone(),
            description: cmd.description.clone(),
            organizer_id: cmd.organizer.id,
            participants,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_participant(&self, cmd: &AddParticipant) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_group_id(cmd.group_id)?;
        self.ensure_active()?;
        Self::validate_participant(&cmd.participant)?;

        if self.roster.contains_key(&cmd.participant.id) {
            return Err(DomainError::validation("participant is already a member"));
        }

        Ok(vec![GroupEvent::ParticipantAdded(ParticipantAdded {
            group_id: cmd.group_id,
            participant: cmd.participant.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_participant(
        &self,
        cmd: &RemoveParticipant,
    ) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_group_id(cmd.group_id)?;
        self.ensure_active()?;

        if !self.roster.contains_key(&cmd.participant_id) {
            return Err(DomainError::not_found());
        }
        if self.organizer == Some(cmd.participant_id) {
            return Err(DomainError::validation("cannot remove the group organizer"));
        }
        let referenced = self.expenses.iter().any(|e| {
            e.payer_id == cmd.participant_id
                || e.shares.iter().any(|s| s.participant_id == cmd.participant_id)
        });
        if referenced {
            return Err(DomainError::validation(
                "participant is referenced by recorded expenses",
            ));
        }

        Ok(vec![GroupEvent::ParticipantRemoved(ParticipantRemoved {
            group_id: cmd.group_id,
            participant_id: cmd.participant_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record(&self, cmd: &RecordExpense) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_group_id(cmd.group_id)?;
        self.ensure_active()?;

        if self.expense(cmd.expense.id).is_some() {
            return Err(DomainError::conflict("expense already recorded"));
        }
        self.validate_expense(&cmd.expense)?;

        Ok(vec![GroupEvent::ExpenseRecorded(ExpenseRecorded {
            group_id: cmd.group_id,
            expense: cmd.expense.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_amend(&self, cmd: &AmendExpense) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_group_id(cmd.group_id)?;
        self.ensure_active()?;

        let Some(current) = self.expense(cmd.expense_id) else {
            return Err(DomainError::not_found());
        };

        // Build the effective expense, then validate it as a whole: a new
        // total without matching shares must not slip through.
        let effective = Expense {
            id: current.id,
            payer_id: cmd.payer_id.unwrap_or(current.payer_id),
            total: cmd.total.unwrap_or(current.total),
            description: cmd.description.clone().or_else(|| current.description.clone()),
            shares: cmd.shares.clone().unwrap_or_else(|| current.shares.clone()),
        };
        self.validate_expense(&effective)?;

        Ok(vec![GroupEvent::ExpenseAmended(ExpenseAmended {
            group_id: cmd.group_id,
            expense: effective,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_expense(&self, cmd: &RemoveExpense) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_group_id(cmd.group_id)?;
        self.ensure_active()?;

        if self.expense(cmd.expense_id).is_none() {
            return Err(DomainError::not_found());
        }

        Ok(vec![GroupEvent::ExpenseRemoved(ExpenseRemoved {
            group_id: cmd.group_id,
            expense_id: cmd.expense_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_close(&self, cmd: &CloseGroup) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_group_id(cmd.group_id)?;

        if self.status == GroupStatus::Closed {
            return Err(DomainError::conflict("group is already closed"));
        }

        Ok(vec![GroupEvent::GroupClosed(GroupClosed {
            group_id: cmd.group_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use splitledger_core::ExpenseId;

    fn test_group_id() -> GroupId {
        GroupId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn participant(name: &str) -> Participant {
        Participant {
            id: ParticipantId::new(),
            name: name.to_string(),
        }
    }

    fn share(participant: &Participant, cents: i64) -> Share {
        Share {
            participant_id: participant.id,
            amount: Amount::from_cents(cents),
        }
    }

    fn expense(payer: &Participant, total_cents: i64, shares: Vec<Share>) -> Expense {
        Expense {
            id: ExpenseId::new(),
            payer_id: payer.id,
            total: Amount::from_cents(total_cents),
            description: Some("test expense".to_string()),
            shares,
        }
    }

    /// A created group with the given members; the first one is the organizer.
    fn created_group(members: &[&Participant]) -> ExpenseGroup {
        let group_id = test_group_id();
        let mut group = ExpenseGroup::empty(group_id);
        let cmd = CreateGroup {
            group_id,
            name: "ski trip".to_string(),
            description: None,
            organizer: members[0].clone(),
            participants: members[1..].iter().map(|p| (*p).clone()).collect(),
            occurred_at: test_time(),
        };
        let events = group.handle(&GroupCommand::CreateGroup(cmd)).unwrap();
        for event in &events {
            group.apply(event);
        }
        group
    }

    fn record(group: &mut ExpenseGroup, expense: Expense) -> Result<(), DomainError> {
        let events = group.handle(&GroupCommand::RecordExpense(RecordExpense {
            group_id: group.id_typed(),
            expense,
            occurred_at: test_time(),
        }))?;
        for event in &events {
            group.apply(event);
        }
        Ok(())
    }

    #[test]
    fn create_group_puts_organizer_on_the_roster() {
        let organizer = participant("ana");
        let other = participant("bo");
        let group = created_group(&[&organizer, &other]);

        assert_eq!(group.version(), 1);
        assert_eq!(group.status(), GroupStatus::Active);
        assert_eq!(group.organizer(), Some(organizer.id));
        assert!(group.is_member(organizer.id));
        assert!(group.is_member(other.id));
        assert_eq!(group.roster().count(), 2);
    }

    #[test]
    fn create_group_rejects_blank_name() {
        let organizer = participant("ana");
        let group = ExpenseGroup::empty(test_group_id());
        let err = group
            .handle(&GroupCommand::CreateGroup(CreateGroup {
                group_id: group.id_typed(),
                name: "  ".to_string(),
                description: None,
                organizer,
                participants: vec![],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_group_rejects_duplicate_participants() {
        let organizer = participant("ana");
        let other = participant("bo");
        let group = ExpenseGroup::empty(test_group_id());
        let err = group
            .handle(&GroupCommand::CreateGroup(CreateGroup {
                group_id: group.id_typed(),
                name: "ski trip".to_string(),
                description: None,
                organizer,
                participants: vec![other.clone(), other],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_on_existing_group_conflicts() {
        let organizer = participant("ana");
        let group = created_group(&[&organizer]);
        let err = group
            .handle(&GroupCommand::CreateGroup(CreateGroup {
                group_id: group.id_typed(),
                name: "again".to_string(),
                description: None,
                organizer: participant("zed"),
                participants: vec![],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn commands_on_uncreated_group_are_not_found() {
        let group = ExpenseGroup::empty(test_group_id());
        let payer = participant("ana");
        let err = group
            .handle(&GroupCommand::RecordExpense(RecordExpense {
                group_id: group.id_typed(),
                expense: expense(&payer, 100, vec![share(&payer, 100)]),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn record_expense_appends_to_the_group() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);

        record(&mut group, expense(&ana, 9000, vec![share(&ana, 4500), share(&bo, 4500)]))
            .unwrap();

        assert_eq!(group.expenses().len(), 1);
        assert_eq!(group.expenses()[0].total, Amount::from_cents(9000));
    }

    #[test]
    fn record_expense_rejects_share_sum_mismatch() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);

        let err = record(&mut group, expense(&ana, 9000, vec![share(&ana, 3000), share(&bo, 3000)]))
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) => {
                assert!(msg.contains("shares sum to 60.00"), "unexpected message: {msg}");
            }
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn record_expense_tolerates_one_cent_rounding() {
        let ana = participant("ana");
        let bo = participant("bo");
        let cid = participant("cyn");
        let mut group = created_group(&[&ana, &bo, &cid]);

        // 100.00 split three ways leaves a cent on the table.
        record(
            &mut group,
            expense(
                &ana,
                10000,
                vec![share(&ana, 3333), share(&bo, 3333), share(&cid, 3333)],
            ),
        )
        .unwrap();
    }

    #[test]
    fn record_expense_rejects_nonmember_payer() {
        let ana = participant("ana");
        let outsider = participant("zed");
        let mut group = created_group(&[&ana]);

        let err = record(&mut group, expense(&outsider, 100, vec![share(&ana, 100)]))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn record_expense_rejects_nonmember_share_participant() {
        let ana = participant("ana");
        let outsider = participant("zed");
        let mut group = created_group(&[&ana]);

        let err = record(&mut group, expense(&ana, 100, vec![share(&outsider, 100)]))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn record_expense_rejects_duplicate_share_participant() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);

        let err = record(&mut group, expense(&ana, 100, vec![share(&bo, 50), share(&bo, 50)]))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn record_expense_rejects_nonpositive_total_and_negative_share() {
        let ana = participant("ana");
        let mut group = created_group(&[&ana]);

        let err = record(&mut group, expense(&ana, 0, vec![share(&ana, 0)])).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = record(&mut group, expense(&ana, 100, vec![share(&ana, -100)])).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn closed_group_rejects_mutation() {
        let ana = participant("ana");
        let mut group = created_group(&[&ana]);

        let events = group
            .handle(&GroupCommand::CloseGroup(CloseGroup {
                group_id: group.id_typed(),
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            group.apply(event);
        }
        assert_eq!(group.status(), GroupStatus::Closed);

        let err = record(&mut group, expense(&ana, 100, vec![share(&ana, 100)])).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = group
            .handle(&GroupCommand::CloseGroup(CloseGroup {
                group_id: group.id_typed(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn organizer_cannot_be_removed() {
        let ana = participant("ana");
        let bo = participant("bo");
        let group = created_group(&[&ana, &bo]);

        let err = group
            .handle(&GroupCommand::RemoveParticipant(RemoveParticipant {
                group_id: group.id_typed(),
                participant_id: ana.id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn participant_with_recorded_expenses_cannot_be_removed() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);
        record(&mut group, expense(&ana, 100, vec![share(&bo, 100)])).unwrap();

        let err = group
            .handle(&GroupCommand::RemoveParticipant(RemoveParticipant {
                group_id: group.id_typed(),
                participant_id: bo.id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn unreferenced_participant_can_be_removed() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);

        let events = group
            .handle(&GroupCommand::RemoveParticipant(RemoveParticipant {
                group_id: group.id_typed(),
                participant_id: bo.id,
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            group.apply(event);
        }
        assert!(!group.is_member(bo.id));
        assert_eq!(group.roster().count(), 1);
    }

    #[test]
    fn amend_expense_replaces_the_recorded_state() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);
        record(&mut group, expense(&ana, 100, vec![share(&bo, 100)])).unwrap();
        let expense_id = group.expenses()[0].id;

        let events = group
            .handle(&GroupCommand::AmendExpense(AmendExpense {
                group_id: group.id_typed(),
                expense_id,
                total: Some(Amount::from_cents(200)),
                description: None,
                payer_id: Some(bo.id),
                shares: Some(vec![share(&ana, 200)]),
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            group.apply(event);
        }

        let amended = group.expense(expense_id).unwrap();
        assert_eq!(amended.total, Amount::from_cents(200));
        assert_eq!(amended.payer_id, bo.id);
        assert_eq!(amended.shares, vec![share(&ana, 200)]);
        // Untouched fields survive.
        assert_eq!(amended.description.as_deref(), Some("test expense"));
    }

    #[test]
    fn amend_validates_the_effective_expense() {
        let ana = participant("ana");
        let bo = participant("bo");
        let mut group = created_group(&[&ana, &bo]);
        record(&mut group, expense(&ana, 100, vec![share(&bo, 100)])).unwrap();
        let expense_id = group.expenses()[0].id;

        // New total without new shares no longer reconciles.
        let err = group
            .handle(&GroupCommand::AmendExpense(AmendExpense {
                group_id: group.id_typed(),
                expense_id,
                total: Some(Amount::from_cents(500)),
                description: None,
                payer_id: None,
                shares: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn amend_unknown_expense_is_not_found() {
        let ana = participant("ana");
        let group = created_group(&[&ana]);

        let err = group
            .handle(&GroupCommand::AmendExpense(AmendExpense {
                group_id: group.id_typed(),
                expense_id: ExpenseId::new(),
                total: None,
                description: None,
                payer_id: None,
                shares: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn remove_expense_drops_it_from_the_group() {
        let ana = participant("ana");
        let mut group = created_group(&[&ana]);
        record(&mut group, expense(&ana, 100, vec![share(&ana, 100)])).unwrap();
        let expense_id = group.expenses()[0].id;

        let events = group
            .handle(&GroupCommand::RemoveExpense(RemoveExpense {
                group_id: group.id_typed(),
                expense_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            group.apply(event);
        }
        assert!(group.expenses().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: an even split with the remainder spread over the first
        /// shares always reconciles and is accepted.
        #[test]
        fn even_splits_are_accepted(
            total_cents in 1i64..1_000_000,
            member_count in 1usize..6,
        ) {
            let members: Vec<Participant> =
                (0..member_count).map(|i| participant(&format!("m{i}"))).collect();
            let refs: Vec<&Participant> = members.iter().collect();
            let mut group = created_group(&refs);

            let base = total_cents / member_count as i64;
            let remainder = total_cents % member_count as i64;
            let shares: Vec<Share> = members
                .iter()
                .enumerate()
                .map(|(i, m)| share(m, base + i64::from((i as i64) < remainder)))
                .collect();

            record(&mut group, expense(&members[0], total_cents, shares)).unwrap();
            prop_assert!(group.expenses()[0].is_reconciled().unwrap());
        }

        /// Property: pushing the share sum more than one cent away from the
        /// total is always rejected.
        #[test]
        fn drifted_splits_are_rejected(
            total_cents in 10i64..1_000_000,
            drift in 2i64..100,
        ) {
            let ana = participant("ana");
            let bo = participant("bo");
            let mut group = created_group(&[&ana, &bo]);

            let first = total_cents / 2;
            let second = total_cents - first + drift;
            let result = record(
                &mut group,
                expense(&ana, total_cents, vec![share(&ana, first), share(&bo, second)]),
            );
            prop_assert!(result.is_err());
        }
    }
}
