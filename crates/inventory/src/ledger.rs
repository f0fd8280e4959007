use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Aggregate, AggregateRoot, Amount, ItemName, LedgerError, SessionId};
use stockroom_events::{Event, History, Journal};

use crate::audit::{AuditEntry, AuditKind};
use crate::snapshot::{Snapshot, StockEntry};

/// Command: AddStock.
///
/// Carries raw input; validation happens when the ledger handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStock {
    pub item: String,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveStock {
    pub item: String,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveAll (drop an item regardless of its quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAll {
    pub item: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddStock(AddStock),
    RemoveStock(RemoveStock),
    RemoveAll(RemoveAll),
}

/// Event: StockAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub item: ItemName,
    pub amount: Amount,
    /// Quantity held after the addition.
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRemoved {
    pub item: ItemName,
    pub amount: Amount,
    /// Quantity held after the removal; zero means the entry was dropped.
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub item: ItemName,
    /// Quantity held immediately before the item was dropped.
    pub removed: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    StockAdded(StockAdded),
    StockRemoved(StockRemoved),
    ItemRemoved(ItemRemoved),
}

impl LedgerEvent {
    pub fn item(&self) -> &ItemName {
        match self {
            LedgerEvent::StockAdded(e) => &e.item,
            LedgerEvent::StockRemoved(e) => &e.item,
            LedgerEvent::ItemRemoved(e) => &e.item,
        }
    }

    /// Quantity held for the event's item once the event is applied.
    pub fn resulting_quantity(&self) -> i64 {
        match self {
            LedgerEvent::StockAdded(e) => e.quantity,
            LedgerEvent::StockRemoved(e) => e.quantity,
            LedgerEvent::ItemRemoved(_) => 0,
        }
    }

    fn audit_kind(&self) -> AuditKind {
        match self {
            LedgerEvent::StockAdded(_) => AuditKind::Add,
            LedgerEvent::StockRemoved(_) => AuditKind::Remove,
            LedgerEvent::ItemRemoved(_) => AuditKind::RemoveAll,
        }
    }

    fn delta(&self) -> i64 {
        match self {
            LedgerEvent::StockAdded(e) => e.amount.get(),
            LedgerEvent::StockRemoved(e) => e.amount.get(),
            LedgerEvent::ItemRemoved(e) => e.removed,
        }
    }
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::StockAdded(_) => "stockroom.stock.added",
            LedgerEvent::StockRemoved(_) => "stockroom.stock.removed",
            LedgerEvent::ItemRemoved(_) => "stockroom.item.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::StockAdded(e) => e.occurred_at,
            LedgerEvent::StockRemoved(e) => e.occurred_at,
            LedgerEvent::ItemRemoved(e) => e.occurred_at,
        }
    }
}

/// Result of a successful `remove`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOutcome {
    /// Quantity left after the removal (0 if the entry was dropped).
    pub quantity: i64,
    pub deleted: bool,
}

/// Aggregate root: one session's stock ledger.
///
/// Invariants:
/// - every present item has a quantity `> 0`
/// - the audit trail grows by exactly one entry per successful mutation
///
/// Mutations are plain `&mut self` calls; callers sharing a ledger across
/// threads must put it behind a lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    id: SessionId,
    stock: BTreeMap<ItemName, i64>,
    audit: Journal<AuditEntry>,
    version: u64,
}

impl Ledger {
    /// Create an empty ledger owned by `id`.
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            stock: BTreeMap::new(),
            audit: Journal::new(),
            version: 0,
        }
    }

    /// Add `amount` units of `name`, creating the entry if needed.
    ///
    /// Returns the new quantity.
    pub fn add(&mut self, name: &str, amount: i64) -> Result<i64, LedgerError> {
        let events = self.execute(&LedgerCommand::AddStock(AddStock {
            item: name.to_string(),
            amount,
            occurred_at: Utc::now(),
        }))?;
        Ok(resulting_quantity(&events))
    }

    /// Remove `amount` units of `name`; drops the entry when it reaches zero.
    pub fn remove(&mut self, name: &str, amount: i64) -> Result<RemoveOutcome, LedgerError> {
        let events = self.execute(&LedgerCommand::RemoveStock(RemoveStock {
            item: name.to_string(),
            amount,
            occurred_at: Utc::now(),
        }))?;
        let quantity = resulting_quantity(&events);
        Ok(RemoveOutcome {
            quantity,
            deleted: quantity == 0,
        })
    }

    /// Drop `name` regardless of its quantity. Returns the quantity that was held.
    pub fn remove_all(&mut self, name: &str) -> Result<i64, LedgerError> {
        let events = self.execute(&LedgerCommand::RemoveAll(RemoveAll {
            item: name.to_string(),
            occurred_at: Utc::now(),
        }))?;
        Ok(removed_quantity(&events))
    }

    /// Handle and apply a command as one step.
    ///
    /// On error the ledger is unchanged and nothing is audited.
    pub fn execute(&mut self, command: &LedgerCommand) -> Result<Vec<LedgerEvent>, LedgerError> {
        match stockroom_events::execute(self, command) {
            Ok(events) => {
                for ev in &events {
                    tracing::info!(
                        session = %self.id,
                        event = ev.event_type(),
                        item = %ev.item(),
                        delta = ev.delta(),
                        quantity = ev.resulting_quantity(),
                        "ledger mutation applied"
                    );
                }
                Ok(events)
            }
            Err(err) => {
                tracing::debug!(session = %self.id, error = %err, "ledger command rejected");
                Err(err)
            }
        }
    }

    /// Current entries, ordered by name.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.stock
                .iter()
                .map(|(name, quantity)| StockEntry {
                    name: name.clone(),
                    quantity: *quantity,
                })
                .collect(),
        )
    }

    /// Audit entries, most recent first.
    pub fn history(&self, limit: Option<usize>) -> History<'_, AuditEntry> {
        self.audit.history(limit)
    }

    /// Current quantity of `name` (0 when absent).
    pub fn quantity(&self, name: &str) -> i64 {
        ItemName::parse(name)
            .ok()
            .and_then(|n| self.stock.get(&n).copied())
            .unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.quantity(name) > 0
    }

    pub fn session_id(&self) -> SessionId {
        self.id
    }

    fn current(&self, item: &ItemName) -> Result<i64, LedgerError> {
        self.stock
            .get(item)
            .copied()
            .ok_or_else(|| LedgerError::not_found(item.as_str()))
    }

    fn handle_add(&self, cmd: &AddStock) -> Result<Vec<LedgerEvent>, LedgerError> {
        let item = ItemName::parse(&cmd.item)?;
        let amount = Amount::new(cmd.amount)?;

        let held = self.stock.get(&item).copied().unwrap_or(0);
        let quantity = held
            .checked_add(amount.get())
            .ok_or_else(|| LedgerError::invalid_input("quantity would overflow"))?;

        Ok(vec![LedgerEvent::StockAdded(StockAdded {
            item,
            amount,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveStock) -> Result<Vec<LedgerEvent>, LedgerError> {
        let item = ItemName::parse(&cmd.item)?;
        let amount = Amount::new(cmd.amount)?;

        let held = self.current(&item)?;
        if amount.get() > held {
            return Err(LedgerError::insufficient_stock(
                item.into_inner(),
                held,
                amount.get(),
            ));
        }

        Ok(vec![LedgerEvent::StockRemoved(StockRemoved {
            quantity: held - amount.get(),
            item,
            amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_all(&self, cmd: &RemoveAll) -> Result<Vec<LedgerEvent>, LedgerError> {
        let item = ItemName::parse(&cmd.item)?;
        let removed = self.current(&item)?;

        Ok(vec![LedgerEvent::ItemRemoved(ItemRemoved {
            item,
            removed,
            occurred_at: cmd.occurred_at,
        })])
    }
}

fn resulting_quantity(events: &[LedgerEvent]) -> i64 {
    events.last().map(LedgerEvent::resulting_quantity).unwrap_or(0)
}

fn removed_quantity(events: &[LedgerEvent]) -> i64 {
    events.last().map(LedgerEvent::delta).unwrap_or(0)
}

impl AggregateRoot for Ledger {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::StockAdded(e) => {
                self.stock.insert(e.item.clone(), e.quantity);
            }
            LedgerEvent::StockRemoved(e) => {
                if e.quantity > 0 {
                    self.stock.insert(e.item.clone(), e.quantity);
                } else {
                    self.stock.remove(&e.item);
                }
            }
            LedgerEvent::ItemRemoved(e) => {
                self.stock.remove(&e.item);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;

        self.audit.append(AuditEntry {
            sequence: self.version,
            occurred_at: event.occurred_at(),
            kind: event.audit_kind(),
            item: event.item().clone(),
            delta: event.delta(),
            resulting_quantity: event.resulting_quantity(),
        });
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddStock(cmd) => self.handle_add(cmd),
            LedgerCommand::RemoveStock(cmd) => self.handle_remove(cmd),
            LedgerCommand::RemoveAll(cmd) => self.handle_remove_all(cmd),
        }
    }
}
