//! Test utilities for the crud-kit crate.
//!
//! Fixture entities covering every key shape and capability combination,
//! plus a settable clock. Shared by unit tests (in `src/`) and integration
//! tests (in `tests/`) through the `test-support` feature.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::FixedPrincipal;
use crate::domain::{
    ActorId, Auditor, Capabilities, Creatable, CreationRecord, Deletable, DeletionRecord, Entity,
    EntityKey, KeyAssignment, Modifiable, ModificationRecord, NamedEntity, Sortable, Unsorted,
};

/// Clock whose instant only moves when a test moves it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// 2024-01-01T00:00:00Z, the instant fixture clocks start from.
pub fn epoch() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("fixture epoch is a valid instant"),
    }
}

/// Auditor acting as `actor` on `clock`.
pub fn auditor<A: ActorId>(actor: A, clock: Arc<MutableClock>) -> Auditor<A> {
    Auditor::new(Arc::new(FixedPrincipal::new(actor)), clock)
}

/// Fully audited catalogue item with a generated 32-bit key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: i32,
    pub name: String,
    pub quantity: u32,
    #[serde(flatten)]
    pub creation: CreationRecord<Uuid>,
    #[serde(flatten)]
    pub modification: ModificationRecord<Uuid>,
    #[serde(flatten)]
    pub deletion: DeletionRecord<Uuid>,
}

impl Widget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            quantity: 0,
            creation: CreationRecord::absent(),
            modification: ModificationRecord::absent(),
            deletion: DeletionRecord::absent(),
        }
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Sortable fields of [`Widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetField {
    Name,
    Quantity,
}

impl Entity for Widget {
    type Key = i32;
    type Actor = Uuid;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn capabilities() -> Capabilities<Self> {
        Capabilities::auditable()
    }
}

impl NamedEntity for Widget {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Creatable for Widget {
    fn creation(&self) -> &CreationRecord<Uuid> {
        &self.creation
    }

    fn creation_mut(&mut self) -> &mut CreationRecord<Uuid> {
        &mut self.creation
    }
}

impl Modifiable for Widget {
    fn modification(&self) -> &ModificationRecord<Uuid> {
        &self.modification
    }

    fn modification_mut(&mut self) -> &mut ModificationRecord<Uuid> {
        &mut self.modification
    }
}

impl Deletable for Widget {
    fn deletion(&self) -> &DeletionRecord<Uuid> {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut DeletionRecord<Uuid> {
        &mut self.deletion
    }
}

impl Sortable for Widget {
    type SortField = WidgetField;

    fn compare_by(&self, other: &Self, field: WidgetField) -> Ordering {
        match field {
            WidgetField::Name => self.name.cmp(&other.name),
            WidgetField::Quantity => self.quantity.cmp(&other.quantity),
        }
    }
}

/// Append-only journal line keyed by UUID; only creation is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub memo: String,
    pub amount_cents: i64,
    #[serde(flatten)]
    pub creation: CreationRecord<Uuid>,
}

impl LedgerEntry {
    pub fn new(memo: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            id: Uuid::nil(),
            memo: memo.into(),
            amount_cents,
            creation: CreationRecord::absent(),
        }
    }
}

/// Sortable fields of [`LedgerEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerField {
    Amount,
}

impl Entity for LedgerEntry {
    type Key = Uuid;
    type Actor = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn capabilities() -> Capabilities<Self> {
        Capabilities::none().with_creation()
    }
}

impl Creatable for LedgerEntry {
    fn creation(&self) -> &CreationRecord<Uuid> {
        &self.creation
    }

    fn creation_mut(&mut self) -> &mut CreationRecord<Uuid> {
        &mut self.creation
    }
}

impl Sortable for LedgerEntry {
    type SortField = LedgerField;

    fn compare_by(&self, other: &Self, field: LedgerField) -> Ordering {
        match field {
            LedgerField::Amount => self.amount_cents.cmp(&other.amount_cents),
        }
    }
}

/// Untracked label with a generated 64-bit key; deletes are physical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

/// Sortable fields of [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Name,
}

impl Entity for Tag {
    type Key = i64;
    type Actor = ();

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl NamedEntity for Tag {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Sortable for Tag {
    type SortField = TagField;

    fn compare_by(&self, other: &Self, field: TagField) -> Ordering {
        match field {
            TagField::Name => self.name.cmp(&other.name),
        }
    }
}

/// Composite, caller-assigned key: shipping year plus sequence number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ShipmentKey {
    pub year: u16,
    pub sequence: u32,
}

impl ShipmentKey {
    pub const fn new(year: u16, sequence: u32) -> Self {
        Self { year, sequence }
    }
}

impl EntityKey for ShipmentKey {
    fn assignment() -> KeyAssignment {
        KeyAssignment::CallerAssigned
    }

    fn generate(_last_issued: Option<Self>) -> Option<Self> {
        None
    }
}

/// Shipment tracking creation and modification but never soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub key: ShipmentKey,
    pub description: String,
    #[serde(flatten)]
    pub creation: CreationRecord<Uuid>,
    #[serde(flatten)]
    pub modification: ModificationRecord<Uuid>,
}

impl Shipment {
    pub fn new(key: ShipmentKey, description: impl Into<String>) -> Self {
        Self {
            key,
            description: description.into(),
            creation: CreationRecord::absent(),
            modification: ModificationRecord::absent(),
        }
    }
}

impl Entity for Shipment {
    type Key = ShipmentKey;
    type Actor = Uuid;

    fn id(&self) -> ShipmentKey {
        self.key
    }

    fn set_id(&mut self, id: ShipmentKey) {
        self.key = id;
    }

    fn capabilities() -> Capabilities<Self> {
        Capabilities::none().with_creation().with_modification()
    }
}

impl Creatable for Shipment {
    fn creation(&self) -> &CreationRecord<Uuid> {
        &self.creation
    }

    fn creation_mut(&mut self) -> &mut CreationRecord<Uuid> {
        &mut self.creation
    }
}

impl Modifiable for Shipment {
    fn modification(&self) -> &ModificationRecord<Uuid> {
        &self.modification
    }

    fn modification_mut(&mut self) -> &mut ModificationRecord<Uuid> {
        &mut self.modification
    }
}

impl Sortable for Shipment {
    type SortField = Unsorted;

    fn compare_by(&self, _other: &Self, field: Unsorted) -> Ordering {
        field.compare()
    }
}
