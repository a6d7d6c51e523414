//! Work record model and related types.
//!
//! A [`WorkRecord`] is one day's worth of hourly and/or piece work for an
//! employee. Its `salary` is a snapshot taken when the record was written:
//! changing an employee's rate or the system defaults never alters it, only
//! an explicit edit of the record does.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of work a record represents, derived from its hours and pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkKind {
    /// Hours only.
    Hourly,
    /// Pieces only.
    Piece,
    /// Both hours and pieces.
    Mixed,
}

impl WorkKind {
    /// Classifies a record by which of its quantities are non-zero.
    ///
    /// Returns `None` when neither is, which is not a valid record.
    pub fn classify(hours: Decimal, strings: Decimal) -> Option<Self> {
        match (hours > Decimal::ZERO, strings > Decimal::ZERO) {
            (true, true) => Some(WorkKind::Mixed),
            (true, false) => Some(WorkKind::Hourly),
            (false, true) => Some(WorkKind::Piece),
            (false, false) => None,
        }
    }

    /// The label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            WorkKind::Hourly => "hourly",
            WorkKind::Piece => "piece",
            WorkKind::Mixed => "mixed",
        }
    }
}

/// A stored unit of work for one employee on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    /// Identifier assigned by the store.
    pub id: Uuid,
    /// The employee who did the work.
    pub employee_id: Uuid,
    /// Calendar date of the work.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Pieces (strings) completed.
    pub strings: Decimal,
    /// Earned amount, frozen at write time.
    pub salary: Decimal,
    /// Whether the record has been settled.
    pub paid: bool,
    /// Settlement timestamp; present iff `paid`.
    pub paid_at: Option<DateTime<Utc>>,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl WorkRecord {
    /// Returns the kind of work this record holds.
    ///
    /// Stored records always satisfy `hours > 0 || strings > 0`; a record
    /// that somehow does not is reported as hourly.
    pub fn kind(&self) -> WorkKind {
        WorkKind::classify(self.hours, self.strings).unwrap_or(WorkKind::Hourly)
    }

    /// Returns true if the record is still waiting for settlement.
    pub fn is_unpaid(&self) -> bool {
        !self.paid
    }
}

/// Values for a record that has not been stored yet.
///
/// The store assigns `id` and `created_at`; a new record is always unpaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecordDraft {
    /// The employee who did the work.
    pub employee_id: Uuid,
    /// Calendar date of the work.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Pieces completed.
    pub strings: Decimal,
    /// Computed salary snapshot.
    pub salary: Decimal,
}

/// A resolved update to a stored record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New hours.
    pub hours: Option<Decimal>,
    /// New piece count.
    pub strings: Option<Decimal>,
    /// New salary.
    pub salary: Option<Decimal>,
}

impl RecordPatch {
    /// Applies the patch to a record in place. Paid status is never touched.
    pub fn apply_to(&self, record: &mut WorkRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(hours) = self.hours {
            record.hours = hours;
        }
        if let Some(strings) = self.strings {
            record.strings = strings;
        }
        if let Some(salary) = self.salary {
            record.salary = salary;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record(hours: &str, strings: &str) -> WorkRecord {
        WorkRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            hours: dec(hours),
            strings: dec(strings),
            salary: dec("160"),
            paid: false,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_classify_work_kind() {
        assert_eq!(WorkKind::classify(dec("8"), dec("0")), Some(WorkKind::Hourly));
        assert_eq!(WorkKind::classify(dec("0"), dec("40")), Some(WorkKind::Piece));
        assert_eq!(WorkKind::classify(dec("2"), dec("40")), Some(WorkKind::Mixed));
        assert_eq!(WorkKind::classify(dec("0"), dec("0")), None);
    }

    #[test]
    fn test_record_kind_and_label() {
        let record = create_test_record("0", "12");
        assert_eq!(record.kind(), WorkKind::Piece);
        assert_eq!(record.kind().label(), "piece");
    }

    #[test]
    fn test_patch_leaves_paid_status_alone() {
        let paid_at = Utc::now();
        let mut record = create_test_record("8", "0");
        record.paid = true;
        record.paid_at = Some(paid_at);

        let patch = RecordPatch {
            hours: Some(dec("6")),
            salary: Some(dec("120")),
            ..RecordPatch::default()
        };
        patch.apply_to(&mut record);

        assert_eq!(record.hours, dec("6"));
        assert_eq!(record.salary, dec("120"));
        assert!(record.paid);
        assert_eq!(record.paid_at, Some(paid_at));
    }

    #[test]
    fn test_work_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&WorkKind::Mixed).unwrap(),
            "\"mixed\""
        );
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = create_test_record("8.5", "3");
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: WorkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
