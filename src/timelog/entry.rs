//! Validated time entries and the helpdesk action payload.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::validators::{parse_date, parse_time, validate_ticket};
use crate::error::{SyncError, SyncResult};

/// Activity name every entry is booked under.
pub const ACTIVITY: &str = "AMS Sustentacao";
pub const WORK_TYPE: &str = "normal";
/// Helpdesk action type for internal notes with time appointments.
const ACTION_TYPE_INTERNAL: u8 = 2;

/// Form input as typed.
#[derive(Debug, Clone, Default)]
pub struct RawTimeEntry {
    pub ticket_id: String,
    pub description: String,
    /// `DD/MM/YYYY`
    pub date: String,
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub ticket_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub agent_id: String,
}

impl TimeEntry {
    /// Validate form input for the given agent.
    pub fn parse(raw: &RawTimeEntry, agent_id: &str) -> SyncResult<Self> {
        let agent_id = agent_id.trim();
        if agent_id.is_empty() {
            return Err(SyncError::Validation("user has no agent id".into()));
        }
        if !validate_ticket(&raw.ticket_id) {
            return Err(SyncError::Validation(format!(
                "invalid ticket id '{}'",
                raw.ticket_id
            )));
        }
        let date = parse_date(&raw.date).ok_or_else(|| {
            SyncError::Validation(format!("invalid date '{}', expected DD/MM/YYYY", raw.date))
        })?;
        let (Some(start), Some(end)) = (parse_time(&raw.start), parse_time(&raw.end)) else {
            return Err(SyncError::Validation(format!(
                "invalid time window '{}'-'{}', expected HH:MM",
                raw.start, raw.end
            )));
        };

        Ok(Self {
            ticket_id: raw.ticket_id.trim().to_string(),
            description: raw.description.trim().to_string(),
            date,
            start,
            end,
            agent_id: agent_id.to_string(),
        })
    }

    /// Request body for the ticket PATCH.
    pub fn to_payload(&self) -> TicketPatch {
        let created_by = Person {
            id: self.agent_id.clone(),
        };
        TicketPatch {
            actions: vec![Action {
                action_type: ACTION_TYPE_INTERNAL,
                description: self.description.clone(),
                created_by: created_by.clone(),
                time_appointments: vec![TimeAppointment {
                    activity: ACTIVITY,
                    date: self.date.format("%Y-%m-%dT00:00:00").to_string(),
                    period_start: format!("{}:00.0000000", self.start.format("%H:%M")),
                    period_end: format!("{}:00.0000000", self.end.format("%H:%M")),
                    work_type_name: WORK_TYPE,
                    created_by,
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketPatch {
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: u8,
    pub description: String,
    pub created_by: Person,
    pub time_appointments: Vec<TimeAppointment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAppointment {
    pub activity: &'static str,
    pub date: String,
    pub period_start: String,
    pub period_end: String,
    pub work_type_name: &'static str,
    pub created_by: Person,
}

#[derive(Debug, Clone, Serialize)]
pub struct Person {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn raw() -> RawTimeEntry {
        RawTimeEntry {
            ticket_id: " 4711 ".into(),
            description: "Ajuste de relatório".into(),
            date: "05/03/2025".into(),
            start: "09:00".into(),
            end: "10:30".into(),
        }
    }

    #[test]
    fn test_parse_and_payload() {
        let entry = TimeEntry::parse(&raw(), "agent-7").unwrap();
        assert_eq!(entry.ticket_id, "4711");

        let value = serde_json::to_value(entry.to_payload()).unwrap();
        let action = &value["actions"][0];
        assert_eq!(action["type"], 2);
        assert_eq!(action["createdBy"]["id"], "agent-7");
        let appointment = &action["timeAppointments"][0];
        assert_eq!(appointment["date"], "2025-03-05T00:00:00");
        assert_eq!(appointment["periodStart"], "09:00:00.0000000");
        assert_eq!(appointment["periodEnd"], "10:30:00.0000000");
        assert_eq!(appointment["activity"], ACTIVITY);
        assert_eq!(appointment["workTypeName"], WORK_TYPE);
    }

    #[test]
    fn test_missing_agent_blocks_entry() {
        let err = TimeEntry::parse(&raw(), "  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_fields() {
        let mut bad = raw();
        bad.ticket_id = "abc".into();
        assert!(TimeEntry::parse(&bad, "a").is_err());

        let mut bad = raw();
        bad.date = "2025-03-05".into();
        assert!(TimeEntry::parse(&bad, "a").is_err());

        let mut bad = raw();
        bad.end = "25:00".into();
        assert!(TimeEntry::parse(&bad, "a").is_err());
    }
}
