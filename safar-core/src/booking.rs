use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

/// Which side of the marketplace drives a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Guide,
    Tourist,
}

impl BookingStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "accepted" => Some(BookingStatus::Accepted),
            "rejected" => Some(BookingStatus::Rejected),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Rejected, cancelled and completed bookings never move again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }

    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        matches!(
            (self, target),
            (BookingStatus::Pending, BookingStatus::Accepted)
                | (BookingStatus::Pending, BookingStatus::Rejected)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Accepted, BookingStatus::Completed)
        )
    }

    pub fn ensure_transition(&self, target: BookingStatus) -> CoreResult<()> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }

    /// The party allowed to move a booking into this status. `Pending` is
    /// only ever assigned at creation, so it has no transition actor.
    pub fn transition_actor(&self) -> Option<Party> {
        match self {
            BookingStatus::Accepted | BookingStatus::Rejected | BookingStatus::Completed => {
                Some(Party::Guide)
            }
            BookingStatus::Cancelled => Some(Party::Tourist),
            BookingStatus::Pending => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-bounded engagement proposal between a tourist and a guide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub tourist_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub party_size: i32,
    pub notes: Option<String>,
    pub itinerary_id: Option<String>,
    pub status: BookingStatus,
    pub total_cost: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a pending booking with the cost fixed at the guide's current
    /// hourly rate. The cost is never recomputed afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        guide_id: Uuid,
        tourist_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        party_size: i32,
        notes: Option<String>,
        itinerary_id: Option<String>,
        hourly_rate: i64,
    ) -> CoreResult<Self> {
        if party_size < 1 {
            return Err(CoreError::ValidationError(
                "Party size must be at least 1".to_string(),
            ));
        }
        let total_cost = total_cost(hourly_rate, start_date, end_date, party_size)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            guide_id,
            tourist_id,
            start_date,
            end_date,
            party_size,
            notes,
            itinerary_id,
            status: BookingStatus::Pending,
            total_cost,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Billable hours are the ceiling of the raw duration; a four-hour-and-one
/// minute tour bills five hours.
pub fn billable_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<i64> {
    let seconds = (end - start).num_seconds();
    if seconds < 0 {
        return Err(CoreError::ValidationError(
            "End date must not precede start date".to_string(),
        ));
    }
    // `seconds` is guaranteed non-negative above; this is ceiling division.
    Ok((seconds + 3599) / 3600)
}

pub fn total_cost(
    hourly_rate: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    party_size: i32,
) -> CoreResult<i64> {
    if hourly_rate < 0 {
        return Err(CoreError::ValidationError(
            "Hourly rate must not be negative".to_string(),
        ));
    }
    Ok(hourly_rate * billable_hours(start, end)? * i64::from(party_size))
}
