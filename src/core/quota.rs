//! Daily generation allowance for free accounts.
//!
//! The counter is restored once per calendar day (UTC). Pro accounts are never blocked,
//! although the reset still writes the free allowance for them; that write is redundant
//! but kept so stored counters look the same for every account.

use crate::infrastructure::entities::Profile;
use chrono::{NaiveDate, Utc};

pub const DAILY_QUERY_ALLOWANCE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// First request of the day: restore the allowance, then allow.
    ResetAndAllow,
    Allow,
    Exhausted,
}

impl QuotaDecision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, QuotaDecision::Exhausted)
    }
}

pub fn evaluate(profile: &Profile, today: NaiveDate) -> QuotaDecision {
    if profile.last_query_date != Some(today) {
        QuotaDecision::ResetAndAllow
    } else if profile.is_pro || profile.daily_queries > 0 {
        QuotaDecision::Allow
    } else {
        QuotaDecision::Exhausted
    }
}

/// Counter after one successful generation, floored at zero.
pub fn consume(daily_queries: i64) -> i64 {
    (daily_queries - 1).max(0)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn profile(is_pro: bool, daily_queries: i64, last_query_date: Option<NaiveDate>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "student@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            last_login: None,
            is_pro,
            daily_queries,
            last_query_date,
            preferred_payment: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_new_day_resets_for_everyone() {
        for is_pro in [false, true] {
            for queries in [0, 3, 5] {
                let p = profile(is_pro, queries, Some(day(1)));
                assert_eq!(evaluate(&p, day(2)), QuotaDecision::ResetAndAllow);
            }
        }
    }

    #[test]
    fn test_never_queried_resets() {
        let p = profile(false, 0, None);
        assert_eq!(evaluate(&p, day(2)), QuotaDecision::ResetAndAllow);
    }

    #[test]
    fn test_same_day_with_queries_left_is_allowed() {
        let p = profile(false, 1, Some(day(2)));
        assert_eq!(evaluate(&p, day(2)), QuotaDecision::Allow);
    }

    #[test]
    fn test_same_day_exhausted_is_blocked() {
        let p = profile(false, 0, Some(day(2)));
        let decision = evaluate(&p, day(2));
        assert_eq!(decision, QuotaDecision::Exhausted);
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_pro_is_never_blocked_by_counter() {
        let p = profile(true, 0, Some(day(2)));
        assert!(evaluate(&p, day(2)).is_allowed());
    }

    #[test]
    fn test_consume_floors_at_zero() {
        assert_eq!(consume(5), 4);
        assert_eq!(consume(1), 0);
        assert_eq!(consume(0), 0);
    }
}
