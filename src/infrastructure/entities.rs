//! Database entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_pro: bool,
    pub daily_queries: i64,
    pub last_query_date: Option<NaiveDate>,
    pub preferred_payment: Option<PaymentMethod>,
}

/// How a user would like to pay for the Pro upgrade. Payment itself happens offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentMethod {
    Mpesa,
    Airtel,
    Credit,
    Debit,
    Bank,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "M-Pesa",
            PaymentMethod::Airtel => "Airtel Money",
            PaymentMethod::Credit => "Credit Card",
            PaymentMethod::Debit => "Debit Card",
            PaymentMethod::Bank => "Bank Transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mpesa" => Ok(PaymentMethod::Mpesa),
            "airtel" => Ok(PaymentMethod::Airtel),
            "credit" => Ok(PaymentMethod::Credit),
            "debit" => Ok(PaymentMethod::Debit),
            "bank" => Ok(PaymentMethod::Bank),
            other => Err(format!("unknown payment method `{other}`")),
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AuthSession {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_input: String,
    pub ai_raw_response: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct FlashcardSet {
    pub id: Uuid,
    pub chat_session_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Flashcard {
    pub id: Uuid,
    pub set_id: Uuid,
    pub position: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}
