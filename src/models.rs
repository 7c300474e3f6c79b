use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---
//
// The JSON wire names are the original French API contract (titre, courriel,
// proprietaire, ...); the Rust identifiers stay English with serde renames
// carrying the contract.

/// User
///
/// The canonical identity record stored in the `users` table. `name` and `email`
/// are unique; the bcrypt hash is never serialized into any response.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "courriel")]
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    #[schema(ignore)]
    pub password_hash: String,
    #[serde(rename = "createdAt")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Board
///
/// Top-level container owned by exactly one user. `list_ids` is the ordered
/// sequence of child lists (insertion order = display order); each child list
/// also carries a `board_id` back-reference. The two representations of the
/// edge are updated together inside a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Board {
    pub id: Uuid,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "proprietaire")]
    pub owner_id: Uuid,
    #[serde(rename = "listes")]
    pub list_ids: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// List
///
/// An ordered column of cards within a board. Only valid within the board whose
/// `list_ids` contains its id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct List {
    pub id: Uuid,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "tableau")]
    pub board_id: Uuid,
    #[serde(rename = "cartes")]
    pub card_ids: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Card
///
/// A task item belonging to one list. The due date is nullable and must
/// round-trip as JSON `null` when absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Card {
    pub id: Uuid,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: String,
    #[serde(rename = "liste")]
    pub list_id: Uuid,
    #[serde(rename = "dateLimite")]
    #[ts(type = "string | null")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---
//
// Every field is an Option so that the aggregated missing-fields pass (not serde)
// decides what is absent and can name all missing fields in a single message.

/// LoginRequest
///
/// Input payload for POST /connexion.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(rename = "courriel")]
    pub email: Option<String>,
    #[serde(rename = "motDePasse")]
    pub password: Option<String>,
}

/// RegisterRequest
///
/// Input payload for POST /inscription. The password confirmation is checked for
/// equality during schema validation and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(rename = "nom")]
    pub name: Option<String>,
    #[serde(rename = "courriel")]
    pub email: Option<String>,
    #[serde(rename = "motDePasse")]
    pub password: Option<String>,
    #[serde(rename = "motDePasseConfirmation")]
    pub password_confirmation: Option<String>,
}

/// BoardPayload
///
/// Input payload for board creation and update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BoardPayload {
    #[serde(rename = "titre")]
    pub title: Option<String>,
}

/// ListPayload
///
/// Input payload for list creation and update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ListPayload {
    #[serde(rename = "titre")]
    pub title: Option<String>,
}

/// CardPayload
///
/// Input payload for card creation and update. `dateLimite` accepts an RFC 3339
/// timestamp, the literal string "null", JSON null, or may be omitted entirely;
/// the last three all mean "no due date".
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CardPayload {
    #[serde(rename = "titre")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "dateLimite")]
    pub due_date: Option<String>,
}

// --- Response Envelopes (Output) ---

/// MessageResponse
///
/// Plain confirmation body: `{message}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// CreatedResponse
///
/// Confirmation body for create/delete operations that also report the affected
/// document id: `{message, id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}
